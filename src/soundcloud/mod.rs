//! SoundCloud page scraping and media-info resolution.

pub mod api;
pub mod extract;
pub mod models;
pub mod resolve;

pub use api::SoundcloudClient;
pub use models::Track;
pub use resolve::Resolver;
