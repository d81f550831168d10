#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artist_name: String,
    /// Media-info endpoint, always on the progressive template.
    pub track_url: String,
    pub track_auth_token: String,
}
