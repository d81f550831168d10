//! Handing a resolved stream over to an external transcoder.

pub mod ffmpeg;

use crate::error::{Error, Result};
use std::path::Path;

pub use ffmpeg::Ffmpeg;

/// Fetches `input_url` and writes the encoded result to `out`.
pub trait Transcoder {
    async fn transcode(&self, input_url: &str, out: &Path) -> Result<()>;
}

/// Remove a previous file at `out` so the transcoder starts from scratch.
pub async fn clear_destination(out: &Path) -> Result<()> {
    match tokio::fs::remove_file(out).await {
        Ok(()) => {
            tracing::info!(path = %out.display(), "removed existing output file");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::Io {
            path: out.to_path_buf(),
            source,
        }),
    }
}

/// Overwrite `out` with the transcoded stream.
pub async fn save<T: Transcoder>(transcoder: &T, input_url: &str, out: &Path) -> Result<()> {
    clear_destination(out).await?;
    transcoder.transcode(input_url, out).await
}
