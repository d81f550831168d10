use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The page or API no longer matches the layout we decode.
    #[error("unexpected page format: {0}")]
    Format(String),

    #[error("media info from {url} is not json: {reason}")]
    Malformed { url: String, reason: String },

    #[error("max_retries={max_retries} exceeded, giving up on cdn resolution")]
    RetryBudgetExceeded { max_retries: u32 },

    #[error("output file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("spawn {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed with {status}")]
    Transcode { program: String, status: ExitStatus },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
}
