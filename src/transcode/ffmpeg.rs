use crate::error::{Error, Result};
use crate::transcode::Transcoder;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Runs `<program> -i <url> <out>` with all output discarded.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: PathBuf,
}

impl Ffmpeg {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn name(&self) -> String {
        self.program.display().to_string()
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Transcoder for Ffmpeg {
    async fn transcode(&self, input_url: &str, out: &Path) -> Result<()> {
        tracing::debug!(program = %self.name(), out = %out.display(), "starting transcoder");
        let status = Command::new(&self.program)
            .arg("-i")
            .arg(input_url)
            .arg(out)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| Error::Spawn {
                program: self.name(),
                source,
            })?;

        if !status.success() {
            return Err(Error::Transcode {
                program: self.name(),
                status,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_program_fails_to_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let ff = Ffmpeg::new(dir.path().join("no-such-transcoder"));
        let err = ff
            .transcode("https://cdn.example/final.mp3", &dir.path().join("out.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = Ffmpeg::new("false")
            .transcode("https://cdn.example/final.mp3", &dir.path().join("out.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transcode { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn zero_exit_is_success() {
        let dir = tempfile::tempdir().unwrap();
        Ffmpeg::new("true")
            .transcode("https://cdn.example/final.mp3", &dir.path().join("out.mp3"))
            .await
            .unwrap();
    }
}
