use crate::error::{Error, Result};
use crate::soundcloud::api::SoundcloudClient;
use crate::soundcloud::models::Track;
use std::time::Duration;

/// Classification of one media-info response body.
///
/// The endpoint has no pending status; a JSON body without `url` is the only
/// hint that the CDN is still warming up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CdnResponse {
    Ready(String),
    NotReady,
    Malformed(String),
}

impl CdnResponse {
    pub fn classify(body: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(v) => match v.get("url").and_then(|u| u.as_str()) {
                Some(url) if !url.is_empty() => Self::Ready(url.to_string()),
                _ => Self::NotReady,
            },
            Err(e) => Self::Malformed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub url: String,
    /// Requests made, including the successful one.
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    max_retries: u32,
    interval: Duration,
}

impl Resolver {
    pub const DEFAULT_MAX_RETRIES: u32 = 10;
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    pub fn new(max_retries: u32, interval: Duration) -> Self {
        Self {
            max_retries,
            interval,
        }
    }

    /// Poll the media-info endpoint until it hands out a download URL.
    ///
    /// Only [`CdnResponse::NotReady`] is retried, with a fixed pause between
    /// attempts. Transport errors and non-JSON bodies end the loop at once.
    pub async fn resolve(
        &self,
        client: &SoundcloudClient,
        track: &Track,
        client_id: &str,
    ) -> Result<Resolved> {
        for attempt in 1..=self.max_retries {
            match client
                .media_info(&track.track_url, client_id, &track.track_auth_token)
                .await?
            {
                CdnResponse::Ready(url) => {
                    tracing::debug!(attempt, "cdn url resolved");
                    return Ok(Resolved {
                        url,
                        attempts: attempt,
                    });
                }
                CdnResponse::Malformed(reason) => {
                    return Err(Error::Malformed {
                        url: track.track_url.clone(),
                        reason,
                    });
                }
                CdnResponse::NotReady => {
                    tracing::info!(attempt, max_retries = self.max_retries, "cdn not ready");
                    if attempt < self.max_retries {
                        println!("cdn not ready, retrying...");
                        tokio::time::sleep(self.interval).await;
                    }
                }
            }
        }

        Err(Error::RetryBudgetExceeded {
            max_retries: self.max_retries,
        })
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_RETRIES, Self::DEFAULT_INTERVAL)
    }
}
