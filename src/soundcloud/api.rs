use crate::config::HttpConfig;
use crate::error::{Error, Result};
use crate::soundcloud::resolve::CdnResponse;
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api-v2.soundcloud.com";

#[derive(Debug, Clone)]
pub struct SoundcloudClient {
    http: reqwest::Client,
    api_base: String,
}

impl SoundcloudClient {
    pub fn new(http_cfg: &HttpConfig, api_base: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(ua) = http_cfg.user_agent.as_deref() {
            headers.insert(USER_AGENT, HeaderValue::from_str(ua).context("user agent header")?);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(http_cfg.timeout_secs))
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// GET a track page and return its HTML.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let fetch = |source: reqwest::Error| Error::Fetch {
            url: url.to_string(),
            source,
        };

        tracing::debug!(url, "fetching track page");
        self.http
            .get(url)
            .send()
            .await
            .map_err(fetch)?
            .error_for_status()
            .map_err(fetch)?
            .text()
            .await
            .map_err(fetch)
    }

    /// One request against the media-info endpoint.
    pub async fn media_info(
        &self,
        track_url: &str,
        client_id: &str,
        track_auth_token: &str,
    ) -> Result<CdnResponse> {
        let url = format!(
            "{}?client_id={}&track_authorization={}",
            self.rebase(track_url),
            urlencoding::encode(client_id),
            urlencoding::encode(track_auth_token)
        );
        let fetch = |source: reqwest::Error| Error::Fetch {
            url: track_url.to_string(),
            source,
        };

        let body = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(fetch)?
            .error_for_status()
            .map_err(fetch)?
            .text()
            .await
            .map_err(fetch)?;

        Ok(CdnResponse::classify(&body))
    }

    // Track URLs always carry the public API host; requests may go elsewhere.
    fn rebase(&self, track_url: &str) -> String {
        match track_url.strip_prefix(DEFAULT_API_BASE) {
            Some(path) => format!("{}{path}", self.api_base),
            None => track_url.to_string(),
        }
    }
}
