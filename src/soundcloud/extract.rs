//! Track metadata from the hydration payload embedded in a SoundCloud page.
//!
//! The page assigns a JSON array to `window.__sc_hydration` inside a
//! `<script>` element. The array holds heterogeneous records and we rely on
//! their positions: record 7 is the track, the last one carries the
//! `track_authorization`. All knowledge of that layout lives in
//! [`HydrationPayload`].

use crate::error::{Error, Result};
use crate::soundcloud::api::DEFAULT_API_BASE;
use crate::soundcloud::models::Track;
use scraper::{Html, Selector};
use serde_json::Value;

const HYDRATION_MARKER: &str = "window.__sc_hydration";
const TRACK_RECORD: usize = 7;
const PROGRESSIVE_SUFFIX: &str = "stream/progressive";

/// Parse a track page into a [`Track`].
pub fn track_from_html(html: &str) -> Result<Track> {
    let raw = find_hydration_json(html)?;
    let value: Value = serde_json::from_str(&raw)
        .map_err(|e| Error::format(format!("hydration payload is not json: {e}")))?;
    HydrationPayload::new(&value)?.track()
}

/// Locate the hydration script and return the JSON literal it assigns.
pub fn find_hydration_json(html: &str) -> Result<String> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("script")
        .map_err(|e| Error::format(format!("script selector: {e:?}")))?;

    let script = doc
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .find(|text| text.contains(HYDRATION_MARKER))
        .ok_or_else(|| Error::format(format!("no <script> containing {HYDRATION_MARKER}")))?;

    strip_assignment(&script).map(str::to_string)
}

fn strip_assignment(script: &str) -> Result<&str> {
    let at = script
        .find(HYDRATION_MARKER)
        .ok_or_else(|| Error::format(format!("{HYDRATION_MARKER} not assigned")))?;
    let rest = script[at + HYDRATION_MARKER.len()..].trim_start();
    let rest = rest
        .strip_prefix('=')
        .ok_or_else(|| Error::format(format!("{HYDRATION_MARKER} not assigned")))?;
    let rest = rest.trim();
    Ok(rest.strip_suffix(';').unwrap_or(rest).trim_end())
}

/// Named access to the positional records of a hydration payload.
#[derive(Debug)]
pub struct HydrationPayload<'a> {
    track: &'a Value,
    auth: &'a Value,
}

impl<'a> HydrationPayload<'a> {
    pub fn new(value: &'a Value) -> Result<Self> {
        let records = value
            .as_array()
            .ok_or_else(|| Error::format("hydration payload is not an array"))?;
        let track = records
            .get(TRACK_RECORD)
            .ok_or_else(|| {
                Error::format(format!(
                    "hydration payload has {} records, track record {TRACK_RECORD} missing",
                    records.len()
                ))
            })?;
        let auth = records
            .last()
            .ok_or_else(|| Error::format("hydration payload is empty"))?;
        Ok(Self { track, auth })
    }

    pub fn id(&self) -> Result<String> {
        match self.track.pointer("/data/id") {
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            _ => Err(missing("[7].data.id")),
        }
    }

    pub fn title(&self) -> Result<String> {
        text_at(self.track, "/data/title", "[7].data.title")
    }

    pub fn username(&self) -> Result<String> {
        text_at(self.track, "/data/user/username", "[7].data.user.username")
    }

    /// URL of the first transcoding; any further variants are ignored.
    pub fn first_transcoding_url(&self) -> Result<String> {
        text_at(
            self.track,
            "/data/media/transcodings/0/url",
            "[7].data.media.transcodings[0].url",
        )
    }

    pub fn track_authorization(&self) -> Result<String> {
        text_at(self.auth, "/data/track_authorization", "[-1].data.track_authorization")
    }

    pub fn track(&self) -> Result<Track> {
        let id = self.id()?;
        let track_url = media_url(&id, &self.first_transcoding_url()?)?;
        Ok(Track {
            name: self.title()?,
            artist_name: self.username()?,
            track_auth_token: self.track_authorization()?,
            track_url,
            id,
        })
    }
}

fn text_at(v: &Value, pointer: &str, label: &str) -> Result<String> {
    v.pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| missing(label))
}

fn missing(label: &str) -> Error {
    Error::format(format!("hydration payload lacks {label}"))
}

/// Rebuild the progressive media-info URL for `id` from a transcoding URL.
///
/// Only the path segment after `soundcloud:tracks:{id}/` is kept, so a
/// progressive seed comes back unchanged and other variants are normalized.
pub fn media_url(id: &str, seed: &str) -> Result<String> {
    let prefix = media_prefix(id);
    let segment = seed
        .strip_prefix(&prefix)
        .and_then(|rest| rest.split('/').next())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::format(format!("transcoding url {seed} is not under {prefix}")))?;
    Ok(format!("{prefix}{segment}/{PROGRESSIVE_SUFFIX}"))
}

fn media_prefix(id: &str) -> String {
    format!("{DEFAULT_API_BASE}/media/soundcloud:tracks:{id}/")
}
