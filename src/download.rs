use crate::error::{Error, Result};
use crate::soundcloud::extract;
use crate::soundcloud::{Resolver, SoundcloudClient, Track};
use crate::transcode::{self, Transcoder};
use std::path::{Path, PathBuf};

/// Parameters for a single run.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    pub page_url: &'a str,
    pub client_id: &'a str,
    pub out_file: Option<&'a Path>,
    pub resolver: Resolver,
}

/// `"My Song"` becomes `My_Song.mp3`.
pub fn default_file_name(track_name: &str) -> String {
    let stem: String = track_name
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    format!("{stem}.mp3")
}

pub fn output_path(track: &Track, out_file: Option<&Path>) -> Result<PathBuf> {
    let rel = match out_file {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(default_file_name(&track.name)),
    };
    std::path::absolute(&rel).map_err(|source| Error::Io { path: rel, source })
}

/// Fetch, extract, resolve and transcode one track. Returns the written path.
pub async fn run<T: Transcoder>(
    client: &SoundcloudClient,
    transcoder: &T,
    req: &Request<'_>,
) -> Result<PathBuf> {
    let html = client.fetch_page(req.page_url).await?;
    let track = extract::track_from_html(&html)?;
    tracing::debug!(id = %track.id, track_url = %track.track_url, "extracted track");

    println!("downloading \"{} - {}\"", track.artist_name, track.name);
    println!("using client_id \"{}\"", req.client_id);

    let out = output_path(&track, req.out_file)?;

    let resolved = req.resolver.resolve(client, &track, req.client_id).await?;
    tracing::debug!(attempts = resolved.attempts, "stream data received");
    println!("stream data received, downloading...");

    transcode::save(transcoder, &resolved.url, &out).await?;

    println!("successfully downloaded to {}", out.display());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use crate::transcode::tests::Recorder;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = include_str!("soundcloud/testdata/track_page.html");

    #[test]
    fn default_name_replaces_spaces() {
        assert_eq!(default_file_name("My Song"), "My_Song.mp3");
        assert_eq!(default_file_name("Sample Title"), "Sample_Title.mp3");
        assert_eq!(default_file_name("AC/DC live"), "AC_DC_live.mp3");
    }

    #[test]
    fn explicit_out_file_wins() {
        let track = Track {
            id: "1".to_string(),
            name: "My Song".to_string(),
            artist_name: "A".to_string(),
            track_url: "u".to_string(),
            track_auth_token: "t".to_string(),
        };
        let dir = tempfile::tempdir().unwrap();
        let wanted = dir.path().join("x.flac");
        assert_eq!(output_path(&track, Some(&wanted)).unwrap(), wanted);

        let default = output_path(&track, None).unwrap();
        assert!(default.is_absolute());
        assert_eq!(default.file_name().unwrap(), "My_Song.mp3");
    }

    #[tokio::test]
    async fn page_to_transcoder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sample-artist/sample-title"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/media/soundcloud:tracks:291783692/abc123/stream/progressive"))
            .and(query_param("client_id", "cid"))
            .and(query_param("track_authorization", "sample-auth-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"url": "https://cdn.example/final.mp3"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = SoundcloudClient::new(&HttpConfig::default(), &server.uri()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("Sample_Title.mp3");
        let page_url = format!("{}/sample-artist/sample-title", server.uri());
        let req = Request {
            page_url: &page_url,
            client_id: "cid",
            out_file: Some(&out),
            resolver: Resolver::new(10, Duration::from_millis(1)),
        };
        let rec = Recorder::default();

        let written = run(&client, &rec, &req).await.unwrap();

        assert_eq!(written, out);
        let calls = rec.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "https://cdn.example/final.mp3");
        assert_eq!(calls[0].1.file_name().unwrap(), "Sample_Title.mp3");
    }

    #[tokio::test]
    async fn default_out_file_comes_from_title() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sample-artist/sample-title"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/media/soundcloud:tracks:291783692/abc123/stream/progressive"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"url": "https://cdn.example/final.mp3"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = SoundcloudClient::new(&HttpConfig::default(), &server.uri()).unwrap();
        let page_url = format!("{}/sample-artist/sample-title", server.uri());
        let req = Request {
            page_url: &page_url,
            client_id: "cid",
            out_file: None,
            resolver: Resolver::new(10, Duration::from_millis(1)),
        };
        let rec = Recorder::default();

        let written = run(&client, &rec, &req).await.unwrap();

        assert!(written.is_absolute());
        assert_eq!(written.file_name().unwrap(), "Sample_Title.mp3");
        let calls = rec.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "https://cdn.example/final.mp3");
        assert_eq!(calls[0].1, written);
    }

    #[tokio::test]
    async fn unavailable_track_stops_before_resolving() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>gone</body></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = SoundcloudClient::new(&HttpConfig::default(), &server.uri()).unwrap();
        let page_url = format!("{}/private", server.uri());
        let req = Request {
            page_url: &page_url,
            client_id: "cid",
            out_file: None,
            resolver: Resolver::default(),
        };
        let rec = Recorder::default();

        let err = run(&client, &rec, &req).await.unwrap_err();
        assert!(matches!(err, Error::Format(_)));
        assert!(rec.calls.lock().unwrap().is_empty());
    }
}
