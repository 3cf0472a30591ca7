use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::settings::Settings;

/// Load the reference page: a saved file when `source_file` is set, otherwise an HTTP GET.
pub async fn load(settings: &Settings) -> Result<String> {
    match &settings.source_file {
        Some(path) => read_file(path),
        None => fetch(&settings.source_url, settings).await,
    }
}

pub fn read_file(path: &Path) -> Result<String> {
    info!("Reading ISO 3166 page from {}", path.display());
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub async fn fetch(url: &str, settings: &Settings) -> Result<String> {
    let client = reqwest::Client::builder()
        .user_agent(&settings.user_agent)
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    info!("Fetching ISO 3166 page: {}", url);
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]")?);
    pb.set_message(format!("GET {}", url));
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = get_text(&client, url).await;
    pb.finish_and_clear();

    let body = result?;
    debug!("Fetched {} bytes", body.len());
    Ok(body)
}

async fn get_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;

    let status = response.status();
    if !status.is_success() {
        bail!(
            "Failed to fetch {}: HTTP {} {}",
            url,
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        );
    }

    response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from {}", url))
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use config::Environment;

    use super::*;

    fn settings_for(file: Option<&Path>) -> Settings {
        let mut map = std::collections::HashMap::new();
        if let Some(p) = file {
            map.insert("FLAGS_SOURCE_FILE".to_string(), p.display().to_string());
        }
        Settings::from_env(Environment::with_prefix("FLAGS").source(Some(map))).unwrap()
    }

    #[tokio::test]
    async fn load_prefers_source_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "<table></table>").unwrap();
        let html = load(&settings_for(Some(f.path()))).await.unwrap();
        assert_eq!(html, "<table></table>");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_file(Path::new("tests/fixtures/does_not_exist.html")).unwrap_err();
        assert!(format!("{:#}", err).contains("does_not_exist.html"));
    }

    #[tokio::test]
    async fn unreachable_host_fails() {
        let mut s = settings_for(None);
        s.timeout_secs = 2;
        let res = fetch("http://127.0.0.1:9/ISO_3166-1_alpha-2", &s).await;
        assert!(res.is_err());
    }

    /// Serve `response` to the first connection on a local port; returns the page URL.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{}/wiki/ISO_3166-1_alpha-2", addr)
    }

    fn local_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn ok_status_returns_body() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 15\r\n\
             Connection: close\r\n\r\n<table></table>",
        );
        let body = get_text(&local_client(), &url).await.unwrap();
        assert_eq!(body, "<table></table>");
    }

    #[tokio::test]
    async fn not_found_status_is_an_error() {
        let url = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot found",
        );
        let err = get_text(&local_client(), &url).await.unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("HTTP 404 Not Found"), "{}", msg);
        assert!(msg.contains(&url));
    }

    #[tokio::test]
    async fn server_error_status_is_an_error() {
        let url = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        let err = get_text(&local_client(), &url).await.unwrap_err();
        assert!(format!("{:#}", err).contains("HTTP 503 Service Unavailable"));
    }
}
