use crate::{Error, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, StatusCode};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, info};

/// HTTP client for fetching published search artifacts
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a new fetcher with a 30 second request timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Creates a new fetcher with a custom request timeout (primarily for tests)
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("docseek/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client })
    }

    /// Fetches a URL as text
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("Requesting {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(format!(
                    "No search artifact at '{url}'. Check the index location or rebuild the site"
                )));
            }

            return Err(match response.error_for_status() {
                Err(err) => Error::Network(err),
                Ok(_) => Error::Other(format!("Unexpected status {status} from '{url}'")),
            });
        }

        let content = response.text().await?;
        info!(
            "Fetched {} bytes from {} (sha256 {})",
            content.len(),
            url,
            calculate_sha256(&content)
        );

        Ok(content)
    }
}

/// Base64-encoded SHA-256 digest of `content`.
pub(crate) fn calculate_sha256(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    STANDARD.encode(result)
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::disallowed_macros,
    clippy::unwrap_used,
    clippy::unnecessary_wraps
)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_text_success() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        let body = r#"{"version":1}"#;

        Mock::given(method("GET"))
            .and(path("/search/index.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let fetcher = Fetcher::new()?;
        let url = format!("{}/search/index.json", mock_server.uri());

        assert_eq!(fetcher.fetch_text(&url).await?, body);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ua"))
            .and(header(
                "user-agent",
                concat!("docseek/", env!("CARGO_PKG_VERSION")),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = Fetcher::new()?;
        fetcher
            .fetch_text(&format!("{}/ua", mock_server.uri()))
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_error_statuses_map_to_categories() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        let routes = [("/missing.json", 404), ("/broken.json", 500), ("/denied.json", 403)];
        for (route, status) in routes {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(status))
                .mount(&mock_server)
                .await;
        }

        let fetcher = Fetcher::new()?;
        let base = mock_server.uri();

        let missing = fetcher
            .fetch_text(&format!("{base}/missing.json"))
            .await
            .unwrap_err();
        assert!(matches!(&missing, Error::NotFound(msg) if msg.contains("missing.json")));
        assert!(!missing.is_recoverable());

        for route in ["/broken.json", "/denied.json"] {
            let err = fetcher.fetch_text(&format!("{base}{route}")).await.unwrap_err();
            assert_eq!(err.category(), "network", "{route}: {err}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_timeout() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{}")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let fetcher = Fetcher::with_timeout(Duration::from_millis(100))?;
        let url = format!("{}/slow.json", mock_server.uri());

        let err = fetcher.fetch_text(&url).await.unwrap_err();
        assert!(err.is_recoverable(), "timeouts are retryable: {err}");
        Ok(())
    }

    #[test]
    fn test_sha256_calculation() {
        assert_eq!(calculate_sha256("").len(), 44);
        assert_eq!(
            calculate_sha256(""),
            "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
        );
    }
}
