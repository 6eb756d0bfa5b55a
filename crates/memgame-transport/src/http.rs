//! HTTPS transport implementation using `reqwest`.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, Url};

use crate::{HttpTransport, TransportError};

/// A [`HttpTransport`] that talks to the backend over HTTP(S).
///
/// Cloning is cheap: `reqwest::Client` is reference-counted internally.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Creates a transport rooted at `base_url` (e.g. `https://host/api`).
    ///
    /// # Errors
    /// [`TransportError::InvalidUrl`] if the base URL does not parse,
    /// [`TransportError::Request`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{base_url}: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        tracing::debug!(%base_url, ?timeout, "http transport ready");
        Ok(Self { client, base_url })
    }

    /// The API root every request path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<u8>, TransportError> {
        let url = self.url(path);
        tracing::trace!(%url, ?query, "GET");
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        read_body(response).await
    }

    async fn post(
        &self,
        path: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        let url = self.url(path);
        tracing::trace!(%url, bytes = body.len(), "POST");
        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        read_body(response).await
    }
}

async fn read_body(response: Response) -> Result<Vec<u8>, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| TransportError::Request(e.to_string()))?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_unparseable_base_url() {
        let result = ReqwestTransport::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let t = ReqwestTransport::new("https://example.com/api/", Duration::from_secs(1))
            .expect("valid url");
        assert_eq!(t.url("/games/save"), "https://example.com/api/games/save");
        assert_eq!(t.url("login"), "https://example.com/api/login");
    }

    #[tokio::test]
    async fn test_get_unreachable_host_is_request_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let t = ReqwestTransport::new("http://127.0.0.1:9/api", Duration::from_secs(2))
            .expect("valid url");
        let result = t.get("/games/leaderboard/global", &[]).await;
        assert!(matches!(result, Err(TransportError::Request(_))));
    }
}
