use crate::error::{AiError, AiResult};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 60,
            user_agent: format!("xml-studio/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Async HTTP client used by the remote collaborators.
///
/// Requests are sent once. Failures are returned to the caller as-is.
pub struct AsyncHttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl AsyncHttpClient {
    /// Create a new async HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> AiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(AiError::from)?;

        Ok(Self { client, config })
    }

    /// POST a JSON body and decode a JSON reply.
    ///
    /// Credentials belong in `headers`, never in `url`. Header values are not
    /// logged, and transport errors are stripped of their URL.
    pub async fn post_json<B, R>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &B,
    ) -> AiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!("POST {}", url);

        let response = self.make_request(url, headers, body).await?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        debug!("Response status from {}: {}", url, status);

        if !status.is_success() {
            error!("Request to {} failed: {} - {}", url, status, text);
            return Err(AiError::HttpStatus {
                status: status.as_u16(),
                message: format!(
                    "{}: {}",
                    status.canonical_reason().unwrap_or("Unknown"),
                    text
                ),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            error!("Failed to decode response from {}: {}", url, e);
            AiError::from(e)
        })
    }

    /// Make a single HTTP request with timeout
    async fn make_request<B>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &B,
    ) -> AiResult<Response>
    where
        B: Serialize + ?Sized,
    {
        let request_future = headers
            .iter()
            .fold(self.client.post(url), |request, (name, value)| {
                request.header(*name, *value)
            })
            .json(body)
            .send();

        timeout(
            Duration::from_secs(self.config.timeout_seconds),
            request_future,
        )
        .await
        .map_err(|_| AiError::Timeout {
            timeout_seconds: self.config.timeout_seconds,
        })?
        .map_err(transport_error)
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

fn transport_error(e: reqwest::Error) -> AiError {
    AiError::Http(e.without_url())
}
