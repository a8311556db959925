//! Bearer-authenticated JSON over HTTP

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use super::{Transport, TransportRequest};
use crate::error::LlmError;

/// Posts the body to a fixed endpoint with `Authorization: Bearer <key>`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: Url,
}

impl HttpTransport {
    /// Transport for the given endpoint
    pub fn new(url: Url) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }

    /// Parse the endpoint from a string
    pub fn from_url(url: &str) -> Result<Self, LlmError> {
        let url = Url::parse(url).map_err(|e| LlmError::Config(format!("invalid endpoint `{url}`: {e}")))?;
        Ok(Self::new(url))
    }

    /// Endpoint the transport posts to
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest<'_>) -> Result<Vec<u8>, LlmError> {
        let api_key = request.credentials.require_key()?;

        let response = self
            .client
            .post(self.url.clone())
            .bearer_auth(api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(request.body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %self.url, model = %request.model, error = %e, "upstream request failed");
                LlmError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url = %self.url, status = %status, "upstream returned error");
            return Err(LlmError::Transport(format!("provider returned {status}: {body}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LlmError::Transport(format!("failed to read response body: {e}")))?;

        Ok(bytes.to_vec())
    }
}
