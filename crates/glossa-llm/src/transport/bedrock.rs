//! AWS Bedrock "invoke model" transport

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_smithy_types::Blob;

use super::{Transport, TransportRequest};
use crate::credentials::Credentials;
use crate::error::LlmError;

/// Region used when none is configured
pub const DEFAULT_REGION: &str = "us-east-1";

/// Invokes a Bedrock model with the caller's access key pair
///
/// A client is built per call because credentials arrive with each request.
#[derive(Debug, Clone)]
pub struct BedrockTransport {
    region: String,
}

impl BedrockTransport {
    /// Transport for the given region
    pub fn new(region: impl Into<String>) -> Self {
        Self { region: region.into() }
    }

    /// Configured region
    pub fn region(&self) -> &str {
        &self.region
    }

    async fn client(&self, credentials: &Credentials) -> Result<BedrockClient, LlmError> {
        let access_key = credentials.require_key()?;
        let secret_key = credentials.require_secret()?;

        let credentials = aws_credential_types::Credentials::new(access_key, secret_key, None, None, "glossa-config");

        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(self.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        Ok(BedrockClient::new(&aws_config))
    }
}

impl Default for BedrockTransport {
    fn default() -> Self {
        Self::new(DEFAULT_REGION)
    }
}

#[async_trait]
impl Transport for BedrockTransport {
    async fn send(&self, request: TransportRequest<'_>) -> Result<Vec<u8>, LlmError> {
        let client = self.client(request.credentials).await?;

        let output = client
            .invoke_model()
            .model_id(request.model)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request.body))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(region = %self.region, model = %request.model, error = %e, "bedrock invoke_model failed");
                LlmError::Transport(e.to_string())
            })?;

        Ok(output.body().as_ref().to_vec())
    }
}
