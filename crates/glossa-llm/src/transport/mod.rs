//! Transport collaborators that carry a provider body over the network

#[cfg(feature = "bedrock")]
pub mod bedrock;
pub mod http;

use std::sync::Arc;

use async_trait::async_trait;

#[cfg(feature = "bedrock")]
pub use self::bedrock::BedrockTransport;
pub use self::http::HttpTransport;
use crate::credentials::Credentials;
use crate::error::LlmError;

/// A fully built provider request
#[derive(Debug)]
pub struct TransportRequest<'a> {
    /// Provider model identifier
    pub model: &'a str,
    /// Serialized provider body
    pub body: Vec<u8>,
    /// Caller credentials for authenticating the call
    pub credentials: &'a Credentials,
}

/// Sends a provider body and returns the raw reply body
///
/// Timeouts, retries and endpoint selection belong to the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one authenticated request
    async fn send(&self, request: TransportRequest<'_>) -> Result<Vec<u8>, LlmError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: TransportRequest<'_>) -> Result<Vec<u8>, LlmError> {
        (**self).send(request).await
    }
}
