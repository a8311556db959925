//! In-memory transport for providers that are not reachable over plain HTTP

use std::sync::Mutex;

use async_trait::async_trait;
use glossa_llm::{LlmError, Transport, TransportRequest};
use serde_json::Value;

/// Records each body and answers with a fixed reply
pub struct RecordingTransport {
    reply: Value,
    sent: Mutex<Vec<(String, Value)>>,
}

impl RecordingTransport {
    /// Transport that always answers with `reply`
    pub fn new(reply: Value) -> Self {
        Self {
            reply,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Model ids and bodies sent so far
    pub fn sent(&self) -> Vec<(String, Value)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: TransportRequest<'_>) -> Result<Vec<u8>, LlmError> {
        let body: Value = serde_json::from_slice(&request.body).map_err(|e| LlmError::Internal(e.into()))?;
        self.sent.lock().unwrap().push((request.model.to_owned(), body));
        serde_json::to_vec(&self.reply).map_err(|e| LlmError::Internal(e.into()))
    }
}
