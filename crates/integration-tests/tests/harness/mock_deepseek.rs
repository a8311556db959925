//! Mock DeepSeek backend for integration tests
//!
//! Serves `POST /chat/completions` with a canned reply and records every
//! request body and bearer token it receives.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// What the mock answers with
#[derive(Debug, Clone)]
pub struct MockReply {
    /// Assistant message content
    pub content: String,
    /// Native finish reason
    pub finish_reason: Option<String>,
    /// Whether to report usage counters
    pub with_usage: bool,
    /// Fail with this status instead of replying
    pub fail_with: Option<StatusCode>,
}

impl MockReply {
    /// A plain text reply with usage and `stop`
    pub fn text(content: &str) -> Self {
        Self {
            content: content.to_owned(),
            finish_reason: Some("stop".to_owned()),
            with_usage: true,
            fail_with: None,
        }
    }

    /// Drop the usage block from the reply
    #[must_use]
    pub fn without_usage(mut self) -> Self {
        self.with_usage = false;
        self
    }

    /// Report a specific finish reason
    #[must_use]
    pub fn finish_reason(mut self, reason: Option<&str>) -> Self {
        self.finish_reason = reason.map(str::to_owned);
        self
    }

    /// An error status with a short body
    pub fn failing(status: StatusCode) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::text("")
        }
    }
}

/// Captured request
#[derive(Debug, Clone)]
pub struct Received {
    /// Bearer token from the `Authorization` header
    pub bearer: Option<String>,
    /// JSON request body
    pub body: Value,
}

struct MockState {
    reply: MockReply,
    received: Mutex<Vec<Received>>,
}

/// Mock DeepSeek server bound to an ephemeral port
pub struct MockDeepSeek {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockDeepSeek {
    /// Start the mock server, returning immediately
    pub async fn start(reply: MockReply) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            reply,
            received: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/chat/completions", routing::post(handle_chat_completions))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Endpoint to configure as the provider URL
    pub fn url(&self) -> String {
        format!("http://{}/chat/completions", self.addr)
    }

    /// Requests received so far
    pub fn received(&self) -> Vec<Received> {
        self.state.received.lock().unwrap().clone()
    }
}

impl Drop for MockDeepSeek {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_chat_completions(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned);

    let model = body["model"].as_str().unwrap_or("deepseek-coder").to_owned();
    state.received.lock().unwrap().push(Received { bearer, body });

    let reply = &state.reply;
    if let Some(status) = reply.fail_with {
        return (status, "mock upstream failure").into_response();
    }

    let mut response = json!({
        "id": "mock-completion",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": reply.content},
            "finish_reason": reply.finish_reason,
        }],
    });

    if reply.with_usage {
        response["usage"] = json!({"prompt_tokens": 11, "completion_tokens": 5, "total_tokens": 16});
    }

    Json(response).into_response()
}
