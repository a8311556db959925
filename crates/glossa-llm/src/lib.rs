//! Protocol adapter core for Glossa
//!
//! Lets callers speak one canonical chat-completion format to providers with
//! different role rules and no native function calling. Tool catalogs are
//! rendered into a textual invocation grammar on the way out, and textual
//! invocations are parsed back into structured function calls on the way in.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod credentials;
pub mod envelope;
pub mod error;
pub mod grammar;
pub mod protocol;
pub mod provider;
pub mod tokenizer;
pub mod transport;
pub mod types;

pub use credentials::Credentials;
pub use error::{LlmError, ParseError};
pub use grammar::DetectionMode;
pub use provider::{Adapter, AdapterSettings, Claude, DeepSeek, Dialect, Overrides, PreparedRequest, Provider};
pub use tokenizer::{TiktokenCounter, Tokenizer};
pub use transport::{HttpTransport, Transport, TransportRequest};
pub use types::{ChatRequest, CompletionResponse, FinishReason, FunctionCall, Message, Role};
