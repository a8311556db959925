//! Canonical types for chat-completion requests and responses
//!
//! These are the records the outer driver speaks natively. Every provider
//! adapter converts to and from them.

pub mod message;
pub mod request;
pub mod response;
pub mod tool;

pub use message::{FunctionCall, Message, Role};
pub use request::ChatRequest;
pub use response::{Choice, ChoiceMessage, CompletionResponse, FinishReason, Usage};
pub use tool::{FunctionDefinition, ParameterSchema};
