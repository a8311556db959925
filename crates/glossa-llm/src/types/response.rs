use serde::{Deserialize, Serialize};

use super::message::FunctionCall;

/// Reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of generation
    Stop,
    /// Hit the token ceiling
    Length,
    /// Reply was decoded as a function call
    FunctionCall,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Tokens generated in the completion
    pub completion_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

/// A single completion choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Index of this choice, always 0
    pub index: u32,
    /// Generated message
    pub message: ChoiceMessage,
    /// Why generation stopped, null when the provider reason is unknown
    pub finish_reason: Option<FinishReason>,
}

/// Message content within a response choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    /// Role is always assistant for completions
    pub role: String,
    /// Text content
    pub content: Option<String>,
    /// Function call decoded from the reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
}

impl ChoiceMessage {
    /// Create a simple text message from the assistant
    pub fn text(content: String) -> Self {
        Self {
            role: "assistant".to_owned(),
            content: Some(content),
            function_call: None,
        }
    }

    /// Create a function-calling message from the assistant
    pub fn with_function_call(call: FunctionCall) -> Self {
        Self {
            role: "assistant".to_owned(),
            content: None,
            function_call: Some(call),
        }
    }
}

/// Canonical completion response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Time-derived response identifier
    pub id: String,
    /// Object type ("chat.completion")
    pub object: String,
    /// Unix timestamp of creation
    pub created: u64,
    /// Model used for generation
    pub model: String,
    /// Token usage statistics
    pub usage: Usage,
    /// Generated choices, always exactly one
    pub choices: Vec<Choice>,
}
