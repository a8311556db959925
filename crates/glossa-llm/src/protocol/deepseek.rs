//! DeepSeek chat-completions wire format (OpenAI-shaped)

use serde::{Deserialize, Serialize};

use super::ProviderMessage;

// -- Request types --

/// Chat-completions request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepSeekRequest {
    /// Conversation turns
    pub messages: Vec<ProviderMessage>,
    /// Model identifier
    pub model: String,
    /// Frequency penalty
    pub frequency_penalty: f64,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Presence penalty
    pub presence_penalty: f64,
    /// Stop sequences, always null
    pub stop: Option<Vec<String>>,
    /// Streaming flag, always false
    pub stream: bool,
    /// Sampling temperature
    pub temperature: f64,
    /// Nucleus sampling threshold
    pub top_p: f64,
    /// Whether to return log probabilities
    pub logprobs: bool,
    /// Number of top log probabilities
    pub top_logprobs: Option<u32>,
}

// -- Response types --

/// Chat-completions reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepSeekResponse {
    /// Completion identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Model that produced the reply
    #[serde(default)]
    pub model: Option<String>,
    /// Generated choices
    pub choices: Vec<DeepSeekChoice>,
    /// Token accounting
    #[serde(default)]
    pub usage: Option<DeepSeekUsage>,
}

/// A single reply choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepSeekChoice {
    /// Choice index
    #[serde(default)]
    pub index: u32,
    /// Generated message
    pub message: DeepSeekMessage,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message inside a reply choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepSeekMessage {
    /// Message role
    pub role: String,
    /// Text content
    #[serde(default)]
    pub content: Option<String>,
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DeepSeekUsage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Tokens generated in the completion
    pub completion_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}
