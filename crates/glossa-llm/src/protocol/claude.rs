//! Anthropic model body for the Bedrock "invoke model" API

use serde::{Deserialize, Serialize};

use super::ProviderMessage;

/// Version marker Bedrock requires in every Anthropic request body
pub const BEDROCK_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

// -- Request types --

/// Anthropic messages request as accepted by Bedrock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaudeRequest {
    /// API version marker
    pub anthropic_version: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Conversation turns
    pub messages: Vec<ProviderMessage>,
    /// Sampling temperature
    pub temperature: f64,
    /// System prompt (top-level, not in messages)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

// -- Response types --

/// Anthropic messages reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaudeResponse {
    /// Message identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Model that produced the reply
    #[serde(default)]
    pub model: Option<String>,
    /// Content blocks
    pub content: Vec<ClaudeContentBlock>,
    /// Why generation stopped
    #[serde(default)]
    pub stop_reason: Option<String>,
    /// Matched stop sequence, if any
    #[serde(default)]
    pub stop_sequence: Option<String>,
    /// Token accounting
    #[serde(default)]
    pub usage: Option<ClaudeUsage>,
}

/// Content block in a reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaudeContentBlock {
    /// Block type ("text" for plain text)
    #[serde(rename = "type")]
    pub block_type: String,
    /// Text for text blocks
    #[serde(default)]
    pub text: Option<String>,
}

/// Anthropic usage statistics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ClaudeUsage {
    /// Input tokens consumed
    pub input_tokens: u32,
    /// Output tokens generated
    pub output_tokens: u32,
}
