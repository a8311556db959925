//! Translate a decoded provider reply into the canonical response envelope

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::error::LlmError;
use crate::grammar::{DetectionMode, is_tool_invocation, parse_invocation, to_canonical_fence};
use crate::tokenizer::Tokenizer;
use crate::types::{Choice, ChoiceMessage, CompletionResponse, FinishReason, Usage};

/// Provider reply reduced to what the envelope needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderReply {
    /// Raw completion text
    pub text: String,
    /// Usage counters, when the provider reported them
    pub usage: Option<Usage>,
    /// Provider-native stop reason
    pub stop_reason: Option<String>,
}

/// Fixed lookup from provider stop reasons to canonical finish reasons
#[derive(Debug, Clone, Copy)]
pub struct StopReasonTable(&'static [(&'static str, FinishReason)]);

impl StopReasonTable {
    /// Build a table from `(provider code, canonical reason)` pairs
    pub const fn new(entries: &'static [(&'static str, FinishReason)]) -> Self {
        Self(entries)
    }

    /// Map a provider stop reason; unknown or absent reasons stay unknown
    pub fn map(&self, reason: Option<&str>) -> Option<FinishReason> {
        let reason = reason?;
        self.0
            .iter()
            .find(|(code, _)| *code == reason)
            .map(|(_, finish)| *finish)
    }
}

/// Per-call inputs for building an envelope
pub struct EnvelopeContext<'a> {
    /// Model reported in the envelope
    pub model: &'a str,
    /// Provider stop-reason vocabulary
    pub stop_reasons: &'a StopReasonTable,
    /// Usage fallback when the provider omits counters
    pub tokenizer: &'a dyn Tokenizer,
    /// Tool invocation detection policy
    pub detection: DetectionMode,
}

/// Classify a reply and build the canonical envelope around it
///
/// A reply classified as a tool invocation must parse; there is no fallback
/// to plain text. Plain replies get their code fences rewritten.
pub fn translate_reply(reply: &ProviderReply, context: &EnvelopeContext<'_>) -> Result<CompletionResponse, LlmError> {
    let usage = resolve_usage(reply, context.tokenizer);

    let (message, finish_reason) = if is_tool_invocation(&reply.text, context.detection) {
        let call = parse_invocation(&reply.text)?;
        debug!(function = %call.name, "reply decoded as function call");
        (ChoiceMessage::with_function_call(call), Some(FinishReason::FunctionCall))
    } else {
        let finish_reason = context.stop_reasons.map(reply.stop_reason.as_deref());
        (ChoiceMessage::text(to_canonical_fence(&reply.text)), finish_reason)
    };

    Ok(build_envelope(context.model, usage, message, finish_reason))
}

/// Reported usage, or a tokenizer estimate of the completion as the total
pub fn resolve_usage(reply: &ProviderReply, tokenizer: &dyn Tokenizer) -> Usage {
    reply.usage.unwrap_or_else(|| Usage {
        prompt_tokens: 0,
        completion_tokens: 0,
        total_tokens: tokenizer.count(&reply.text),
    })
}

/// Wrap a translated message in a single-choice envelope
pub fn build_envelope(
    model: &str,
    usage: Usage,
    message: ChoiceMessage,
    finish_reason: Option<FinishReason>,
) -> CompletionResponse {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();

    CompletionResponse {
        id: format!("chatcmpl-{}.{:06}", now.as_secs(), now.subsec_micros()),
        object: "chat.completion".to_owned(),
        created: now.as_secs(),
        model: model.to_owned(),
        usage,
        choices: vec![Choice {
            index: 0,
            message,
            finish_reason,
        }],
    }
}
