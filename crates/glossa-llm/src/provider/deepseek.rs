//! DeepSeek chat completions

use super::{AdapterDefaults, CallParameters, Dialect};
use crate::credentials::RequiredCredentials;
use crate::envelope::{ProviderReply, StopReasonTable};
use crate::error::LlmError;
use crate::grammar::{NormalizedConversation, RolePolicy, SystemPlacement};
use crate::protocol::deepseek::{DeepSeekRequest, DeepSeekResponse};
use crate::types::{FinishReason, Usage};

/// Default chat-completions endpoint
pub const DEFAULT_URL: &str = "https://api.deepseek.com/chat/completions";

/// Default model
pub const DEFAULT_MODEL: &str = "deepseek-coder";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default token ceiling
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

static STOP_REASONS: StopReasonTable = StopReasonTable::new(&[
    ("stop", FinishReason::Stop),
    ("end_turn", FinishReason::Stop),
    ("length", FinishReason::Length),
    ("max_tokens", FinishReason::Length),
]);

/// DeepSeek dialect: system messages folded into user turns
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepSeek;

impl Dialect for DeepSeek {
    fn name(&self) -> &'static str {
        "deepseek"
    }

    fn role_policy(&self) -> RolePolicy {
        RolePolicy {
            system: SystemPlacement::Inline,
        }
    }

    fn defaults(&self) -> AdapterDefaults {
        AdapterDefaults {
            model: DEFAULT_MODEL,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    fn stop_reasons(&self) -> &'static StopReasonTable {
        &STOP_REASONS
    }

    fn required_credentials(&self) -> RequiredCredentials {
        RequiredCredentials::Key
    }

    fn build_body(
        &self,
        conversation: NormalizedConversation,
        parameters: &CallParameters,
    ) -> Result<Vec<u8>, LlmError> {
        let request = DeepSeekRequest {
            messages: conversation.turns,
            model: parameters.model.clone(),
            frequency_penalty: 0.0,
            max_tokens: parameters.max_tokens,
            presence_penalty: 0.0,
            stop: None,
            stream: false,
            temperature: parameters.temperature,
            top_p: 1.0,
            logprobs: false,
            top_logprobs: None,
        };

        serde_json::to_vec(&request).map_err(|e| LlmError::Internal(e.into()))
    }

    fn decode_reply(&self, body: &[u8]) -> Result<ProviderReply, LlmError> {
        let response: DeepSeekResponse = serde_json::from_slice(body)
            .map_err(|e| LlmError::Transport(format!("malformed provider reply: {e}")))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Transport("malformed provider reply: no choices".to_owned()))?;

        Ok(ProviderReply {
            text: choice.message.content.unwrap_or_default(),
            usage: response.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            stop_reason: choice.finish_reason,
        })
    }
}
