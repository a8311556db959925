//! Anthropic models on AWS Bedrock

use super::{AdapterDefaults, CallParameters, Dialect};
use crate::credentials::RequiredCredentials;
use crate::envelope::{ProviderReply, StopReasonTable};
use crate::error::LlmError;
use crate::grammar::{NormalizedConversation, RolePolicy, SystemPlacement};
use crate::protocol::claude::{BEDROCK_ANTHROPIC_VERSION, ClaudeRequest, ClaudeResponse};
use crate::types::{FinishReason, Usage};

/// Default Bedrock model id
pub const DEFAULT_MODEL: &str = "anthropic.claude-3-sonnet-20240229-v1:0";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.1;

/// Default token ceiling
pub const DEFAULT_MAX_TOKENS: u32 = 10240;

static STOP_REASONS: StopReasonTable = StopReasonTable::new(&[
    ("end_turn", FinishReason::Stop),
    ("stop_sequence", FinishReason::Stop),
    ("max_tokens", FinishReason::Length),
]);

/// Claude dialect: system prompt in the top-level `system` field
#[derive(Debug, Clone, Copy, Default)]
pub struct Claude;

impl Dialect for Claude {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn role_policy(&self) -> RolePolicy {
        RolePolicy {
            system: SystemPlacement::SideChannel,
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
        RequiredCredentials::KeyAndSecret
    }

    fn build_body(
        &self,
        conversation: NormalizedConversation,
        parameters: &CallParameters,
    ) -> Result<Vec<u8>, LlmError> {
        let request = ClaudeRequest {
            anthropic_version: BEDROCK_ANTHROPIC_VERSION.to_owned(),
            max_tokens: parameters.max_tokens,
            messages: conversation.turns,
            temperature: parameters.temperature,
            system: conversation.system,
        };

        serde_json::to_vec(&request).map_err(|e| LlmError::Internal(e.into()))
    }

    fn decode_reply(&self, body: &[u8]) -> Result<ProviderReply, LlmError> {
        let response: ClaudeResponse = serde_json::from_slice(body)
            .map_err(|e| LlmError::Transport(format!("malformed provider reply: {e}")))?;

        let text = response
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<String>();

        let usage = response.usage.map(|u| Usage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.input_tokens.saturating_add(u.output_tokens),
        });

        Ok(ProviderReply {
            text,
            usage,
            stop_reason: response.stop_reason,
        })
    }
}
