//! Role normalization for two-role providers
//!
//! Canonical conversations carry four roles; the providers handled here only
//! accept alternating `user`/`assistant` turns, with system instructions either
//! in a separate request field or folded into a user turn.

use tracing::debug;

use super::encode::encode_function_call;
use super::fence::to_provider_fence;
use crate::error::LlmError;
use crate::protocol::{ProviderMessage, ProviderRole};
use crate::types::{Message, Role};

/// Where a provider expects system instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPlacement {
    /// The first system message goes to a dedicated request field
    SideChannel,
    /// System messages become user turns
    Inline,
}

/// Per-provider role rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePolicy {
    /// Handling of system messages
    pub system: SystemPlacement,
}

/// Map a canonical role onto the two-role vocabulary
pub const fn remap_role(role: Role) -> ProviderRole {
    match role {
        Role::Assistant => ProviderRole::Assistant,
        Role::User | Role::Function | Role::System => ProviderRole::User,
    }
}

/// Provider-ready conversation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedConversation {
    /// Side-channel system instructions, if the provider has one
    pub system: Option<String>,
    /// Alternating turns
    pub turns: Vec<ProviderMessage>,
}

/// Normalize a canonical conversation for a provider
///
/// Roles are remapped, then each maximal run of same-role turns is merged
/// with a newline join. The result never has two adjacent turns with the
/// same role and never has more turns than the input had messages.
pub fn normalize(messages: &[Message], policy: RolePolicy) -> Result<NormalizedConversation, LlmError> {
    let mut normalized = NormalizedConversation::default();

    for message in messages {
        if message.role == Role::System
            && policy.system == SystemPlacement::SideChannel
            && normalized.system.is_none()
        {
            normalized.system = Some(message.content.clone().unwrap_or_default());
            continue;
        }

        let content = render_content(message)?;
        push_merged(&mut normalized.turns, remap_role(message.role), content);
    }

    debug!(
        messages = messages.len(),
        turns = normalized.turns.len(),
        side_channel = normalized.system.is_some(),
        "normalized conversation"
    );

    Ok(normalized)
}

/// Text a canonical message contributes to its provider turn
fn render_content(message: &Message) -> Result<String, LlmError> {
    match (&message.content, &message.function_call) {
        (None, Some(call)) => encode_function_call(call),
        (Some(text), Some(call)) => {
            let mut content = to_provider_fence(text);
            content.push('\n');
            content.push_str(&encode_function_call(call)?);
            Ok(content)
        }
        (Some(text), None) => Ok(to_provider_fence(text)),
        (None, None) => Ok(String::new()),
    }
}

fn push_merged(turns: &mut Vec<ProviderMessage>, role: ProviderRole, content: String) {
    match turns.last_mut() {
        Some(last) if last.role == role => {
            last.content.push('\n');
            last.content.push_str(&content);
        }
        _ => turns.push(ProviderMessage { role, content }),
    }
}
