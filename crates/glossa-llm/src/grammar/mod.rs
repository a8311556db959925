//! Textual tool-invocation grammar and message translation
//!
//! The pieces here are provider-agnostic. A provider adapter picks a
//! [`roles::RolePolicy`] and a [`DetectionMode`]; everything else is shared.

pub mod catalog;
pub mod encode;
pub mod fence;
pub mod invocation;
pub mod markup;
pub mod roles;

pub use catalog::{attach_catalog, synthesize_catalog, synthesize_grammar, synthesize_instructions};
pub use encode::encode_function_call;
pub use fence::{to_canonical_fence, to_provider_fence};
pub use invocation::{DetectionMode, is_tool_invocation, parse_invocation};
pub use roles::{NormalizedConversation, RolePolicy, SystemPlacement, normalize};
