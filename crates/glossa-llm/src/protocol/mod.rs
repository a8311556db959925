//! Wire format types for provider-specific API protocols
//!
//! Each module contains pure serde structs matching the respective provider's
//! JSON API format. These types are only used for serialization and
//! deserialization at the boundary.

pub mod claude;
pub mod deepseek;

use serde::{Deserialize, Serialize};

/// Turn role accepted by two-role providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    /// User turn
    User,
    /// Assistant turn
    Assistant,
}

/// A single provider turn with plain text content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMessage {
    /// Turn role
    pub role: ProviderRole,
    /// Text content
    pub content: String,
}
