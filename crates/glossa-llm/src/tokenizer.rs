//! Approximate token counting for usage fallback

use tiktoken_rs::{CoreBPE, cl100k_base};

/// Counts tokens in a piece of text
pub trait Tokenizer: Send + Sync {
    /// Approximate number of tokens in `text`
    fn count(&self, text: &str) -> u32;
}

/// Tokenizer backed by the `cl100k_base` encoding
///
/// Falls back to a bytes/4 estimate when the encoding cannot be loaded.
pub struct TiktokenCounter {
    bpe: Option<CoreBPE>,
}

impl TiktokenCounter {
    /// Load the encoding table
    pub fn new() -> Self {
        let bpe = match cl100k_base() {
            Ok(bpe) => Some(bpe),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load cl100k_base, estimating tokens from length");
                None
            }
        };
        Self { bpe }
    }
}

impl Default for TiktokenCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("loaded", &self.bpe.is_some())
            .finish()
    }
}

impl Tokenizer for TiktokenCounter {
    fn count(&self, text: &str) -> u32 {
        let count = self
            .bpe
            .as_ref()
            .map_or(text.len() / 4, |bpe| bpe.encode_with_special_tokens(text).len());
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}
