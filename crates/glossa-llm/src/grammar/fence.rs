//! Code-fence translation between the provider and canonical conventions
//!
//! Providers fence code with a `<code>` / `</code>` line pair; canonical text
//! uses a backtick fence tagged with a language. Only delimiters that sit on
//! their own line are rewritten.

use std::sync::LazyLock;

use regex::Regex;

/// Language tag written on canonical opening fences
pub const FENCE_LANGUAGE: &str = "python";

const PROVIDER_OPEN: &str = "<code>";
const PROVIDER_CLOSE: &str = "</code>";
const CANONICAL_CLOSE: &str = "```";

static PROVIDER_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^<code>$").unwrap());
static PROVIDER_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^</code>$").unwrap());
static CANONICAL_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?m)^```{FENCE_LANGUAGE}$")).unwrap());
static CANONICAL_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^```$").unwrap());

/// Rewrite provider fences into canonical fences
pub fn to_canonical_fence(text: &str) -> String {
    let opened = PROVIDER_OPEN_RE.replace_all(text, format!("```{FENCE_LANGUAGE}"));
    PROVIDER_CLOSE_RE.replace_all(&opened, CANONICAL_CLOSE).into_owned()
}

/// Rewrite canonical fences into provider fences, the inverse of [`to_canonical_fence`]
pub fn to_provider_fence(text: &str) -> String {
    let opened = CANONICAL_OPEN_RE.replace_all(text, PROVIDER_OPEN);
    CANONICAL_CLOSE_RE.replace_all(&opened, PROVIDER_CLOSE).into_owned()
}
