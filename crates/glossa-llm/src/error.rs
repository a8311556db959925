use thiserror::Error;

/// Errors that can occur while adapting a request or reply
#[derive(Debug, Error)]
pub enum LlmError {
    /// Required configuration or credential fields are missing
    #[error("configuration error: {0}")]
    Config(String),

    /// The transport failed or the provider replied with an error
    #[error("transport error: {0}")]
    Transport(String),

    /// A reply classified as a tool invocation could not be parsed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Function-call arguments were not valid JSON
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl LlmError {
    /// Short label used as a metric attribute
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Transport(_) => "transport",
            Self::Parse(_) => "parse",
            Self::Encoding(_) => "encoding",
            Self::Internal(_) => "internal",
        }
    }
}

/// Reasons a textual tool invocation failed to parse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No complete `<invoke>...</invoke>` span was found
    #[error("no <invoke> block found in reply")]
    MissingInvoke,

    /// More than one invocation; only a single call per reply is supported
    #[error("reply contains {0} <invoke> blocks, expected exactly one")]
    MultipleInvokes(usize),

    /// The invocation span is not well-formed markup
    #[error("malformed invocation markup: {0}")]
    Malformed(String),

    /// A required element is absent from the invocation
    #[error("invocation is missing <{0}>")]
    MissingElement(&'static str),
}
