use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Configuration for a single provider
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Provider dialect
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    /// API key, or AWS access key id for Claude
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// API secret, or AWS secret access key for Claude
    #[serde(default)]
    pub api_secret: Option<SecretString>,
    /// AWS region (Claude only)
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint override (DeepSeek only)
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Default model override
    #[serde(default)]
    pub model: Option<String>,
    /// Default temperature override
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Default token ceiling override
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// How replies are classified as tool invocations
    #[serde(default)]
    pub tool_call_detection: ToolCallDetection,
}

/// Supported provider dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ProviderKind {
    /// Anthropic Claude on AWS Bedrock
    #[serde(rename = "claude")]
    Claude,
    /// DeepSeek chat completions
    #[serde(rename = "deepseek")]
    DeepSeek,
}

impl ProviderKind {
    /// Name as written in the config file
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::DeepSeek => "deepseek",
        }
    }
}

/// Tool invocation detection policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallDetection {
    /// Only replies starting with `<function_calls>`
    Strict,
    /// Also replies carrying every invocation marker after some prose
    #[default]
    Lenient,
}
