//! Provider adapters built from one generic engine
//!
//! A [`Dialect`] describes everything provider-specific: role rules, default
//! settings, the stop-reason vocabulary and the wire body. [`Adapter`] runs
//! the shared pipeline around it.

pub mod claude;
pub mod deepseek;

use std::time::Instant;

use async_trait::async_trait;
use glossa_config::{ProviderConfig, ProviderKind, ToolCallDetection};
use glossa_telemetry::metrics::{
    LLM_REQUEST_COUNT, LLM_REQUEST_DURATION, LLM_TOKEN_USAGE, LLM_TOOL_CALL_COUNT, record_duration,
};
use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Histogram};
use tracing::{debug, error};

pub use self::claude::Claude;
pub use self::deepseek::DeepSeek;
use crate::credentials::{Credentials, RequiredCredentials};
use crate::envelope::{EnvelopeContext, ProviderReply, StopReasonTable, translate_reply};
use crate::error::LlmError;
use crate::grammar::{DetectionMode, NormalizedConversation, RolePolicy, attach_catalog, normalize};
use crate::tokenizer::{TiktokenCounter, Tokenizer};
use crate::transport::{HttpTransport, Transport, TransportRequest};
use crate::types::{ChatRequest, CompletionResponse};

/// Fixed per-provider defaults
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdapterDefaults {
    /// Model identifier
    pub model: &'static str,
    /// Sampling temperature
    pub temperature: f64,
    /// Token ceiling
    pub max_tokens: u32,
}

/// Configuration an adapter is constructed with
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterSettings {
    /// Model used when neither the override nor the request names one
    pub model: String,
    /// Temperature used when neither the override nor the request sets one
    pub temperature: f64,
    /// Token ceiling used when the request does not set one
    pub max_tokens: u32,
    /// Tool invocation detection policy
    pub detection: DetectionMode,
}

impl From<AdapterDefaults> for AdapterSettings {
    fn from(defaults: AdapterDefaults) -> Self {
        Self {
            model: defaults.model.to_owned(),
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
            detection: DetectionMode::default(),
        }
    }
}

/// Per-call overrides supplied by the driver
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// Model override
    pub model: Option<String>,
    /// Temperature override
    pub temperature: Option<f64>,
}

/// Sampling parameters resolved for one call
#[derive(Debug, Clone, PartialEq)]
pub struct CallParameters {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Token ceiling
    pub max_tokens: u32,
}

/// Provider-native request ready for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// Resolved model identifier
    pub model: String,
    /// Serialized request body
    pub body: Vec<u8>,
}

/// Provider-specific half of an adapter
pub trait Dialect: Send + Sync {
    /// Provider name used in logs and metrics
    fn name(&self) -> &'static str;

    /// How canonical roles map onto the provider's turns
    fn role_policy(&self) -> RolePolicy;

    /// Fixed defaults for model, temperature and token ceiling
    fn defaults(&self) -> AdapterDefaults;

    /// Native stop reasons and their canonical meaning
    fn stop_reasons(&self) -> &'static StopReasonTable;

    /// Credential fields that must be present before a call
    fn required_credentials(&self) -> RequiredCredentials;

    /// Serialize the normalized conversation into the provider body
    fn build_body(
        &self,
        conversation: NormalizedConversation,
        parameters: &CallParameters,
    ) -> Result<Vec<u8>, LlmError>;

    /// Deserialize a raw provider reply
    fn decode_reply(&self, body: &[u8]) -> Result<ProviderReply, LlmError>;
}

/// Object-safe view of an adapter for drivers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Build the provider-native body without sending it
    fn prepare(&self, request: &ChatRequest, overrides: &Overrides) -> Result<PreparedRequest, LlmError>;

    /// Translate, send and translate back a single request
    async fn run(
        &self,
        credentials: &Credentials,
        request: &ChatRequest,
        overrides: &Overrides,
    ) -> Result<CompletionResponse, LlmError>;
}

/// A provider adapter: dialect plus shared translation pipeline
///
/// Holds no per-call state; concurrent calls on one adapter are independent.
pub struct Adapter<D> {
    dialect: D,
    settings: AdapterSettings,
    transport: Box<dyn Transport>,
    tokenizer: Box<dyn Tokenizer>,
    metrics: AdapterMetrics,
}

impl<D: Dialect> Adapter<D> {
    /// Create an adapter from its collaborators
    pub fn new(
        dialect: D,
        settings: AdapterSettings,
        transport: Box<dyn Transport>,
        tokenizer: Box<dyn Tokenizer>,
    ) -> Self {
        Self {
            dialect,
            settings,
            transport,
            tokenizer,
            metrics: AdapterMetrics::new(),
        }
    }

    /// Create an adapter with the dialect's defaults
    pub fn with_defaults(dialect: D, transport: Box<dyn Transport>, tokenizer: Box<dyn Tokenizer>) -> Self {
        let settings = AdapterSettings::from(dialect.defaults());
        Self::new(dialect, settings, transport, tokenizer)
    }

    /// Resolve model, temperature and token ceiling for one call
    ///
    /// Overrides win over request fields, which win over adapter settings.
    pub fn parameters(&self, request: &ChatRequest, overrides: &Overrides) -> CallParameters {
        let model = overrides
            .model
            .as_ref()
            .or(request.model.as_ref())
            .unwrap_or(&self.settings.model)
            .clone();

        let temperature = overrides
            .temperature
            .or(request.temperature)
            .unwrap_or(self.settings.temperature);

        CallParameters {
            model,
            temperature,
            max_tokens: request.max_tokens.unwrap_or(self.settings.max_tokens),
        }
    }

    /// Build the provider-native request body
    pub fn prepare(&self, request: &ChatRequest, overrides: &Overrides) -> Result<PreparedRequest, LlmError> {
        let parameters = self.parameters(request, overrides);
        let mut conversation = normalize(&request.messages, self.dialect.role_policy())?;

        if let Some(tools) = request.catalog() {
            attach_catalog(&mut conversation.turns, tools);
        }

        let body = self.dialect.build_body(conversation, &parameters)?;

        Ok(PreparedRequest {
            model: parameters.model,
            body,
        })
    }

    /// Run one request through the provider
    pub async fn run(
        &self,
        credentials: &Credentials,
        request: &ChatRequest,
        overrides: &Overrides,
    ) -> Result<CompletionResponse, LlmError> {
        let start = Instant::now();
        let result = self.execute(credentials, request, overrides).await;
        self.metrics.record(self.dialect.name(), start, &result);
        result
    }

    async fn execute(
        &self,
        credentials: &Credentials,
        request: &ChatRequest,
        overrides: &Overrides,
    ) -> Result<CompletionResponse, LlmError> {
        let provider = self.dialect.name();
        credentials.validate(self.dialect.required_credentials())?;

        let prepared = self.prepare(request, overrides)?;
        debug!(provider = %provider, model = %prepared.model, bytes = prepared.body.len(), "sending provider request");

        let raw = self
            .transport
            .send(TransportRequest {
                model: &prepared.model,
                body: prepared.body,
                credentials,
            })
            .await?;

        let reply = self.dialect.decode_reply(&raw)?;
        let context = EnvelopeContext {
            model: &prepared.model,
            stop_reasons: self.dialect.stop_reasons(),
            tokenizer: self.tokenizer.as_ref(),
            detection: self.settings.detection,
        };

        translate_reply(&reply, &context).inspect_err(|e| {
            error!(provider = %provider, model = %prepared.model, error = %e, "failed to translate provider reply");
        })
    }
}

#[async_trait]
impl<D: Dialect> Provider for Adapter<D> {
    fn name(&self) -> &str {
        self.dialect.name()
    }

    fn prepare(&self, request: &ChatRequest, overrides: &Overrides) -> Result<PreparedRequest, LlmError> {
        Self::prepare(self, request, overrides)
    }

    async fn run(
        &self,
        credentials: &Credentials,
        request: &ChatRequest,
        overrides: &Overrides,
    ) -> Result<CompletionResponse, LlmError> {
        Self::run(self, credentials, request, overrides).await
    }
}

/// Build the adapter a provider configuration describes
pub fn from_config(config: &ProviderConfig) -> Result<Box<dyn Provider>, LlmError> {
    let tokenizer: Box<dyn Tokenizer> = Box::new(TiktokenCounter::new());

    match config.kind {
        ProviderKind::Claude => {
            let settings = settings_from_config(Claude.defaults(), config);
            Ok(Box::new(Adapter::new(Claude, settings, claude_transport(config)?, tokenizer)))
        }
        ProviderKind::DeepSeek => {
            let settings = settings_from_config(DeepSeek.defaults(), config);
            let transport = match &config.base_url {
                Some(url) => HttpTransport::new(url.clone()),
                None => HttpTransport::from_url(deepseek::DEFAULT_URL)?,
            };
            Ok(Box::new(Adapter::new(DeepSeek, settings, Box::new(transport), tokenizer)))
        }
    }
}

#[cfg(feature = "bedrock")]
#[allow(clippy::unnecessary_wraps)]
fn claude_transport(config: &ProviderConfig) -> Result<Box<dyn Transport>, LlmError> {
    use crate::transport::BedrockTransport;

    let transport = config
        .region
        .as_ref()
        .map_or_else(BedrockTransport::default, BedrockTransport::new);
    Ok(Box::new(transport))
}

#[cfg(not(feature = "bedrock"))]
fn claude_transport(_config: &ProviderConfig) -> Result<Box<dyn Transport>, LlmError> {
    Err(LlmError::Config("claude provider requires the `bedrock` feature".to_owned()))
}

fn settings_from_config(defaults: AdapterDefaults, config: &ProviderConfig) -> AdapterSettings {
    AdapterSettings {
        model: config.model.clone().unwrap_or_else(|| defaults.model.to_owned()),
        temperature: config.temperature.unwrap_or(defaults.temperature),
        max_tokens: config.max_tokens.unwrap_or(defaults.max_tokens),
        detection: match config.tool_call_detection {
            ToolCallDetection::Strict => DetectionMode::Strict,
            ToolCallDetection::Lenient => DetectionMode::Lenient,
        },
    }
}

/// Instruments recorded for every adapter call
struct AdapterMetrics {
    duration: Histogram<f64>,
    requests: Counter<u64>,
    tokens: Counter<u64>,
    tool_calls: Counter<u64>,
}

impl AdapterMetrics {
    fn new() -> Self {
        let meter = opentelemetry::global::meter("glossa-llm");

        Self {
            duration: meter
                .f64_histogram(LLM_REQUEST_DURATION)
                .with_unit("s")
                .with_description("Duration of provider calls")
                .build(),
            requests: meter
                .u64_counter(LLM_REQUEST_COUNT)
                .with_description("Provider calls by outcome")
                .build(),
            tokens: meter
                .u64_counter(LLM_TOKEN_USAGE)
                .with_description("Tokens reported or estimated per call")
                .build(),
            tool_calls: meter
                .u64_counter(LLM_TOOL_CALL_COUNT)
                .with_description("Replies decoded as function calls")
                .build(),
        }
    }

    fn record(&self, provider: &'static str, start: Instant, result: &Result<CompletionResponse, LlmError>) {
        let outcome = match result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        let attributes = [KeyValue::new("provider", provider), KeyValue::new("outcome", outcome)];

        record_duration(&self.duration, start, &attributes);
        self.requests.add(1, &attributes);

        if let Ok(response) = result {
            let provider = [KeyValue::new("provider", provider)];
            self.tokens.add(u64::from(response.usage.total_tokens), &provider);
            if response.choices.iter().any(|c| c.message.function_call.is_some()) {
                self.tool_calls.add(1, &provider);
            }
        }
    }
}
