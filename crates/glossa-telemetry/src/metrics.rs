//! Metric names and recording helpers

use std::time::Instant;

use opentelemetry::KeyValue;
use opentelemetry::metrics::Histogram;

/// Duration of one adapter call, in seconds
pub const LLM_REQUEST_DURATION: &str = "llm.request.duration";
/// Adapter calls, by provider and outcome
pub const LLM_REQUEST_COUNT: &str = "llm.request.count";
/// Tokens reported by providers or estimated locally
pub const LLM_TOKEN_USAGE: &str = "llm.token.usage";
/// Replies decoded as function calls
pub const LLM_TOOL_CALL_COUNT: &str = "llm.tool_call.count";

/// Record the time elapsed since `start` on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[KeyValue]) {
    histogram.record(start.elapsed().as_secs_f64(), attributes);
}
