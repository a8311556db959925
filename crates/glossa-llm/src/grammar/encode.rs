//! Re-serialize a prior assistant function call into the invocation grammar

use super::markup::MarkupWriter;
use crate::error::LlmError;
use crate::types::FunctionCall;

/// Encode a decided function call as a textual invocation
///
/// The arguments are written as one opaque (escaped) JSON blob inside
/// `<arguments>`, not expanded per key. They must be valid JSON.
pub fn encode_function_call(call: &FunctionCall) -> Result<String, LlmError> {
    serde_json::from_str::<serde_json::Value>(&call.arguments).map_err(|e| {
        LlmError::Encoding(format!("arguments for function `{}` are not valid JSON: {e}", call.name))
    })?;

    let mut writer = MarkupWriter::new();
    writer
        .open("function_calls")
        .open("invoke")
        .leaf("tool_name", &call.name)
        .leaf("arguments", &call.arguments);

    Ok(writer.finish())
}
