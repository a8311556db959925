//! Classify provider replies and parse textual tool invocations
//!
//! A reply is a tool invocation when it opens with `<function_calls>`, or, in
//! lenient mode, when all invocation markers appear somewhere in it. Lenient
//! detection tolerates explanatory prose ahead of the block, at the price of
//! misreading a plain answer that merely quotes every marker. Once a reply is
//! classified as an invocation it either parses completely or fails.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::markup::{Element, parse_element};
use crate::error::{LlmError, ParseError};
use crate::types::FunctionCall;

/// Markers that must all be present for lenient detection
const LENIENT_MARKERS: [&str; 4] = ["<function_calls>", "<invoke>", "<tool_name>", "</invoke>"];

static INVOKE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<invoke>(.*?)</invoke>").unwrap());

/// How eagerly replies are treated as tool invocations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetectionMode {
    /// Only replies that start with `<function_calls>`
    Strict,
    /// Also replies that contain every invocation marker anywhere
    #[default]
    Lenient,
}

/// Decide whether a raw reply encodes a tool invocation
pub fn is_tool_invocation(raw: &str, mode: DetectionMode) -> bool {
    if raw.trim().starts_with("<function_calls>") {
        return true;
    }

    match mode {
        DetectionMode::Strict => false,
        DetectionMode::Lenient => LENIENT_MARKERS.iter().all(|marker| raw.contains(marker)),
    }
}

/// Parse a reply already classified as a tool invocation
///
/// Exactly one `<invoke>` block is accepted. Arguments are collected from the
/// children of `<parameters>` and returned as a JSON object text.
pub fn parse_invocation(raw: &str) -> Result<FunctionCall, LlmError> {
    let mut spans = INVOKE_RE.captures_iter(raw);
    let inner = spans
        .next()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(ParseError::MissingInvoke)?;

    let extra = spans.count();
    if extra > 0 {
        return Err(ParseError::MultipleInvokes(extra + 1).into());
    }

    // Re-wrap the span so a damaged outer envelope does not matter
    let wrapped = format!("<function_calls>\n<invoke>\n{}</invoke>\n</function_calls>", inner.trim());
    let root = parse_element(&wrapped).map_err(|e| ParseError::Malformed(e.to_string()))?;

    let invoke = root.child("invoke").ok_or(ParseError::MissingElement("invoke"))?;
    let name = invoke
        .child("tool_name")
        .ok_or(ParseError::MissingElement("tool_name"))?
        .text
        .trim()
        .to_owned();
    let parameters = invoke
        .child("parameters")
        .ok_or(ParseError::MissingElement("parameters"))?;

    let arguments = collect_arguments(parameters)?;
    let arguments = serde_json::to_string(&Value::Object(arguments))
        .map_err(|e| LlmError::Encoding(format!("failed to encode arguments for `{name}`: {e}")))?;

    Ok(FunctionCall { name, arguments })
}

fn collect_arguments(parameters: &Element) -> Result<Map<String, Value>, LlmError> {
    let mut arguments = Map::new();

    for param in &parameters.children {
        if param.tag != "object" {
            arguments.insert(param.tag.clone(), Value::String(param.text.clone()));
            continue;
        }

        if param.children.is_empty() {
            // A JSON object literal; every value is kept as JSON text
            let object: Map<String, Value> = serde_json::from_str(param.text.trim())
                .map_err(|e| LlmError::Encoding(format!("<object> argument is not a JSON object: {e}")))?;
            for (key, value) in object {
                arguments.insert(key, Value::String(value.to_string()));
            }
        } else {
            for field in &param.children {
                arguments.insert(field.tag.clone(), Value::String(field.text.clone()));
            }
        }
    }

    Ok(arguments)
}
