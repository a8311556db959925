use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Specification of a callable function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Function name
    pub name: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parameter schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParameterSchema>,
}

/// JSON-schema-like description of function parameters
///
/// Property descriptors keep their key order so the rendered grammar is
/// stable for identical catalogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Schema type, usually "object"
    #[serde(rename = "type", default = "default_schema_type")]
    pub schema_type: String,
    /// Property name to descriptor (type, description, enum, ...)
    #[serde(default)]
    pub properties: IndexMap<String, IndexMap<String, serde_json::Value>>,
    /// Names of required properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

fn default_schema_type() -> String {
    "object".to_owned()
}
