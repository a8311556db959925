//! Tool-grammar synthesis for providers without native function calling

use super::markup::MarkupWriter;
use crate::protocol::{ProviderMessage, ProviderRole};
use crate::types::{FunctionDefinition, ParameterSchema};

/// Fixed preamble describing how to request a tool
const TOOL_USE_INSTRUCTIONS: &str = "\
In this environment you have access to a set of tools you can use to answer the user's question.
You may call them like this. Only invoke one function at a time and wait for the results before invoking another function:
<function_calls>
<invoke>
<tool_name>$TOOL_NAME</tool_name>
<parameters>
<$PARAMETER_NAME>$PARAMETER_VALUE</$PARAMETER_NAME>
...
</parameters>
</invoke>
</function_calls>
";

/// Instructions telling the model how to invoke a tool
pub const fn synthesize_instructions() -> &'static str {
    TOOL_USE_INSTRUCTIONS
}

/// Render a tool catalog as `<tool_description>` blocks
///
/// Output depends only on the catalog contents and order.
pub fn synthesize_catalog(tools: &[FunctionDefinition]) -> String {
    let mut writer = MarkupWriter::new();
    writer.line("Here are the tools available:").open("tools");

    for tool in tools {
        writer.open("tool_description").leaf("tool_name", &tool.name);
        if let Some(description) = &tool.description {
            writer.leaf("description", description);
        }
        if let Some(parameters) = &tool.parameters {
            write_parameters(&mut writer, parameters);
        }
        writer.close();
    }

    writer.finish()
}

fn write_parameters(writer: &mut MarkupWriter, schema: &ParameterSchema) {
    writer.open("parameters");

    for (name, descriptor) in &schema.properties {
        writer.open("parameter").leaf("name", name);
        for (key, value) in descriptor {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            writer.leaf(key, &text);
        }
        writer.close();
    }

    if let Some(required) = &schema.required {
        writer.leaf("required", &required.join(","));
    }

    writer.close();
}

/// Full grammar text: instructions followed by the catalog
pub fn synthesize_grammar(tools: &[FunctionDefinition]) -> String {
    let mut grammar = String::from(synthesize_instructions());
    grammar.push_str(&synthesize_catalog(tools));
    grammar
}

/// Anchor the tool grammar to the most recent user turn
///
/// When the conversation ends in a user turn the grammar is appended to it
/// on a new line; otherwise a user turn holding only the grammar is added.
pub fn attach_catalog(turns: &mut Vec<ProviderMessage>, tools: &[FunctionDefinition]) {
    let grammar = synthesize_grammar(tools);

    match turns.last_mut() {
        Some(last) if last.role == ProviderRole::User => {
            if !last.content.is_empty() && !last.content.ends_with('\n') {
                last.content.push('\n');
            }
            last.content.push_str(&grammar);
        }
        _ => turns.push(ProviderMessage {
            role: ProviderRole::User,
            content: grammar,
        }),
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use indoc::indoc;

    use super::*;

    fn weather_tool() -> FunctionDefinition {
        let mut city = IndexMap::new();
        city.insert("type".to_owned(), serde_json::json!("string"));
        city.insert("description".to_owned(), serde_json::json!("City name"));

        let mut unit = IndexMap::new();
        unit.insert("type".to_owned(), serde_json::json!("string"));
        unit.insert("enum".to_owned(), serde_json::json!(["c", "f"]));

        let mut properties = IndexMap::new();
        properties.insert("city".to_owned(), city);
        properties.insert("unit".to_owned(), unit);

        FunctionDefinition {
            name: "get_weather".to_owned(),
            description: Some("Current weather for a city".to_owned()),
            parameters: Some(ParameterSchema {
                schema_type: "object".to_owned(),
                properties,
                required: Some(vec!["city".to_owned(), "unit".to_owned()]),
            }),
        }
    }

    #[test]
    fn renders_tool_descriptions() {
        assert_eq!(
            synthesize_catalog(&[weather_tool()]),
            indoc! {r#"
                Here are the tools available:
                <tools>
                <tool_description>
                <tool_name>get_weather</tool_name>
                <description>Current weather for a city</description>
                <parameters>
                <parameter>
                <name>city</name>
                <type>string</type>
                <description>City name</description>
                </parameter>
                <parameter>
                <name>unit</name>
                <type>string</type>
                <enum>["c","f"]</enum>
                </parameter>
                <required>city,unit</required>
                </parameters>
                </tool_description>
                </tools>
            "#}
        );
    }

    #[test]
    fn catalog_is_deterministic() {
        let tools = vec![weather_tool(), FunctionDefinition {
            name: "noop".to_owned(),
            description: None,
            parameters: None,
        }];
        assert_eq!(synthesize_catalog(&tools), synthesize_catalog(&tools.clone()));
    }

    #[test]
    fn special_characters_are_escaped() {
        let tool = FunctionDefinition {
            name: "a&b".to_owned(),
            description: Some("returns <html>".to_owned()),
            parameters: None,
        };
        let catalog = synthesize_catalog(&[tool]);
        assert!(catalog.contains("<tool_name>a&amp;b</tool_name>"));
        assert!(catalog.contains("<description>returns &lt;html&gt;</description>"));
    }

    #[test]
    fn instructions_describe_single_invocation() {
        let instructions = synthesize_instructions();
        assert!(instructions.contains("Only invoke one function at a time"));
        assert!(instructions.contains("<function_calls>"));
    }

    #[test]
    fn grammar_is_appended_to_trailing_user_turn() {
        let mut turns = vec![ProviderMessage {
            role: ProviderRole::User,
            content: "weather in Paris?".to_owned(),
        }];
        attach_catalog(&mut turns, &[weather_tool()]);

        assert_eq!(turns.len(), 1);
        assert!(turns[0].content.starts_with("weather in Paris?\nIn this environment"));
        assert!(turns[0].content.ends_with("</tools>\n"));
    }

    #[test]
    fn grammar_gets_its_own_turn_after_assistant() {
        let mut turns = vec![
            ProviderMessage {
                role: ProviderRole::User,
                content: "hi".to_owned(),
            },
            ProviderMessage {
                role: ProviderRole::Assistant,
                content: "hello".to_owned(),
            },
        ];
        attach_catalog(&mut turns, &[weather_tool()]);

        assert_eq!(turns.len(), 3);
        assert_eq!(turns[2].role, ProviderRole::User);
        assert!(turns[2].content.starts_with("In this environment"));
    }

    #[test]
    fn grammar_gets_its_own_turn_in_empty_conversation() {
        let mut turns = Vec::new();
        attach_catalog(&mut turns, &[weather_tool()]);
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, ProviderRole::User);
    }
}
