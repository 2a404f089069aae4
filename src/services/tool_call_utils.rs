use crate::error::AgentError;
use serde_json::Value;

/// A tool call requested by the model, with its arguments already decoded
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// Extract tool_call_id from a tool call JSON object
pub(crate) fn extract_tool_call_id(tool_call: &Value) -> &str {
    tool_call
        .get("id")
        .and_then(|value| value.as_str())
        .unwrap_or_default()
}

/// Decode one entry of an assistant message's `tool_calls` array.
///
/// Models sometimes send an empty argument string for parameterless calls;
/// that decodes to an empty object.
pub(crate) fn parse_tool_call(tool_call: &Value) -> Result<ParsedToolCall, AgentError> {
    let id = extract_tool_call_id(tool_call).to_string();

    let function = tool_call
        .get("function")
        .ok_or_else(|| AgentError::InvalidFunctionCall("Tool call missing function".to_string()))?;

    let name = function
        .get("name")
        .and_then(|value| value.as_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            AgentError::InvalidFunctionCall("Tool call missing function name".to_string())
        })?
        .to_string();

    let arguments = match function.get("arguments") {
        Some(Value::String(raw)) if raw.trim().is_empty() => Value::Object(Default::default()),
        Some(Value::String(raw)) => serde_json::from_str(raw).map_err(|err| {
            AgentError::InvalidFunctionCall(format!(
                "Failed to parse arguments for tool '{}': {}",
                name, err
            ))
        })?,
        Some(object @ Value::Object(_)) => object.clone(),
        _ => Value::Object(Default::default()),
    };

    Ok(ParsedToolCall {
        id,
        name,
        arguments,
    })
}
