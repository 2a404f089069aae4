use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry in a role's execution trace
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentStep {
    /// Prompt handed to the role
    Task { content: String },
    /// The model asked for a tool
    Action {
        tool_name: String,
        tool_call_id: String,
        arguments: Value,
    },
    /// Output (or error payload) of a tool call
    Observation {
        tool_call_id: String,
        result: String,
        is_error: bool,
    },
    /// Text the role settled on
    FinalAnswer { answer: String },
}

impl AgentStep {
    /// Convert step to OpenAI message format
    pub fn to_message(&self) -> Value {
        match self {
            AgentStep::Task { content } => serde_json::json!({
                "role": "user",
                "content": content
            }),
            AgentStep::Action {
                tool_name,
                tool_call_id,
                arguments,
            } => serde_json::json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": tool_call_id,
                    "type": "function",
                    "function": {
                        "name": tool_name,
                        "arguments": arguments.to_string()
                    }
                }]
            }),
            AgentStep::Observation {
                tool_call_id,
                result,
                ..
            } => serde_json::json!({
                "role": "tool",
                "tool_call_id": tool_call_id,
                "content": result
            }),
            AgentStep::FinalAnswer { answer } => serde_json::json!({
                "role": "assistant",
                "content": answer
            }),
        }
    }

    /// Get a human-readable description of the step
    pub fn describe(&self) -> String {
        match self {
            AgentStep::Task { content } => format!("Task: {}", truncate(content, 200)),
            AgentStep::Action {
                tool_name,
                arguments,
                ..
            } => format!("Action: {}({})", tool_name, arguments),
            AgentStep::Observation {
                result, is_error, ..
            } => {
                if *is_error {
                    format!("Error: {}", truncate(result, 200))
                } else {
                    format!("Observation: {}", truncate(result, 200))
                }
            }
            AgentStep::FinalAnswer { answer } => {
                format!("Final Answer: {}", truncate(answer, 200))
            }
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_message_encodes_arguments_as_string() {
        let step = AgentStep::Action {
            tool_name: "web_search".to_string(),
            tool_call_id: "call_9".to_string(),
            arguments: json!({"query": "Lisbon"}),
        };

        let message = step.to_message();
        assert_eq!(message["role"], "assistant");
        assert_eq!(message["tool_calls"][0]["id"], "call_9");
        assert_eq!(
            message["tool_calls"][0]["function"]["arguments"],
            "{\"query\":\"Lisbon\"}"
        );
    }

    #[test]
    fn test_describe_truncates_long_text() {
        let step = AgentStep::Task {
            content: "é".repeat(500),
        };
        let described = step.describe();
        assert!(described.ends_with("..."));
        assert!(described.chars().count() < 220);
    }
}
