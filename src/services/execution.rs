use crate::{
    core::{agent::Agent, memory::AgentMemory, steps::AgentStep},
    error::{AgentError, Result},
    services::{
        openai_client::ChatCompletionRequest,
        tool_call_utils::{extract_tool_call_id, parse_tool_call},
    },
    types::result::{RunResult, TokenUsage},
};
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, warn};

impl Agent {
    /// Run the role's tool-calling loop and return the full trace.
    ///
    /// The loop ends when the model answers without requesting tools. Tool
    /// failures are reported back to the model; missing credentials end the run.
    pub async fn run_with_steps(&self, prompt: &str) -> Result<RunResult> {
        let start_time = Instant::now();
        let mut memory = AgentMemory::new(self.name(), Some(self.system_prompt()));
        memory.add_step(AgentStep::Task {
            content: prompt.to_string(),
        });

        let tools = self.function_factory().get_openai_tools();
        let mut usage: Option<TokenUsage> = None;

        for iteration in 1..=self.max_iterations() {
            let mut chat_request =
                ChatCompletionRequest::new(self.model().to_owned(), memory.as_messages())
                    .with_max_tokens(self.max_tokens());

            if !tools.is_empty() {
                chat_request = chat_request
                    .with_tools(tools.clone())
                    .with_tool_choice(json!("auto"));
            }

            let request_body = chat_request.into_value();

            let response = self.make_raw_request(&request_body).await?;

            if let Some(turn_usage) = TokenUsage::from_response(&response) {
                usage
                    .get_or_insert_with(TokenUsage::default)
                    .accumulate(&turn_usage);
            }

            let assistant_message = first_assistant_message(&response)?;

            let tool_calls = assistant_message
                .get("tool_calls")
                .and_then(Value::as_array)
                .filter(|calls| !calls.is_empty());

            match tool_calls {
                Some(calls) => {
                    debug!(agent = self.name(), iteration, calls = calls.len(), "model requested tools");
                    for call in calls {
                        self.execute_tool_call(call, &mut memory).await?;
                    }
                }
                None => {
                    let answer = message_text(assistant_message);
                    if answer.is_empty() {
                        return Err(AgentError::Completion(format!(
                            "{} returned an empty response",
                            self.name()
                        )));
                    }

                    memory.add_step(AgentStep::FinalAnswer {
                        answer: answer.clone(),
                    });

                    return Ok(RunResult::new(
                        answer,
                        memory.into_steps(),
                        usage,
                        start_time.elapsed(),
                        iteration,
                    ));
                }
            }
        }

        Err(AgentError::MaxIterations(self.max_iterations()))
    }

    async fn execute_tool_call(&self, call: &Value, memory: &mut AgentMemory) -> Result<()> {
        let parsed = match parse_tool_call(call) {
            Ok(parsed) => parsed,
            Err(err) => {
                let tool_call_id = extract_tool_call_id(call).to_string();
                let tool_name = call
                    .pointer("/function/name")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string();

                memory.add_step(AgentStep::Action {
                    tool_name,
                    tool_call_id: tool_call_id.clone(),
                    arguments: json!({}),
                });
                memory.add_step(AgentStep::Observation {
                    tool_call_id,
                    result: err.to_error_payload().to_string(),
                    is_error: true,
                });
                return Ok(());
            }
        };

        memory.add_step(AgentStep::Action {
            tool_name: parsed.name.clone(),
            tool_call_id: parsed.id.clone(),
            arguments: parsed.arguments.clone(),
        });

        let observation = match self
            .function_factory()
            .execute_function(&parsed.name, parsed.arguments)
            .await
        {
            Ok(result) => AgentStep::Observation {
                tool_call_id: parsed.id,
                result: result.to_string(),
                is_error: false,
            },
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!(agent = self.name(), tool = %parsed.name, error = %err, "tool call failed");
                AgentStep::Observation {
                    tool_call_id: parsed.id,
                    result: err.to_error_payload().to_string(),
                    is_error: true,
                }
            }
        };

        memory.add_step(observation);
        Ok(())
    }
}

fn first_assistant_message(response: &Value) -> Result<&Value> {
    let choices = response
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            AgentError::Completion("Missing 'choices' array in completion response".to_string())
        })?;

    choices
        .first()
        .ok_or_else(|| AgentError::Completion("Completion response contained no choices".to_string()))?
        .get("message")
        .ok_or_else(|| {
            AgentError::Completion("Completion response missing assistant message".to_string())
        })
}

/// Content can arrive as a plain string or as a list of typed parts.
fn message_text(message: &Value) -> String {
    match message.get("content") {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("")
            .trim()
            .to_string(),
        _ => String::new(),
    }
}
