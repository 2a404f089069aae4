use super::steps::AgentStep;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Ordered record of a single role run, convertible to chat messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMemory {
    agent_name: String,
    system_prompt: Option<String>,
    steps: Vec<AgentStep>,
}

impl AgentMemory {
    pub fn new(agent_name: impl Into<String>, system_prompt: Option<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            system_prompt,
            steps: Vec::new(),
        }
    }

    /// Add a step to memory
    pub fn add_step(&mut self, step: AgentStep) {
        info!(
            target: "trip_planner::steps",
            agent = %self.agent_name,
            "{}",
            step.describe()
        );
        self.steps.push(step);
    }

    pub fn into_steps(self) -> Vec<AgentStep> {
        self.steps
    }

    /// Convert memory to OpenAI message format
    pub fn as_messages(&self) -> Vec<Value> {
        let mut messages = Vec::with_capacity(self.steps.len() + 1);

        if let Some(system_prompt) = &self.system_prompt {
            messages.push(serde_json::json!({
                "role": "system",
                "content": system_prompt
            }));
        }

        messages.extend(self.steps.iter().map(AgentStep::to_message));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_messages_start_with_system_prompt() {
        let mut memory = AgentMemory::new("Researcher", Some("Be thorough.".to_string()));
        memory.add_step(AgentStep::Task {
            content: "Research Rome".to_string(),
        });

        let messages = memory.as_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], json!({"role": "system", "content": "Be thorough."}));
        assert_eq!(messages[1]["role"], "user");
    }

    #[test]
    fn test_no_system_prompt() {
        let mut memory = AgentMemory::new("Planner", None);
        memory.add_step(AgentStep::FinalAnswer {
            answer: "Day 1".to_string(),
        });

        let messages = memory.as_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "assistant");
        assert_eq!(memory.into_steps().len(), 1);
    }
}
