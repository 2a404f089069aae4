use crate::{
    config::AppConfig,
    error::Result,
    services::openai_client::OpenAIClient,
    tools::FunctionFactory,
};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::Capability;

/// A named role backed by the reasoning engine.
///
/// Researcher, finder and planner are all instances of this type; they differ
/// only in name, instructions and tool set.
#[derive(Debug, Clone)]
pub struct Agent {
    name: String,
    instructions: Vec<String>,
    openai_client: OpenAIClient,
    function_factory: FunctionFactory,
    model: String,
    max_iterations: usize,
    max_tokens: Option<u32>,
    timeout: Duration,
    add_datetime_to_instructions: bool,
}

impl Agent {
    pub fn new(name: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            name: name.into(),
            instructions: Vec::new(),
            openai_client: OpenAIClient::new(api_key),
            function_factory: FunctionFactory::new(),
            model: crate::config::DEFAULT_MODEL.to_string(),
            max_iterations: 10,
            max_tokens: None,
            timeout: Duration::from_secs(120),
            add_datetime_to_instructions: false,
        }
    }

    /// Role with the model, endpoint and limits taken from `config`
    pub fn from_config(name: impl Into<String>, config: &AppConfig) -> Self {
        Self::new(name, config.llm_api_key.clone())
            .with_model(config.model.as_str())
            .with_base_url(config.llm_base_url.as_str())
            .with_max_retries(config.max_retries)
            .with_max_iterations(config.max_iterations)
            .with_timeout(config.timeout)
    }

    pub fn with_instructions<I, S>(mut self, instructions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructions = instructions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tools(mut self, function_factory: FunctionFactory) -> Self {
        self.function_factory = function_factory;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.openai_client.set_base_url(base_url);
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.openai_client.set_max_retries(max_retries);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_datetime_in_instructions(mut self, enabled: bool) -> Self {
        self.add_datetime_to_instructions = enabled;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub(crate) fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn function_factory(&self) -> &FunctionFactory {
        &self.function_factory
    }

    /// System message content: identity, instruction bullets and, when
    /// enabled, the current local time.
    pub fn system_prompt(&self) -> String {
        let mut prompt = format!("You are {}.", self.name);

        if !self.instructions.is_empty() {
            prompt.push_str("\n\n## Instructions\n");
            for instruction in &self.instructions {
                prompt.push_str("- ");
                prompt.push_str(instruction);
                prompt.push('\n');
            }
        }

        if self.add_datetime_to_instructions {
            prompt.push_str(&format!(
                "\nThe current time is {}.",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S %Z")
            ));
        }

        prompt
    }

    /// Run the role and return only its final text
    pub async fn run(&self, prompt: &str) -> Result<String> {
        self.run_with_steps(prompt).await.map(|result| result.output)
    }

    pub(crate) async fn make_raw_request(&self, request_body: &Value) -> Result<Value> {
        self.openai_client
            .chat_completion(request_body, self.timeout())
            .await
    }
}

#[async_trait]
impl Capability for Agent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, prompt: &str) -> Result<String> {
        Agent::run(self, prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_lists_instructions() {
        let agent = Agent::new("Researcher", None)
            .with_instructions(["Find attractions.", "Cite sources."]);

        let prompt = agent.system_prompt();
        assert!(prompt.starts_with("You are Researcher."));
        assert!(prompt.contains("- Find attractions.\n"));
        assert!(prompt.contains("- Cite sources.\n"));
        assert!(!prompt.contains("current time"));
    }

    #[test]
    fn test_datetime_is_appended_when_enabled() {
        let agent = Agent::new("Planner", None).with_datetime_in_instructions(true);
        assert!(agent.system_prompt().contains("The current time is"));
    }

    #[test]
    fn test_from_config_copies_limits() {
        let config = AppConfig {
            model: "test-model".to_string(),
            max_iterations: 3,
            timeout: Duration::from_secs(7),
            ..AppConfig::default()
        };

        let agent = Agent::from_config("Finder", &config);
        assert_eq!(agent.name(), "Finder");
        assert_eq!(agent.model(), "test-model");
        assert_eq!(agent.max_iterations(), 3);
        assert_eq!(agent.timeout(), Duration::from_secs(7));
    }

    #[tokio::test]
    async fn test_run_without_credentials_fails() {
        let agent = Agent::new("Researcher", None);
        let err = agent.run("Research Oslo").await.unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }
}
