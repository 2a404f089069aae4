pub mod agent;
pub mod memory;
pub mod steps;

use async_trait::async_trait;

pub use crate::types::result::{RunResult, TokenUsage};
pub use agent::Agent;
pub use memory::AgentMemory;
pub use steps::AgentStep;

/// Anything that can execute a prompt and hand back text.
///
/// [`Agent`] is the production implementation; the pipeline only sees this trait.
#[async_trait]
pub trait Capability: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, prompt: &str) -> crate::Result<String>;
}
