use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{error, info, instrument};

use super::prompts;
use super::roles::Crew;
use crate::{core::Capability, error::AgentError, types::TripPlan, types::TripRequest};

/// Pipeline stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Research,
    Accommodation,
    Itinerary,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Research => "research",
            Stage::Accommodation => "accommodation",
            Stage::Itinerary => "itinerary",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first stage failure; later stages were never started.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: AgentError,
}

/// Runs research, accommodation and itinerary strictly one after another.
#[derive(Clone)]
pub struct TripPipeline {
    researcher: Arc<dyn Capability>,
    finder: Arc<dyn Capability>,
    planner: Arc<dyn Capability>,
}

impl fmt::Debug for TripPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripPipeline")
            .field("researcher", &self.researcher.name())
            .field("finder", &self.finder.name())
            .field("planner", &self.planner.name())
            .finish()
    }
}

impl TripPipeline {
    pub fn new(
        researcher: Arc<dyn Capability>,
        finder: Arc<dyn Capability>,
        planner: Arc<dyn Capability>,
    ) -> Self {
        Self {
            researcher,
            finder,
            planner,
        }
    }

    pub fn from_crew(crew: Crew) -> Self {
        Self::new(
            Arc::new(crew.researcher),
            Arc::new(crew.finder),
            Arc::new(crew.planner),
        )
    }

    #[instrument(skip_all, fields(destination = request.destination_label(), num_days = request.num_days))]
    pub async fn plan(&self, request: &TripRequest) -> Result<TripPlan, StageError> {
        let research = run_stage(
            Stage::Research,
            self.researcher.as_ref(),
            &prompts::research_prompt(request),
        )
        .await?;

        let hotels = run_stage(
            Stage::Accommodation,
            self.finder.as_ref(),
            &prompts::accommodation_prompt(request),
        )
        .await?;

        let itinerary = run_stage(
            Stage::Itinerary,
            self.planner.as_ref(),
            &prompts::itinerary_prompt(request, &research, &hotels),
        )
        .await?;

        Ok(TripPlan {
            destination: request.destination.clone(),
            research_summary: research,
            hotels_and_restaurants: hotels,
            itinerary,
        })
    }
}

async fn run_stage(stage: Stage, role: &dyn Capability, prompt: &str) -> Result<String, StageError> {
    let started = Instant::now();
    info!(stage = %stage, role = role.name(), "stage started");

    match role.run(prompt).await {
        Ok(output) => {
            info!(
                stage = %stage,
                elapsed_ms = started.elapsed().as_millis() as u64,
                chars = output.len(),
                "stage finished"
            );
            Ok(output)
        }
        Err(source) => {
            error!(stage = %stage, role = role.name(), error = %source, "stage failed");
            Err(StageError { stage, source })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct Echo(&'static str);

    #[async_trait]
    impl Capability for Echo {
        fn name(&self) -> &str {
            self.0
        }

        async fn run(&self, _prompt: &str) -> crate::Result<String> {
            Ok(format!("{} output", self.0))
        }
    }

    #[test]
    fn test_stage_error_message_names_stage() {
        let err = StageError {
            stage: Stage::Accommodation,
            source: AgentError::RateLimit { retry_after: 2 },
        };
        assert_eq!(
            err.to_string(),
            "accommodation stage failed: Rate limit exceeded: retry after 2s"
        );
    }

    #[tokio::test]
    async fn test_plan_echoes_destination() {
        let pipeline = TripPipeline::new(
            Arc::new(Echo("research")),
            Arc::new(Echo("hotels")),
            Arc::new(Echo("itinerary")),
        );

        let plan = pipeline.plan(&TripRequest::to("Cairo")).await.unwrap();
        assert_eq!(plan.destination.as_deref(), Some("Cairo"));
        assert_eq!(plan.research_summary, "research output");
        assert_eq!(plan.hotels_and_restaurants, "hotels output");
        assert_eq!(plan.itinerary, "itinerary output");
        assert!(format!("{:?}", pipeline).contains("research"));
    }
}
