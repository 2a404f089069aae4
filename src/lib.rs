//! trip-planner: plans a trip by running three LLM agent roles in sequence
//!
//! A researcher and a hotel & restaurant finder (both with web search) feed a
//! planner that writes the itinerary. The whole thing sits behind a single
//! `POST /plan-trip` route.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use trip_planner::{AppConfig, Crew, TripPipeline, TripRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let pipeline = TripPipeline::from_crew(Crew::from_config(&config));
//!
//!     let plan = pipeline.plan(&TripRequest::to("Lisbon").with_num_days(3)).await?;
//!     println!("{}", plan.itinerary);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod planner;
pub mod server;
pub(crate) mod services;
pub mod tools;
pub mod types;

pub use config::AppConfig;
pub use self::core::{Agent, AgentMemory, AgentStep, Capability, RunResult, TokenUsage};
pub use error::{AgentError, Result};
pub use planner::{Crew, Stage, StageError, TripPipeline};
pub use tools::{FunctionFactory, SerpApiTool, Tool};
pub use types::{ErrorBody, TripPlan, TripRequest};

#[cfg(feature = "cli")]
pub mod cli;
