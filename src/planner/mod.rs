//! Trip planning: prompt templates, the role crew and the sequential pipeline

pub mod pipeline;
pub mod prompts;
pub mod roles;

pub use pipeline::{Stage, StageError, TripPipeline};
pub use roles::Crew;
