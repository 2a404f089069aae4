pub mod result;
pub mod trip;

pub use result::{RunResult, TokenUsage};
pub use trip::{ErrorBody, TripPlan, TripRequest};
