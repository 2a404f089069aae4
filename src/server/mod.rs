//! HTTP facade: one planning route behind a single-origin CORS policy

use std::net::SocketAddr;
use std::sync::Arc;

use warp::{Filter, Rejection, Reply};

use crate::error::{AgentError, Result};
use crate::planner::TripPipeline;

pub mod cors;
pub mod handlers;

pub const PLAN_TRIP_PATH: &str = "plan-trip";
const MAX_BODY_BYTES: u64 = 64 * 1024;

/// All routes, with CORS and access logging applied.
///
/// Rejections are recovered twice: inside the CORS wrapper so error bodies
/// carry CORS headers, and outside it for `CorsForbidden` itself.
pub fn routes(
    pipeline: Arc<TripPipeline>,
    allowed_origin: &str,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let plan_trip = warp::path(PLAN_TRIP_PATH)
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_pipeline(pipeline))
        .and_then(handlers::plan_trip);

    plan_trip
        .recover(handlers::handle_rejection)
        .with(cors::single_origin(allowed_origin))
        .recover(handlers::handle_rejection)
        .with(warp::log("trip_planner::http"))
}

fn with_pipeline(
    pipeline: Arc<TripPipeline>,
) -> impl Filter<Extract = (Arc<TripPipeline>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || pipeline.clone())
}

pub fn bind_address(host: &str, port: u16) -> Result<SocketAddr> {
    format!("{host}:{port}")
        .parse()
        .map_err(|err| AgentError::Config(format!("Invalid bind address {host}:{port}: {err}")))
}
