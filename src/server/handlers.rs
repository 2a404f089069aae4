use std::convert::Infallible;
use std::sync::Arc;

use tracing::{error, info, warn};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::planner::TripPipeline;
use crate::types::{ErrorBody, TripRequest};

fn error_reply(message: impl Into<String>, status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&ErrorBody {
            error: message.into(),
        }),
        status,
    )
}

/// `POST /plan-trip`
pub async fn plan_trip(
    request: TripRequest,
    pipeline: Arc<TripPipeline>,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, Infallible> {
    info!(
        destination = request.destination_label(),
        num_days = request.num_days,
        "planning trip"
    );

    match pipeline.plan(&request).await {
        Ok(plan) => Ok(warp::reply::with_status(
            warp::reply::json(&plan),
            StatusCode::OK,
        )),
        Err(err) => {
            error!(stage = %err.stage, error = %err, "trip planning failed");
            Ok(error_reply(err.to_string(), StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

/// Turns warp rejections into `{"error": ...}` bodies.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Rejection> {
    let (status, message) = if let Some(cors) = err.find::<warp::cors::CorsForbidden>() {
        warn!(reason = %cors, "cross-origin request rejected");
        (StatusCode::FORBIDDEN, cors.to_string())
    } else if let Some(body) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, body.to_string())
    } else if let Some(media) = err.find::<warp::reject::UnsupportedMediaType>() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, media.to_string())
    } else if let Some(too_large) = err.find::<warp::reject::PayloadTooLarge>() {
        (StatusCode::PAYLOAD_TOO_LARGE, too_large.to_string())
    } else if let Some(missing) = err.find::<warp::reject::LengthRequired>() {
        (StatusCode::LENGTH_REQUIRED, missing.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else {
        return Err(err);
    };

    Ok(error_reply(message, status))
}
