use std::time::Duration;

/// CORS policy admitting exactly one browser origin.
///
/// Requests carrying any other `Origin` are rejected with `CorsForbidden`
/// before the route handler runs. Requests without an `Origin` header are not
/// CORS requests and pass through.
pub fn single_origin(origin: &str) -> warp::cors::Builder {
    warp::cors()
        .allow_origin(origin)
        .allow_headers(vec!["Content-Type", "Accept", "Origin"])
        .allow_methods(vec!["POST", "OPTIONS"])
        .max_age(Duration::from_secs(3600))
}
