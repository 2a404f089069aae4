use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use trip_planner::{server, AgentError, Capability, TripPipeline};

const ORIGIN: &str = "https://vibenavigator247.vercel.app";

struct CountingRole {
    reply: Option<&'static str>,
    calls: AtomicUsize,
}

#[async_trait]
impl Capability for CountingRole {
    fn name(&self) -> &str {
        "counting"
    }

    async fn run(&self, _prompt: &str) -> trip_planner::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .map(str::to_string)
            .ok_or_else(|| AgentError::Completion("quota exceeded".to_string()))
    }
}

fn role(reply: Option<&'static str>) -> Arc<CountingRole> {
    Arc::new(CountingRole {
        reply,
        calls: AtomicUsize::new(0),
    })
}

fn app(
    researcher: &Arc<CountingRole>,
    finder: &Arc<CountingRole>,
    planner: &Arc<CountingRole>,
) -> impl warp::Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone + 'static {
    let pipeline = TripPipeline::new(researcher.clone(), finder.clone(), planner.clone());
    server::routes(Arc::new(pipeline), ORIGIN)
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_plan_trip_success() {
    let (r, f, p) = (role(Some("research")), role(Some("hotels")), role(Some("itinerary")));

    let response = warp::test::request()
        .method("POST")
        .path("/plan-trip")
        .header("origin", ORIGIN)
        .json(&json!({ "destination": "Paris", "num_days": 3 }))
        .reply(&app(&r, &f, &p))
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        ORIGIN
    );
    assert_eq!(
        body_json(response.body()),
        json!({
            "destination": "Paris",
            "research_summary": "research",
            "hotels_and_restaurants": "hotels",
            "itinerary": "itinerary"
        })
    );
}

#[tokio::test]
async fn test_stage_failure_returns_error_payload() {
    let (r, f, p) = (role(Some("research")), role(None), role(Some("itinerary")));

    let response = warp::test::request()
        .method("POST")
        .path("/plan-trip")
        .json(&json!({ "destination": "Rome" }))
        .reply(&app(&r, &f, &p))
        .await;

    assert_eq!(response.status(), 500);
    let body = body_json(response.body());
    assert_eq!(body.as_object().unwrap().len(), 1);
    assert!(body["error"].as_str().unwrap().contains("quota exceeded"));
    assert_eq!(p.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_foreign_origin_is_rejected_before_pipeline() {
    let (r, f, p) = (role(Some("research")), role(Some("hotels")), role(Some("itinerary")));

    let response = warp::test::request()
        .method("POST")
        .path("/plan-trip")
        .header("origin", "https://evil.example.com")
        .json(&json!({ "destination": "Paris" }))
        .reply(&app(&r, &f, &p))
        .await;

    assert_eq!(response.status(), 403);
    assert!(response.headers().get("access-control-allow-origin").is_none());
    assert!(body_json(response.body())["error"].is_string());
    assert_eq!(r.calls.load(Ordering::SeqCst), 0);
    assert_eq!(f.calls.load(Ordering::SeqCst), 0);
    assert_eq!(p.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_preflight_from_allowed_origin() {
    let (r, f, p) = (role(Some("r")), role(Some("h")), role(Some("i")));

    let response = warp::test::request()
        .method("OPTIONS")
        .path("/plan-trip")
        .header("origin", ORIGIN)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .reply(&app(&r, &f, &p))
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        ORIGIN
    );
    assert_eq!(r.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (r, f, p) = (role(Some("r")), role(Some("h")), role(Some("i")));

    let response = warp::test::request()
        .method("POST")
        .path("/plan-trip")
        .header("content-type", "application/json")
        .body("{\"destination\": ")
        .reply(&app(&r, &f, &p))
        .await;

    assert_eq!(response.status(), 400);
    assert!(body_json(response.body())["error"].is_string());
    assert_eq!(r.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_content_length_is_json_error() {
    let (r, f, p) = (role(Some("r")), role(Some("h")), role(Some("i")));

    // no body, so no content-length header is set
    let response = warp::test::request()
        .method("POST")
        .path("/plan-trip")
        .header("origin", ORIGIN)
        .reply(&app(&r, &f, &p))
        .await;

    assert_eq!(response.status(), 411);
    assert!(body_json(response.body())["error"].is_string());
    assert_eq!(r.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_only_post_is_routed() {
    let (r, f, p) = (role(Some("r")), role(Some("h")), role(Some("i")));

    let response = warp::test::request()
        .method("GET")
        .path("/plan-trip")
        .reply(&app(&r, &f, &p))
        .await;

    assert_eq!(response.status(), 405);

    let response = warp::test::request()
        .method("POST")
        .path("/somewhere-else")
        .json(&json!({}))
        .reply(&app(&r, &f, &p))
        .await;

    assert_eq!(response.status(), 404);
}
