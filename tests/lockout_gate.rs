//! The gate middleware in front of a verification route.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderValue, Request, StatusCode},
    middleware,
    routing::post,
    Extension, Router,
};
use booking_lockout::config::FailureMode;
use booking_lockout::http::AppState;
use booking_lockout::security::{lockout_gate, LOCKOUT_SUBJECT_HEADER};
use booking_lockout::{
    AttemptStore, LockoutGuard, LockoutPolicy, ManualClock, MemoryStore, SubjectId,
};
use tower::ServiceExt;

mod common;

use common::T0;

async fn verify(Extension(subject): Extension<SubjectId>) -> String {
    format!("verified {}", subject)
}

fn app(
    store: Arc<dyn AttemptStore>,
    mode: FailureMode,
) -> (Router, LockoutGuard, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(T0));
    let guard = LockoutGuard::with_clock(store, clock.clone(), LockoutPolicy::default());
    let state = AppState::new(guard.clone(), mode);
    let router = Router::new()
        .route("/bookings/verify", post(verify))
        .route_layer(middleware::from_fn_with_state(state.clone(), lockout_gate))
        .with_state(state);
    (router, guard, clock)
}

fn request(subject: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/bookings/verify");
    if let Some(subject) = subject {
        builder = builder.header(LOCKOUT_SUBJECT_HEADER, subject);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_unlocked_subject_reaches_handler() {
    let (app, _, _) = app(Arc::new(MemoryStore::new(None)), FailureMode::Closed);

    let response = app.oneshot(request(Some("owner-1"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"verified owner-1");
}

#[tokio::test]
async fn test_missing_or_invalid_subject_is_rejected() {
    let (app, _, _) = app(Arc::new(MemoryStore::new(None)), FailureMode::Closed);

    let response = app.clone().oneshot(request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "missing_header");

    let response = app.oneshot(request(Some(""))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_subject");
}

#[tokio::test]
async fn test_header_bytes_are_decoded_as_utf8() {
    let (app, _, _) = app(Arc::new(MemoryStore::new(None)), FailureMode::Closed);

    let request = Request::builder()
        .method("POST")
        .uri("/bookings/verify")
        .header(
            LOCKOUT_SUBJECT_HEADER,
            HeaderValue::from_bytes("owner-é".as_bytes()).unwrap(),
        )
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], "verified owner-é".as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/bookings/verify")
        .header(LOCKOUT_SUBJECT_HEADER, HeaderValue::from_bytes(&[0xff, 0x41]).unwrap())
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_subject");
}

#[tokio::test]
async fn test_locked_subject_gets_429_with_retry_after() {
    let (app, guard, clock) = app(Arc::new(MemoryStore::new(None)), FailureMode::Closed);
    let subject = SubjectId::parse("owner-2").unwrap();
    for _ in 0..3 {
        guard.record_failure(&subject).unwrap();
    }
    clock.advance(Duration::from_secs(10));

    let response = app.clone().oneshot(request(Some("owner-2"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()["retry-after"], "290");
    let body = body_json(response).await;
    assert_eq!(body["locked"], true);
    assert_eq!(body["remainingAttempts"], 0);
    assert_eq!(body["message"], "locked, try again in 4m 50s");

    // The gate does not consume attempts or extend the lock.
    assert_eq!(
        guard.lockout_status(&subject).unwrap().locked_until,
        Some(T0 + 300_000)
    );

    clock.advance(Duration::from_secs(291));
    let response = app.oneshot(request(Some("owner-2"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_store_outage_follows_failure_mode() {
    let (closed, _, _) = app(Arc::new(common::UnavailableStore), FailureMode::Closed);
    let response = closed.oneshot(request(Some("owner-3"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let (open, _, _) = app(Arc::new(common::UnavailableStore), FailureMode::Open);
    let response = open.oneshot(request(Some("owner-3"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
