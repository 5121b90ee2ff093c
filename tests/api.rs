use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use segura_alert::{create_router, AppConfig, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(AppConfig::default()));
    (create_router(Arc::clone(&state)), state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_endpoint() {
    let (app, _state) = app();

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn trigger_starts_countdown_and_second_trigger_is_ignored() {
    let (app, state) = app();

    let (status, body) = send(&app, "POST", "/alert/trigger", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "applied");
    assert_eq!(body["alert"]["phase"], "counting_down");
    assert_eq!(body["alert"]["seconds_remaining"], 30);

    let id = state.get_alert().unwrap().id;
    state.tick_alert(id).unwrap();

    let (status, body) = send(&app, "POST", "/alert/trigger", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ignored");
    assert_eq!(body["alert"]["seconds_remaining"], 29);
}

#[tokio::test]
async fn cancel_from_idle_is_a_no_op() {
    let (app, _state) = app();

    let (status, body) = send(&app, "POST", "/alert/cancel", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ignored");
    assert_eq!(body["alert"]["phase"], "idle");
}

#[tokio::test]
async fn full_flow_ends_in_history() {
    let (app, _state) = app();

    send(&app, "POST", "/alert/trigger", None).await;
    let (_, body) = send(&app, "POST", "/alert/send-now", None).await;
    assert_eq!(body["alert"]["phase"], "sent");
    assert_eq!(body["alert"]["send_reason"], "sent_manually");

    let (_, body) = send(&app, "POST", "/alert/cancel", None).await;
    assert_eq!(body["status"], "ignored");
    assert_eq!(body["alert"]["phase"], "sent");

    let (status, body) = send(
        &app,
        "POST",
        "/alert/resolve",
        Some(json!({ "feedback": "false_alarm", "observation": "pressed by accident" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "applied");
    assert_eq!(body["alert"]["phase"], "resolved");
    assert_eq!(body["alert"]["resolution_feedback"], "false_alarm");

    let (_, body) = send(&app, "GET", "/alert", None).await;
    assert_eq!(body["alert"]["phase"], "resolved");
    assert_eq!(body["countdown"]["active"], false);

    let (_, body) = send(&app, "POST", "/alert/dismiss", None).await;
    assert_eq!(body["status"], "applied");
    assert_eq!(body["alert"]["phase"], "idle");

    let (status, body) = send(&app, "GET", "/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["alerts"][0]["outcome"], "resolved");
    assert_eq!(body["alerts"][0]["feedback"], "false_alarm");
    assert_eq!(body["alerts"][0]["observation"], "pressed by accident");
}

#[tokio::test]
async fn unknown_feedback_is_rejected() {
    let (app, state) = app();
    state.trigger_alert().unwrap();
    state.send_alert_now().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/alert/resolve",
        Some(json!({ "feedback": "maybe" })),
    )
    .await;

    assert!(status.is_client_error());
    assert_eq!(state.get_alert().unwrap().phase.as_str(), "sent");
}

#[tokio::test]
async fn status_reports_countdown_and_last_action() {
    let (app, _state) = app();
    send(&app, "POST", "/alert/trigger", None).await;

    let (status, body) = send(&app, "GET", "/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countdown_active"], true);
    assert_eq!(body["countdown_remaining_seconds"], 30);
    assert_eq!(body["last_action"], "trigger");
    assert_eq!(body["history_count"], 0);
    assert_eq!(body["port"], 20553);
}

#[tokio::test]
async fn contacts_lists_defaults() {
    let (app, _state) = app();

    let (status, body) = send(&app, "GET", "/contacts", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contacts"].as_array().map(Vec::len), Some(4));
    assert_eq!(body["contacts"][0]["number"], "190");
}
