#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pos_service::{app, AppState, ServiceConfig};
use serde_json::Value;
use tower::ServiceExt;

pub fn demo_app() -> (Router, AppState) {
    app_with_config(ServiceConfig::default())
}

pub fn app_with_config(config: ServiceConfig) -> (Router, AppState) {
    let state = AppState::with_demo_data(config);
    (app(state.clone()), state)
}

pub async fn send_raw(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Option<String>, String) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let code = resp
        .headers()
        .get("x-error-code")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, code, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Sends a request and parses the body as JSON (`Value::Null` when empty).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, text) = send_raw(app, method, uri, body).await;
    let json = if text.is_empty() { Value::Null } else { serde_json::from_str(&text).unwrap() };
    (status, json)
}

pub async fn login(app: &Router, username: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/session/login",
        Some(serde_json::json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body
}

pub fn ids(rows: &Value) -> Vec<i64> {
    rows.as_array().unwrap().iter().map(|r| r["id"].as_i64().unwrap()).collect()
}
