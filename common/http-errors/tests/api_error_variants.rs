use common_http_errors::ApiError;
use axum::response::IntoResponse;
use axum::http::StatusCode;
use http_body_util::BodyExt;
use uuid::Uuid;

#[test]
fn unauthorized_variant() {
    let err = ApiError::Unauthorized { code: "not_authenticated", trace_id: None };
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "not_authenticated");
}

#[test]
fn forbidden_missing_capability_variant() {
    let err = ApiError::ForbiddenMissingCapability { capability: "reports_view", trace_id: None };
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "missing_capability");
}

#[test]
fn forbidden_variant() {
    let resp = ApiError::Forbidden { trace_id: None }.into_response();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "forbidden");
}

#[test]
fn bad_request_variant() {
    let resp = ApiError::bad_request("empty_cart", "cart has no items").into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "empty_cart");
}

#[test]
fn not_found_variant() {
    let resp = ApiError::not_found("product_not_found").into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "product_not_found");
}

#[test]
fn internal_variant() {
    let trace = Some(Uuid::new_v4());
    let err = ApiError::Internal { trace_id: trace, message: Some("boom".into()) };
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "internal_error");
}

#[tokio::test]
async fn body_carries_code_and_capability() {
    let resp = ApiError::ForbiddenMissingCapability { capability: "user_admin", trace_id: None }.into_response();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "missing_capability");
    assert_eq!(json["missing_capability"], "user_admin");
    assert!(json.get("trace_id").is_none());
}
