use axum::{extract::State, http::StatusCode, Json};
use common_http_errors::ApiResult;
use common_security::{authenticate, SessionUser};
use serde::Deserialize;
use tracing::info;

use crate::app_state::AppState;
use crate::extract::ApiJson;
use crate::session::AuthSession;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(State(state): State<AppState>, ApiJson(req): ApiJson<LoginRequest>) -> ApiResult<Json<SessionUser>> {
    match authenticate(&state.users, &req.username, &req.password, state.config.demo_mode) {
        Ok(user) => {
            state.metrics.login_attempts_total.with_label_values(&["success"]).inc();
            state.session()?.sign_in(user.clone());
            Ok(Json(user))
        }
        Err(e) => {
            state.metrics.login_attempts_total.with_label_values(&["failure"]).inc();
            Err(e.into())
        }
    }
}

pub async fn logout(State(state): State<AppState>) -> ApiResult<StatusCode> {
    if let Some(user) = state.session()?.sign_out() {
        info!(username = %user.username, "logged_out");
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn current_user(AuthSession(user): AuthSession) -> Json<SessionUser> {
    Json(user)
}
