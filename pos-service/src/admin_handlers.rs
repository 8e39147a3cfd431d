use axum::{
    extract::State,
    Json,
};
use chrono::NaiveDate;
use common_http_errors::{ApiError, ApiResult};
use common_security::{Capability, UserAccount};
use serde::Deserialize;

use crate::app_state::AppState;
use crate::extract::{ApiJson, ApiQuery};
use crate::reports::{self, ReportError, SalesReport};
use crate::session::AuthSession;
use crate::settings::{Settings, SettingsUpdate};

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub seed: Option<u64>,
}

fn parse_date(field: &'static str, raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| ApiError::bad_request(field, format!("{raw:?}: {e}")))
}

fn report_error(e: ReportError) -> ApiError {
    match e {
        ReportError::EmptyCatalog => ApiError::internal(e, None),
        _ => ApiError::bad_request("invalid_report_range", e.to_string()),
    }
}

pub async fn sales_report(
    State(state): State<AppState>,
    auth: AuthSession,
    ApiQuery(q): ApiQuery<ReportQuery>,
) -> ApiResult<Json<SalesReport>> {
    auth.require(Capability::ReportsView)?;
    let (default_start, default_end) = reports::default_range();
    let start = q.start.as_deref().map(|s| parse_date("invalid_start", s)).transpose()?.unwrap_or(default_start);
    let end = q.end.as_deref().map(|s| parse_date("invalid_end", s)).transpose()?.unwrap_or(default_end);
    let seed = q.seed.unwrap_or(state.config.report_seed);
    reports::generate(&state.catalog, start, end, seed).map(Json).map_err(report_error)
}

pub async fn get_settings(State(state): State<AppState>, auth: AuthSession) -> ApiResult<Json<Settings>> {
    auth.require(Capability::CatalogView)?;
    Ok(Json(state.session()?.settings.clone()))
}

pub async fn update_settings(
    State(state): State<AppState>,
    auth: AuthSession,
    ApiJson(update): ApiJson<SettingsUpdate>,
) -> ApiResult<Json<Settings>> {
    let user = auth.require(Capability::SettingsWrite)?;
    let mut session = state.session()?;
    session.settings.apply(update)?;
    tracing::info!(username = %user.username, currency = %session.settings.currency, "settings_updated");
    Ok(Json(session.settings.clone()))
}

pub async fn list_users(State(state): State<AppState>, auth: AuthSession) -> ApiResult<Json<Vec<UserAccount>>> {
    auth.require(Capability::UserAdmin)?;
    Ok(Json(state.users.accounts().to_vec()))
}
