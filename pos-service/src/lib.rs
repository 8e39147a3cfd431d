pub mod admin_handlers;
pub mod app_state;
pub mod cart;
pub mod catalog_handlers;
pub mod config;
pub mod extract;
pub mod receipt;
pub mod reports;
pub mod sales_handlers;
pub mod session;
pub mod session_handlers;
pub mod settings;

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method, Request, StatusCode,
    },
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Router,
};
use common_http_errors::ERROR_CODE_HEADER;
use common_observability::PosMetrics;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub use app_state::AppState;
pub use common_http_errors::ApiError;
pub use config::ServiceConfig;

pub const SERVICE_NAME: &str = "pos-service";

async fn health() -> &'static str {
    "ok"
}

async fn metrics_endpoint(State(state): State<AppState>) -> (StatusCode, String) {
    match state.metrics.render() {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}")),
    }
}

async fn error_metrics_mw(State(metrics): State<Arc<PosMetrics>>, req: Request<Body>, next: Next) -> Response {
    let resp = next.run(req).await;
    let status = resp.status();
    if status.as_u16() >= 400 {
        let code = resp
            .headers()
            .get(ERROR_CODE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");
        metrics
            .http_errors_total
            .with_label_values(&[SERVICE_NAME, code, status.as_str()])
            .inc();
    }
    resp
}

fn cors(config: &ServiceConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
}

pub fn app(state: AppState) -> Router {
    let cors = cors(&state.config);
    Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/session", get(session_handlers::current_user))
        .route("/session/login", post(session_handlers::login))
        .route("/session/logout", post(session_handlers::logout))
        .route("/catalog", get(catalog_handlers::list_catalog))
        .route("/inventory", get(catalog_handlers::list_inventory))
        .route("/inventory/search", get(catalog_handlers::search_inventory))
        .route("/dashboard", get(catalog_handlers::dashboard))
        .route("/cart", get(sales_handlers::get_cart).delete(sales_handlers::clear_cart))
        .route("/cart/items", post(sales_handlers::add_item))
        .route("/cart/items/:product_id", delete(sales_handlers::remove_item))
        .route("/sales", post(sales_handlers::complete_sale))
        .route("/sales/last", get(sales_handlers::last_receipt))
        .route("/reports/summary", get(admin_handlers::sales_report))
        .route("/settings", get(admin_handlers::get_settings).put(admin_handlers::update_settings))
        .route("/users", get(admin_handlers::list_users))
        .layer(middleware::from_fn_with_state(state.metrics.clone(), error_metrics_mw))
        .layer(cors)
        .with_state(state)
}
