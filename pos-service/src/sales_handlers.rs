use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Local;
use common_http_errors::{ApiError, ApiResult};
use common_money::{CartTotals, TaxRate};
use common_security::Capability;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app_state::AppState;
use crate::extract::{ApiJson, ApiPath};
use crate::cart::{Cart, CartError, CartLine};
use crate::receipt::{PaymentMethod, Receipt};
use crate::session::AuthSession;

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    #[serde(flatten)]
    pub totals: CartTotals,
}

impl CartView {
    fn of(cart: &Cart, tax_rate: &TaxRate) -> Self {
        Self { items: cart.lines().to_vec(), totals: cart.totals(tax_rate) }
    }
}

pub async fn get_cart(State(state): State<AppState>, auth: AuthSession) -> ApiResult<Json<CartView>> {
    auth.require(Capability::SalesProcess)?;
    let session = state.session()?;
    Ok(Json(CartView::of(&session.cart, &session.settings.tax_rate)))
}

#[derive(Debug, Deserialize)]
pub struct AddItem {
    pub product_id: i64,
    #[serde(default = "one")]
    pub quantity: i64,
}

fn one() -> i64 {
    1
}

pub async fn add_item(
    State(state): State<AppState>,
    auth: AuthSession,
    ApiJson(req): ApiJson<AddItem>,
) -> ApiResult<Json<CartView>> {
    auth.require(Capability::SalesProcess)?;
    let mut session = state.session()?;
    let outcome = match state.product(req.product_id) {
        Some(product) => session.cart.add(product, req.quantity).map(|_| ()),
        None => Err(CartError::UnknownProduct(req.product_id)),
    };
    if let Err(e) = outcome {
        state.metrics.cart_rejections_total.with_label_values(&[e.reason()]).inc();
        tracing::warn!(product_id = req.product_id, quantity = req.quantity, error = %e, "cart_add_rejected");
        return Err(e.into());
    }
    Ok(Json(CartView::of(&session.cart, &session.settings.tax_rate)))
}

pub async fn remove_item(
    State(state): State<AppState>,
    auth: AuthSession,
    ApiPath(product_id): ApiPath<i64>,
) -> ApiResult<Json<CartView>> {
    auth.require(Capability::SalesProcess)?;
    let mut session = state.session()?;
    session.cart.remove(product_id)?;
    Ok(Json(CartView::of(&session.cart, &session.settings.tax_rate)))
}

pub async fn clear_cart(State(state): State<AppState>, auth: AuthSession) -> ApiResult<Json<CartView>> {
    auth.require(Capability::SalesProcess)?;
    let mut session = state.session()?;
    session.cart.clear();
    Ok(Json(CartView::of(&session.cart, &session.settings.tax_rate)))
}

#[derive(Debug, Deserialize)]
pub struct CompleteSale {
    pub customer_name: String,
    pub payment_method: PaymentMethod,
    /// Overrides the settings rate for this sale only.
    pub tax_rate: Option<f64>,
}

pub async fn complete_sale(
    State(state): State<AppState>,
    auth: AuthSession,
    ApiJson(req): ApiJson<CompleteSale>,
) -> ApiResult<(StatusCode, Json<Receipt>)> {
    let cashier = auth.require(Capability::SalesProcess)?.username.clone();
    let customer = req.customer_name.trim();
    if customer.is_empty() {
        return Err(ApiError::bad_request("missing_customer_name", "customer name is required"));
    }
    let mut session = state.session()?;
    if session.cart.is_empty() {
        return Err(ApiError::bad_request("empty_cart", "cart has no items"));
    }
    let tax_rate = match req.tax_rate {
        Some(percent) => TaxRate::from_percent(percent).map_err(|e| ApiError::bad_request("invalid_tax_rate", e.to_string()))?,
        None => session.settings.tax_rate.clone(),
    };
    let items = session.cart.take();
    let receipt = Receipt::issue(items, customer, &cashier, req.payment_method, &tax_rate, &session.settings, Local::now());
    session.last_receipt = Some(receipt.clone());
    state.metrics.sales_completed_total.inc();
    info!(
        transaction_id = %receipt.transaction_id,
        cashier = %cashier,
        total = %receipt.total,
        payment_method = %receipt.payment_method,
        "sale_completed"
    );
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn last_receipt(State(state): State<AppState>, auth: AuthSession) -> ApiResult<Json<Receipt>> {
    auth.require(Capability::SalesProcess)?;
    state
        .session()?
        .last_receipt
        .clone()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("no_receipt"))
}
