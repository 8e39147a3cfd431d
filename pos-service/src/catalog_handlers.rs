use axum::{
    extract::State,
    Json,
};
use common_catalog::{
    low_stock_alerts, sort_view, top_by_stock_value, CatalogError, InventoryView, Product, ProductFilter, SortKey,
    SortOrder, StockAlert, StockCounts, StockStatus, StockSummary,
};
use common_http_errors::{ApiError, ApiResult};
use common_money::{format_amount, Money};
use common_security::Capability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::app_state::AppState;
use crate::extract::ApiQuery;
use crate::session::AuthSession;

pub const DASHBOARD_TOP_PRODUCTS: usize = 8;

pub(crate) fn catalog_error(e: CatalogError) -> ApiError {
    match e {
        CatalogError::UnknownSortKey(_) => ApiError::bad_request("invalid_sort", e.to_string()),
        CatalogError::UnknownView(_) => ApiError::bad_request("invalid_view", e.to_string()),
        CatalogError::InvalidMinStockLevel(_) => ApiError::internal(e, None),
    }
}

/// One product with its derived stock status.
#[derive(Debug, Serialize)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: Money,
    pub stock_quantity: i32,
    pub min_stock_level: i32,
    pub max_stock_level: i32,
    pub description: String,
    pub status: StockStatus,
    pub indicator: &'static str,
}

impl ProductRow {
    fn from_product(p: &Product) -> ApiResult<Self> {
        let status = p.stock_status().map_err(catalog_error)?;
        Ok(Self {
            id: p.id,
            name: p.name.clone(),
            category: p.category.clone(),
            price: p.price.clone(),
            stock_quantity: p.stock_quantity,
            min_stock_level: p.min_stock_level,
            max_stock_level: p.max_stock_level,
            description: p.description.clone(),
            status,
            indicator: status.indicator(),
        })
    }
}

fn rows(products: &[&Product]) -> ApiResult<Vec<ProductRow>> {
    products.iter().map(|p| ProductRow::from_product(p)).collect()
}

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub count: usize,
    pub products: Vec<ProductRow>,
}

impl ProductList {
    fn new(products: Vec<ProductRow>) -> Self {
        Self { count: products.len(), products }
    }
}

/// `name_asc`, `name_desc`, `price_asc`, `price_desc`.
fn parse_catalog_sort(raw: &str) -> ApiResult<(SortKey, SortOrder)> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "name_asc" => Ok((SortKey::Name, SortOrder::Ascending)),
        "name_desc" => Ok((SortKey::Name, SortOrder::Descending)),
        "price_asc" => Ok((SortKey::Price, SortOrder::Ascending)),
        "price_desc" => Ok((SortKey::Price, SortOrder::Descending)),
        other => Err(ApiError::bad_request("invalid_sort", format!("unknown catalog sort {other:?}"))),
    }
}

fn parse_order(raw: &str) -> ApiResult<SortOrder> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "asc" | "ascending" => Ok(SortOrder::Ascending),
        "desc" | "descending" => Ok(SortOrder::Descending),
        other => Err(ApiError::bad_request("invalid_order", format!("unknown sort order {other:?}"))),
    }
}

fn parse_money(field: &'static str, raw: &str) -> ApiResult<Money> {
    raw.parse::<Money>().map_err(|e| ApiError::bad_request(field, e.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
}

pub async fn list_catalog(
    State(state): State<AppState>,
    auth: AuthSession,
    ApiQuery(q): ApiQuery<CatalogQuery>,
) -> ApiResult<Json<ProductList>> {
    auth.require(Capability::CatalogView)?;
    let (key, order) = match q.sort.as_deref() {
        Some(raw) => parse_catalog_sort(raw)?,
        None => (SortKey::Name, SortOrder::Ascending),
    };
    let timer = state.metrics.catalog_sort_duration_seconds.start_timer();
    let mut filter = ProductFilter::new();
    if let Some(term) = q.search.as_deref() {
        filter = filter.search(term);
    }
    if let Some(category) = q.category.as_deref() {
        filter = filter.category(category);
    }
    let view = sort_view(filter.apply(&state.catalog), key, order);
    let products = rows(&view)?;
    timer.observe_duration();
    Ok(Json(ProductList::new(products)))
}

#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    pub view: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InventoryReport {
    pub view: InventoryView,
    pub count: usize,
    pub products: Vec<ProductRow>,
    /// Over the whole catalog, regardless of `view`.
    pub totals: StockCounts,
    pub by_category: BTreeMap<String, StockCounts>,
    pub stock_value: Money,
}

pub async fn list_inventory(
    State(state): State<AppState>,
    auth: AuthSession,
    ApiQuery(q): ApiQuery<InventoryQuery>,
) -> ApiResult<Json<InventoryReport>> {
    auth.require(Capability::InventoryView)?;
    let view: InventoryView = q.view.as_deref().map(str::parse).transpose().map_err(catalog_error)?.unwrap_or_default();
    let key: SortKey = q.sort_by.as_deref().map(str::parse).transpose().map_err(catalog_error)?.unwrap_or(SortKey::Name);
    let order = q.order.as_deref().map(parse_order).transpose()?.unwrap_or_default();

    let timer = state.metrics.catalog_sort_duration_seconds.start_timer();
    let selected = sort_view(ProductFilter::new().view(view).apply(&state.catalog), key, order);
    let products = rows(&selected)?;
    timer.observe_duration();

    let summary = StockSummary::from_products(&state.catalog).map_err(catalog_error)?;
    Ok(Json(InventoryReport {
        view,
        count: products.len(),
        products,
        totals: summary.counts,
        by_category: summary.by_category,
        stock_value: summary.stock_value,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
    /// Comma separated.
    pub categories: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
}

pub async fn search_inventory(
    State(state): State<AppState>,
    auth: AuthSession,
    ApiQuery(q): ApiQuery<SearchQuery>,
) -> ApiResult<Json<ProductList>> {
    auth.require(Capability::InventoryView)?;
    let mut filter = ProductFilter::new();
    if let Some(name) = q.name.as_deref() {
        filter = filter.name_contains(name);
    }
    if let Some(raw) = q.categories.as_deref() {
        filter = filter.categories(raw.split(',').map(str::trim).filter(|c| !c.is_empty()));
    }
    if let Some(raw) = q.min_price.as_deref() {
        filter = filter.min_price(parse_money("invalid_min_price", raw)?);
    }
    if let Some(raw) = q.max_price.as_deref() {
        filter = filter.max_price(parse_money("invalid_max_price", raw)?);
    }
    if let Some(min) = q.min_stock {
        filter = filter.min_stock(min);
    }
    if let Some(max) = q.max_stock {
        filter = filter.max_stock(max);
    }
    let products = rows(&filter.apply(&state.catalog))?;
    Ok(Json(ProductList::new(products)))
}

#[derive(Debug, Serialize)]
pub struct ValuedProduct {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub stock_quantity: i32,
    pub stock_value: Money,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub business_name: String,
    pub total_products: usize,
    /// Below minimum, critical included.
    pub low_stock_items: usize,
    pub critical_items: usize,
    pub stock_value: Money,
    pub stock_value_display: String,
    pub distribution: StockCounts,
    pub top_by_value: Vec<ValuedProduct>,
    /// Empty when low-stock alerts are switched off in settings.
    pub alerts: Vec<StockAlert>,
}

pub async fn dashboard(State(state): State<AppState>, auth: AuthSession) -> ApiResult<Json<Dashboard>> {
    auth.require(Capability::CatalogView)?;
    let settings = state.session()?.settings.clone();
    let summary = StockSummary::from_products(&state.catalog).map_err(catalog_error)?;
    let top_by_value = top_by_stock_value(&state.catalog, DASHBOARD_TOP_PRODUCTS)
        .into_iter()
        .map(|(p, stock_value)| ValuedProduct {
            id: p.id,
            name: p.name.clone(),
            category: p.category.clone(),
            stock_quantity: p.stock_quantity,
            stock_value,
        })
        .collect();
    let alerts = if settings.low_stock_alert {
        low_stock_alerts(&state.catalog).map_err(catalog_error)?
    } else {
        Vec::new()
    };
    Ok(Json(Dashboard {
        business_name: settings.business_name,
        total_products: summary.counts.total,
        low_stock_items: summary.counts.below_minimum(),
        critical_items: summary.counts.critical,
        stock_value_display: format_amount(&summary.stock_value, &settings.currency),
        stock_value: summary.stock_value,
        distribution: summary.counts,
        top_by_value,
        alerts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_sort_names() {
        assert_eq!(parse_catalog_sort("price_desc").unwrap(), (SortKey::Price, SortOrder::Descending));
        assert_eq!(parse_catalog_sort(" Name_Asc ").unwrap(), (SortKey::Name, SortOrder::Ascending));
        assert_eq!(parse_catalog_sort("stock_asc").unwrap_err().code(), "invalid_sort");
    }

    #[test]
    fn order_names() {
        assert_eq!(parse_order("desc").unwrap(), SortOrder::Descending);
        assert_eq!(parse_order("ascending").unwrap(), SortOrder::Ascending);
        assert_eq!(parse_order("up").unwrap_err().code(), "invalid_order");
    }

    #[test]
    fn invalid_min_level_is_a_server_fault() {
        let mut product = common_catalog::sample_products().remove(0);
        product.min_stock_level = 0;
        let err = ProductRow::from_product(&product).unwrap_err();
        assert_eq!(err.code(), "internal_error");
    }
}
