//! Product records and the logic every catalog, inventory and dashboard view shares:
//! ordering by a chosen field and the adequate / low / critical stock policy.

pub mod error;
pub mod filter;
pub mod product;
pub mod sort;
pub mod stock;
pub mod summary;

pub use error::CatalogError;
pub use filter::{InventoryView, ProductFilter};
pub use product::{sample_products, Product, CATEGORIES};
pub use sort::{sort_products, sort_view, MiddlePivotQuicksort, SortKey, SortOrder, SortValue, Sorter, StdSorter, DEFAULT_SORTER};
pub use stock::{classify, Fraction, StockStatus, CRITICAL_STOCK_FRACTION};
pub use summary::{low_stock_alerts, top_by_stock_value, StockAlert, StockCounts, StockSummary};
