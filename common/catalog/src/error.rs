use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("min_stock_level must be positive, got {0}")]
    InvalidMinStockLevel(i64),
    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),
    #[error("unknown inventory view: {0}")]
    UnknownView(String),
}
