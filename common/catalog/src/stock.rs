use serde::{Deserialize, Serialize};
use std::fmt;

use crate::CatalogError;

/// An exact ratio, compared by cross-multiplication instead of floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    pub numerator: i64,
    pub denominator: i64,
}

/// Stock below this share of `min_stock_level` is critical.
pub const CRITICAL_STOCK_FRACTION: Fraction = Fraction { numerator: 3, denominator: 10 };

/// Severity-ordered: `Critical < Low < Adequate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    Critical,
    Low,
    Adequate,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Adequate => "Adequate",
            StockStatus::Low => "Low",
            StockStatus::Critical => "Critical",
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            StockStatus::Adequate => "🟢",
            StockStatus::Low => "🟡",
            StockStatus::Critical => "🔴",
        }
    }

    pub fn needs_restock(&self) -> bool {
        *self != StockStatus::Adequate
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify on-hand stock against its minimum level.
///
/// Intervals: `[0, 0.3·min)` critical, `[0.3·min, min)` low, `[min, ∞)` adequate.
/// Both boundaries resolve toward the better status. Negative stock is not
/// rejected and falls into `Critical`.
pub fn classify(stock_quantity: i64, min_stock_level: i64) -> Result<StockStatus, CatalogError> {
    if min_stock_level <= 0 {
        return Err(CatalogError::InvalidMinStockLevel(min_stock_level));
    }
    let Fraction { numerator, denominator } = CRITICAL_STOCK_FRACTION;
    let scaled_stock = i128::from(stock_quantity) * i128::from(denominator);
    let critical_line = i128::from(min_stock_level) * i128::from(numerator);
    let status = if scaled_stock < critical_line {
        StockStatus::Critical
    } else if stock_quantity < min_stock_level {
        StockStatus::Low
    } else {
        StockStatus::Adequate
    };
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hundred_unit_boundaries() {
        assert_eq!(classify(29, 100), Ok(StockStatus::Critical));
        assert_eq!(classify(30, 100), Ok(StockStatus::Low));
        assert_eq!(classify(99, 100), Ok(StockStatus::Low));
        assert_eq!(classify(100, 100), Ok(StockStatus::Adequate));
        assert_eq!(classify(0, 100), Ok(StockStatus::Critical));
    }

    #[test]
    fn fractional_critical_line() {
        // 0.3 * 15 = 4.5
        assert_eq!(classify(4, 15), Ok(StockStatus::Critical));
        assert_eq!(classify(5, 15), Ok(StockStatus::Low));
        // 0.3 * 10 = 3 exactly; 0.1 + 0.2 style float drift must not push 3 into critical
        assert_eq!(classify(3, 10), Ok(StockStatus::Low));
        assert_eq!(classify(2, 10), Ok(StockStatus::Critical));
    }

    #[test]
    fn min_level_of_one() {
        assert_eq!(classify(0, 1), Ok(StockStatus::Critical));
        assert_eq!(classify(1, 1), Ok(StockStatus::Adequate));
    }

    #[test]
    fn non_positive_min_level_rejected() {
        assert_eq!(classify(5, 0), Err(CatalogError::InvalidMinStockLevel(0)));
        assert_eq!(classify(5, -3), Err(CatalogError::InvalidMinStockLevel(-3)));
    }

    #[test]
    fn negative_stock_is_critical() {
        assert_eq!(classify(-4, 10), Ok(StockStatus::Critical));
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        assert_eq!(classify(i64::MAX, i64::MAX), Ok(StockStatus::Adequate));
        assert_eq!(classify(i64::MAX / 4, i64::MAX), Ok(StockStatus::Critical));
    }

    #[test]
    fn severity_ordering() {
        assert!(StockStatus::Critical < StockStatus::Low);
        assert!(StockStatus::Low < StockStatus::Adequate);
        assert_eq!(StockStatus::Low.to_string(), "Low");
        assert!(!StockStatus::Adequate.needs_restock());
    }
}
