use common_money::Money;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::sort::{Sorter, SortOrder, DEFAULT_SORTER};
use crate::stock::StockStatus;
use crate::{CatalogError, Product};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StockCounts {
    pub total: usize,
    pub adequate: usize,
    /// Low but not critical.
    pub low: usize,
    pub critical: usize,
}

impl StockCounts {
    fn record(&mut self, status: StockStatus) {
        self.total += 1;
        match status {
            StockStatus::Adequate => self.adequate += 1,
            StockStatus::Low => self.low += 1,
            StockStatus::Critical => self.critical += 1,
        }
    }

    /// Everything below minimum, the dashboard's "low stock items" figure.
    pub fn below_minimum(&self) -> usize {
        self.low + self.critical
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockSummary {
    pub counts: StockCounts,
    pub stock_value: Money,
    pub by_category: BTreeMap<String, StockCounts>,
}

impl StockSummary {
    pub fn from_products(products: &[Product]) -> Result<Self, CatalogError> {
        let mut counts = StockCounts::default();
        let mut by_category: BTreeMap<String, StockCounts> = BTreeMap::new();
        for product in products {
            let status = product.stock_status()?;
            counts.record(status);
            by_category.entry(product.category.clone()).or_default().record(status);
        }
        let stock_value = products.iter().map(Product::stock_value).sum();
        Ok(Self { counts, stock_value, by_category })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockAlert {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub stock_quantity: i32,
    pub min_stock_level: i32,
    pub status: StockStatus,
}

/// One alert per product below its minimum level, in input order.
pub fn low_stock_alerts(products: &[Product]) -> Result<Vec<StockAlert>, CatalogError> {
    let mut alerts = Vec::new();
    for product in products {
        let status = product.stock_status()?;
        if status.needs_restock() {
            alerts.push(StockAlert {
                product_id: product.id,
                name: product.name.clone(),
                category: product.category.clone(),
                stock_quantity: product.stock_quantity,
                min_stock_level: product.min_stock_level,
                status,
            });
        }
    }
    Ok(alerts)
}

/// Highest stock value first, at most `limit` entries.
pub fn top_by_stock_value(products: &[Product], limit: usize) -> Vec<(&Product, Money)> {
    let valued: Vec<(&Product, Money)> = products.iter().map(|p| (p, p.stock_value())).collect();
    let ascending = DEFAULT_SORTER.sort_by_key(valued, |(_, value)| value.clone());
    let mut ranked = SortOrder::Descending.apply(ascending);
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_products;

    #[test]
    fn sample_summary() {
        let summary = StockSummary::from_products(&sample_products()).unwrap();
        assert_eq!(summary.counts, StockCounts { total: 10, adequate: 8, low: 2, critical: 0 });
        assert_eq!(summary.counts.below_minimum(), 2);
        assert_eq!(summary.stock_value, Money::from_cents(7_526_000));
        assert_eq!(summary.by_category["Beverages"], StockCounts { total: 4, adequate: 2, low: 2, critical: 0 });
        assert_eq!(summary.by_category.keys().collect::<Vec<_>>(), ["Beverages", "Dessert", "Food"]);
    }

    #[test]
    fn distribution_always_sums_to_total() {
        let mut products = sample_products();
        products[0].stock_quantity = 1;
        products[5].stock_quantity = 14;
        let c = StockSummary::from_products(&products).unwrap().counts;
        assert_eq!(c.adequate + c.low + c.critical, c.total);
        assert_eq!(c.critical, 1);
        assert_eq!(c.low, 3);
    }

    #[test]
    fn invalid_min_level_is_reported() {
        let mut products = sample_products();
        products[2].min_stock_level = 0;
        assert_eq!(StockSummary::from_products(&products), Err(CatalogError::InvalidMinStockLevel(0)));
    }

    #[test]
    fn alerts_cover_low_and_critical() {
        let mut products = sample_products();
        products[3].stock_quantity = 2;
        let alerts = low_stock_alerts(&products).unwrap();
        let got: Vec<(i64, StockStatus)> = alerts.iter().map(|a| (a.product_id, a.status)).collect();
        assert_eq!(got, [(3, StockStatus::Low), (4, StockStatus::Critical)]);
    }

    #[test]
    fn top_products_by_value() {
        let products = sample_products();
        let top = top_by_stock_value(&products, 3);
        let ids: Vec<i64> = top.iter().map(|(p, _)| p.id).collect();
        // Sandwich 13500, Chicken Wings 11700, Burger 11250, Pizza 9600, Water 7500
        assert_eq!(ids, [5, 8, 6]);
        assert_eq!(top[0].1, Money::from_cents(1_350_000));
        assert_eq!(top_by_stock_value(&products, 50).len(), 10);
    }
}
