use common_money::Money;
use serde::{Deserialize, Serialize};

use crate::stock::{classify, StockStatus};
use crate::CatalogError;

pub const CATEGORIES: &[&str] = &["Beverages", "Food", "Dessert", "Snacks", "Other"];

pub const DEFAULT_MIN_STOCK_LEVEL: i32 = 10;
pub const DEFAULT_MAX_STOCK_LEVEL: i32 = 100;

fn default_min_stock_level() -> i32 {
    DEFAULT_MIN_STOCK_LEVEL
}

fn default_max_stock_level() -> i32 {
    DEFAULT_MAX_STOCK_LEVEL
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: Money,
    pub stock_quantity: i32,
    #[serde(default = "default_min_stock_level")]
    pub min_stock_level: i32,
    #[serde(default = "default_max_stock_level")]
    pub max_stock_level: i32,
    #[serde(default)]
    pub description: String,
}

impl Product {
    pub fn new(id: i64, name: &str, category: &str, price: Money, stock_quantity: i32, min_stock_level: i32) -> Self {
        Self {
            id,
            name: name.to_string(),
            category: category.to_string(),
            price,
            stock_quantity,
            min_stock_level,
            max_stock_level: DEFAULT_MAX_STOCK_LEVEL,
            description: String::new(),
        }
    }

    pub fn stock_status(&self) -> Result<StockStatus, CatalogError> {
        classify(self.stock_quantity.into(), self.min_stock_level.into())
    }

    /// price × on-hand quantity
    pub fn stock_value(&self) -> Money {
        self.price.times(self.stock_quantity.into())
    }
}

/// The demo product set the dashboard runs on when no store is attached.
pub fn sample_products() -> Vec<Product> {
    vec![
        Product::new(1, "Bottled Water", "Beverages", Money::from_cents(5_000), 150, 20),
        Product::new(2, "Soda", "Beverages", Money::from_cents(8_000), 75, 30),
        Product::new(3, "Coffee", "Beverages", Money::from_cents(15_000), 15, 25),
        Product::new(4, "Tea", "Beverages", Money::from_cents(12_000), 8, 15),
        Product::new(5, "Sandwich", "Food", Money::from_cents(30_000), 45, 20),
        Product::new(6, "Burger", "Food", Money::from_cents(45_000), 25, 15),
        Product::new(7, "Pizza", "Food", Money::from_cents(80_000), 12, 10),
        Product::new(8, "Chicken Wings", "Food", Money::from_cents(65_000), 18, 15),
        Product::new(9, "Ice Cream", "Dessert", Money::from_cents(20_000), 35, 20),
        Product::new(10, "Cake Slice", "Dessert", Money::from_cents(25_000), 22, 10),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_set_is_well_formed() {
        let products = sample_products();
        assert_eq!(products.len(), 10);
        assert!(products.iter().all(|p| p.min_stock_level > 0));
        assert!(products.iter().all(|p| CATEGORIES.contains(&p.category.as_str())));
        let mut ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        ids.dedup();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn stock_value_multiplies_price_by_quantity() {
        let water = &sample_products()[0];
        assert_eq!(water.stock_value(), Money::from_cents(750_000));
    }

    #[test]
    fn deserialize_fills_optional_fields() {
        let p: Product = serde_json::from_str(
            r#"{"id":11,"name":"Crisps","category":"Snacks","price":"60.5","stock_quantity":4}"#,
        )
        .unwrap();
        assert_eq!(p.min_stock_level, DEFAULT_MIN_STOCK_LEVEL);
        assert_eq!(p.max_stock_level, DEFAULT_MAX_STOCK_LEVEL);
        assert_eq!(p.price, Money::from_cents(6_050));
        assert_eq!(p.stock_status(), Ok(StockStatus::Low));
    }
}
