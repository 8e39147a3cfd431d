use common_money::Money;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::stock::StockStatus;
use crate::{CatalogError, Product};

/// Which slice of the inventory table to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryView {
    #[default]
    All,
    /// Everything below its minimum level, critical items included.
    Low,
    Critical,
}

impl InventoryView {
    pub fn admits(&self, status: StockStatus) -> bool {
        match self {
            InventoryView::All => true,
            InventoryView::Low => status.needs_restock(),
            InventoryView::Critical => status == StockStatus::Critical,
        }
    }
}

impl FromStr for InventoryView {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "all_products" => Ok(InventoryView::All),
            "low" | "low_stock" => Ok(InventoryView::Low),
            "critical" | "critical_stock" => Ok(InventoryView::Critical),
            other => Err(CatalogError::UnknownView(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    search: Option<String>,
    name_contains: Option<String>,
    category: Option<String>,
    categories: Vec<String>,
    min_price: Option<Money>,
    max_price: Option<Money>,
    min_stock: Option<i32>,
    max_stock: Option<i32>,
    view: InventoryView,
}

fn normalized_term(term: &str) -> Option<String> {
    let term = term.trim();
    (!term.is_empty()).then(|| term.to_lowercase())
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive match against name or category.
    pub fn search(mut self, term: &str) -> Self {
        self.search = normalized_term(term);
        self
    }

    pub fn name_contains(mut self, term: &str) -> Self {
        self.name_contains = normalized_term(term);
        self
    }

    /// Exact category; `"All"` clears the constraint.
    pub fn category(mut self, category: &str) -> Self {
        let category = category.trim();
        self.category = (!category.is_empty() && !category.eq_ignore_ascii_case("all")).then(|| category.to_string());
        self
    }

    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Inclusive on both ends.
    pub fn price_range(self, min: Money, max: Money) -> Self {
        self.min_price(min).max_price(max)
    }

    pub fn min_price(mut self, min: Money) -> Self {
        self.min_price = Some(min);
        self
    }

    pub fn max_price(mut self, max: Money) -> Self {
        self.max_price = Some(max);
        self
    }

    /// Inclusive on both ends.
    pub fn stock_range(self, min: i32, max: i32) -> Self {
        self.min_stock(min).max_stock(max)
    }

    pub fn min_stock(mut self, min: i32) -> Self {
        self.min_stock = Some(min);
        self
    }

    pub fn max_stock(mut self, max: i32) -> Self {
        self.max_stock = Some(max);
        self
    }

    pub fn view(mut self, view: InventoryView) -> Self {
        self.view = view;
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(term) = &self.search {
            let hit = product.name.to_lowercase().contains(term) || product.category.to_lowercase().contains(term);
            if !hit {
                return false;
            }
        }
        if let Some(term) = &self.name_contains {
            if !product.name.to_lowercase().contains(term) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &product.category != category {
                return false;
            }
        }
        if !self.categories.is_empty() && !self.categories.iter().any(|c| c == &product.category) {
            return false;
        }
        if self.min_price.as_ref().is_some_and(|min| &product.price < min)
            || self.max_price.as_ref().is_some_and(|max| &product.price > max)
        {
            return false;
        }
        if self.min_stock.is_some_and(|min| product.stock_quantity < min)
            || self.max_stock.is_some_and(|max| product.stock_quantity > max)
        {
            return false;
        }
        if self.view != InventoryView::All {
            // A product with an invalid minimum level cannot be classified and is left out of status views.
            match product.stock_status() {
                Ok(status) if self.view.admits(status) => {}
                _ => return false,
            }
        }
        true
    }

    /// Matching products in input order.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let kept: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        tracing::debug!(input = products.len(), kept = kept.len(), "product filter applied");
        kept
    }
}
