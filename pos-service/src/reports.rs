//! Synthetic sales reporting.
//!
//! There is no sales history store, so reports are drawn from a seeded
//! generator over the current catalog. The same catalog, range and seed
//! always yield the same report.

use chrono::NaiveDate;
use common_catalog::{Product, SortOrder, Sorter, DEFAULT_SORTER};
use common_money::Money;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use thiserror::Error;

use crate::receipt::PaymentMethod;

pub const MAX_REPORT_DAYS: i64 = 366;
pub const DAILY_SALES_RANGE: RangeInclusive<u32> = 50..=200;
pub const SALE_QUANTITY_RANGE: RangeInclusive<i64> = 1..=5;

/// January 2024, the window the dashboard opens on.
pub fn default_range() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap_or_default(),
    )
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("report start {start} is after end {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
    #[error("report range of {0} days exceeds the {MAX_REPORT_DAYS} day limit")]
    RangeTooLong(i64),
    #[error("catalog is empty")]
    EmptyCatalog,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPerformance {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub quantity_sold: i64,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPerformance {
    pub quantity_sold: i64,
    pub revenue: Money,
    pub transactions: u64,
    /// Mean unit price over the category's sales.
    pub average_price: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub transactions: u64,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub seed: u64,
    pub total_sales: Money,
    pub transactions: u64,
    pub average_sale: Money,
    pub top_product: Option<String>,
    /// Highest revenue first.
    pub products: Vec<ProductPerformance>,
    pub categories: BTreeMap<String, CategoryPerformance>,
    pub payment_methods: BTreeMap<PaymentMethod, Money>,
    pub daily: Vec<DailySales>,
}

struct CategoryTally {
    quantity_sold: i64,
    revenue: Money,
    transactions: u64,
    price_sum: Money,
}

impl CategoryTally {
    fn new() -> Self {
        Self { quantity_sold: 0, revenue: Money::zero(), transactions: 0, price_sum: Money::zero() }
    }
}

pub fn generate(products: &[Product], start: NaiveDate, end: NaiveDate, seed: u64) -> Result<SalesReport, ReportError> {
    if start > end {
        return Err(ReportError::InvertedRange { start, end });
    }
    let days = (end - start).num_days() + 1;
    if days > MAX_REPORT_DAYS {
        return Err(ReportError::RangeTooLong(days));
    }
    if products.is_empty() {
        return Err(ReportError::EmptyCatalog);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut by_product: BTreeMap<usize, (i64, Money)> = BTreeMap::new();
    let mut by_category: BTreeMap<String, CategoryTally> = BTreeMap::new();
    let mut payment_methods: BTreeMap<PaymentMethod, Money> = BTreeMap::new();
    let mut daily = Vec::with_capacity(days as usize);
    let mut total_sales = Money::zero();
    let mut transactions = 0u64;

    for date in start.iter_days().take(days as usize) {
        let count = rng.gen_range(DAILY_SALES_RANGE);
        let mut day_total = Money::zero();
        for _ in 0..count {
            let idx = rng.gen_range(0..products.len());
            let quantity = rng.gen_range(SALE_QUANTITY_RANGE);
            let method = PaymentMethod::REPORTED[rng.gen_range(0..PaymentMethod::REPORTED.len())];
            let product = &products[idx];
            let amount = product.price.times(quantity);

            let entry = by_product.entry(idx).or_insert_with(|| (0, Money::zero()));
            entry.0 += quantity;
            entry.1 = entry.1.clone() + &amount;

            let tally = by_category.entry(product.category.clone()).or_insert_with(CategoryTally::new);
            tally.quantity_sold += quantity;
            tally.revenue = tally.revenue.clone() + &amount;
            tally.transactions += 1;
            tally.price_sum = tally.price_sum.clone() + &product.price;

            let paid = payment_methods.entry(method).or_insert_with(Money::zero);
            *paid = paid.clone() + &amount;

            day_total = day_total + &amount;
        }
        total_sales = total_sales + &day_total;
        transactions += u64::from(count);
        daily.push(DailySales { date, transactions: u64::from(count), total: day_total });
    }

    let performance: Vec<ProductPerformance> = by_product
        .into_iter()
        .map(|(idx, (quantity_sold, revenue))| ProductPerformance {
            product_id: products[idx].id,
            name: products[idx].name.clone(),
            category: products[idx].category.clone(),
            quantity_sold,
            revenue,
        })
        .collect();
    let top_product = top_by_quantity(&performance);
    let ascending = DEFAULT_SORTER.sort_by_key(performance, |p| p.revenue.clone());
    let products_ranked = SortOrder::Descending.apply(ascending);

    let categories = by_category
        .into_iter()
        .map(|(name, t)| {
            let average_price = t.price_sum.average_over(t.transactions as usize);
            let perf = CategoryPerformance {
                quantity_sold: t.quantity_sold,
                revenue: t.revenue,
                transactions: t.transactions,
                average_price,
            };
            (name, perf)
        })
        .collect();

    tracing::debug!(%start, %end, seed, transactions, "sales report generated");
    Ok(SalesReport {
        start,
        end,
        seed,
        average_sale: total_sales.average_over(transactions as usize),
        total_sales,
        transactions,
        top_product,
        products: products_ranked,
        categories,
        payment_methods,
        daily,
    })
}

/// Most units sold; ties go to the alphabetically first name.
fn top_by_quantity(performance: &[ProductPerformance]) -> Option<String> {
    let mut best: Option<&ProductPerformance> = None;
    for p in performance {
        best = match best {
            Some(b) if b.quantity_sold > p.quantity_sold => Some(b),
            Some(b) if b.quantity_sold == p.quantity_sold && b.name <= p.name => Some(b),
            _ => Some(p),
        };
    }
    best.map(|p| p.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_catalog::sample_products;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_seed_same_report() {
        let products = sample_products();
        let (start, end) = default_range();
        let a = generate(&products, start, end, 42).unwrap();
        let b = generate(&products, start, end, 42).unwrap();
        assert_eq!(a, b);
        let c = generate(&products, start, end, 43).unwrap();
        assert_ne!(a.daily, c.daily);
    }

    #[test]
    fn totals_are_consistent() {
        let products = sample_products();
        let (start, end) = default_range();
        let report = generate(&products, start, end, 7).unwrap();

        assert_eq!(report.daily.len(), 31);
        assert!(report.daily.iter().all(|d| DAILY_SALES_RANGE.contains(&(d.transactions as u32))));
        assert_eq!(report.daily.iter().map(|d| d.transactions).sum::<u64>(), report.transactions);
        assert_eq!(report.daily.iter().map(|d| &d.total).sum::<Money>(), report.total_sales);
        assert_eq!(report.products.iter().map(|p| &p.revenue).sum::<Money>(), report.total_sales);
        assert_eq!(report.categories.values().map(|c| &c.revenue).sum::<Money>(), report.total_sales);
        assert_eq!(report.payment_methods.values().sum::<Money>(), report.total_sales);
        assert!(!report.payment_methods.contains_key(&PaymentMethod::BankTransfer));
        assert_eq!(report.categories.values().map(|c| c.transactions).sum::<u64>(), report.transactions);
    }

    #[test]
    fn products_ranked_by_revenue() {
        let products = sample_products();
        let (start, end) = default_range();
        let report = generate(&products, start, end, 42).unwrap();
        assert!(report.products.windows(2).all(|w| w[0].revenue >= w[1].revenue));
        let top = report.top_product.unwrap();
        let best_qty = report.products.iter().map(|p| p.quantity_sold).max().unwrap();
        assert!(report.products.iter().any(|p| p.name == top && p.quantity_sold == best_qty));
    }

    #[test]
    fn single_day_range() {
        let products = sample_products();
        let report = generate(&products, date(2024, 2, 29), date(2024, 2, 29), 1).unwrap();
        assert_eq!(report.daily.len(), 1);
        assert_eq!(report.daily[0].date, date(2024, 2, 29));
    }

    #[test]
    fn top_product_ties_break_alphabetically() {
        let perf = |name: &str, qty| ProductPerformance {
            product_id: 0,
            name: name.into(),
            category: "Food".into(),
            quantity_sold: qty,
            revenue: Money::zero(),
        };
        let rows = [perf("Tea", 9), perf("Burger", 9), perf("Soda", 3)];
        assert_eq!(top_by_quantity(&rows).as_deref(), Some("Burger"));
        assert_eq!(top_by_quantity(&[]), None);
    }

    #[test]
    fn range_validation() {
        let products = sample_products();
        assert_eq!(
            generate(&products, date(2024, 2, 1), date(2024, 1, 1), 1),
            Err(ReportError::InvertedRange { start: date(2024, 2, 1), end: date(2024, 1, 1) })
        );
        assert_eq!(generate(&products, date(2023, 1, 1), date(2024, 12, 31), 1), Err(ReportError::RangeTooLong(731)));
        assert_eq!(generate(&[], date(2024, 1, 1), date(2024, 1, 1), 1), Err(ReportError::EmptyCatalog));
    }
}
