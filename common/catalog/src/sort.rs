//! Ordering of product lists.
//!
//! Every "sort by X" control goes through [`Sorter`]. The default implementation,
//! [`MiddlePivotQuicksort`], is a three-way partition quicksort whose pivot is the
//! key of the element at `len / 2` of the current sub-sequence. Output for a given
//! input is fully determined, including the placement of equal keys, which is what
//! makes the reverse-for-descending behaviour of [`SortOrder`] reproducible.

use common_money::Money;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::{CatalogError, Product};

/// An ascending, comparison-based ordering over owned items.
///
/// Implementations must return a permutation of `items` such that
/// `key(out[i]) <= key(out[i + 1])`. Stability is not required.
pub trait Sorter {
    fn sort_by_key<T, K, F>(&self, items: Vec<T>, key: F) -> Vec<T>
    where
        K: Ord,
        F: Fn(&T) -> K;
}

/// Three-way partition quicksort with a fixed middle-index pivot.
///
/// The pivot is positional, not randomized, so crafted inputs can force O(n²)
/// comparisons and O(n) partition depth. Recursion is unrolled onto a
/// heap-allocated work stack so deep partitioning cannot overflow the thread stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiddlePivotQuicksort;

pub const DEFAULT_SORTER: MiddlePivotQuicksort = MiddlePivotQuicksort;

enum Pending<T> {
    Sort(Vec<T>),
    Emit(Vec<T>),
}

impl Sorter for MiddlePivotQuicksort {
    fn sort_by_key<T, K, F>(&self, items: Vec<T>, key: F) -> Vec<T>
    where
        K: Ord,
        F: Fn(&T) -> K,
    {
        let mut out = Vec::with_capacity(items.len());
        // Popped in LIFO order, so each partition pushes `greater`, `equal`, `less`
        // to produce less ++ equal ++ greater.
        let mut stack = vec![Pending::Sort(items)];
        while let Some(task) = stack.pop() {
            let seq = match task {
                Pending::Emit(run) => {
                    out.extend(run);
                    continue;
                }
                Pending::Sort(seq) if seq.len() <= 1 => {
                    out.extend(seq);
                    continue;
                }
                Pending::Sort(seq) => seq,
            };
            let pivot = key(&seq[seq.len() / 2]);
            let mut less = Vec::new();
            let mut equal = Vec::new();
            let mut greater = Vec::new();
            for item in seq {
                match key(&item).cmp(&pivot) {
                    Ordering::Less => less.push(item),
                    Ordering::Equal => equal.push(item),
                    Ordering::Greater => greater.push(item),
                }
            }
            stack.push(Pending::Sort(greater));
            stack.push(Pending::Emit(equal));
            stack.push(Pending::Sort(less));
        }
        out
    }
}

/// Backed by the standard library's stable merge sort.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdSorter;

impl Sorter for StdSorter {
    fn sort_by_key<T, K, F>(&self, mut items: Vec<T>, key: F) -> Vec<T>
    where
        K: Ord,
        F: Fn(&T) -> K,
    {
        items.sort_by(|a, b| key(a).cmp(&key(b)));
        items
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Category,
    Price,
    #[serde(alias = "stock_level")]
    StockQuantity,
}

/// A field value pulled out of a [`Product`] for comparison.
///
/// All values produced by one [`SortKey`] share a variant. Comparing across
/// variants is a caller error; the derived order between variants has no meaning.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue<'a> {
    Text(&'a str),
    Amount(&'a Money),
    Count(i64),
}

impl SortKey {
    pub fn value<'a>(&self, product: &'a Product) -> SortValue<'a> {
        match self {
            SortKey::Name => SortValue::Text(&product.name),
            SortKey::Category => SortValue::Text(&product.category),
            SortKey::Price => SortValue::Amount(&product.price),
            SortKey::StockQuantity => SortValue::Count(product.stock_quantity.into()),
        }
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "category" => Ok(SortKey::Category),
            "price" => Ok(SortKey::Price),
            "stock_quantity" | "stock_level" | "stock" => Ok(SortKey::StockQuantity),
            other => Err(CatalogError::UnknownSortKey(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortOrder {
    /// Turns an ascending sequence into this order. Descending is the exact
    /// reverse of ascending, never a separately computed descending sort.
    pub fn apply<T>(&self, mut ascending: Vec<T>) -> Vec<T> {
        if *self == SortOrder::Descending {
            ascending.reverse();
        }
        ascending
    }
}

/// Sort a borrowed view of `products` by `key` with the default sorter.
pub fn sort_products<'a>(products: &'a [Product], key: SortKey, order: SortOrder) -> Vec<&'a Product> {
    sort_view(products.iter().collect(), key, order)
}

/// Same as [`sort_products`] for a view that has already been filtered.
pub fn sort_view<'a>(view: Vec<&'a Product>, key: SortKey, order: SortOrder) -> Vec<&'a Product> {
    let ascending = DEFAULT_SORTER.sort_by_key(view, |p: &&'a Product| key.value(*p));
    tracing::debug!(count = ascending.len(), ?key, ?order, "products sorted");
    order.apply(ascending)
}
