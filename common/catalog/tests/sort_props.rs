use common_catalog::{classify, sort_products, Product, SortKey, SortOrder, Sorter, StockStatus, DEFAULT_SORTER};
use common_money::Money;
use proptest::prelude::*;

fn product(id: i64, stock: i32, min: i32) -> Product {
    Product::new(id, &format!("p{id}"), "Food", Money::from_cents(100), stock, min)
}

proptest! {
    #[test]
    fn output_is_a_permutation(items in prop::collection::vec(-50i32..50, 0..200)) {
        let mut sorted = DEFAULT_SORTER.sort_by_key(items.clone(), |x| *x);
        let mut expected = items;
        expected.sort_unstable();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, expected);
    }

    #[test]
    fn adjacent_keys_are_non_decreasing(items in prop::collection::vec((0u8..8, any::<u16>()), 0..200)) {
        // Sort by the first field only; the second tags identity.
        let sorted = DEFAULT_SORTER.sort_by_key(items, |(k, _)| *k);
        prop_assert!(sorted.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn sorting_twice_changes_nothing(items in prop::collection::vec((0u8..5, any::<u32>()), 0..150)) {
        let once = DEFAULT_SORTER.sort_by_key(items, |(k, _)| *k);
        let twice = DEFAULT_SORTER.sort_by_key(once.clone(), |(k, _)| *k);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn repeated_calls_agree(items in prop::collection::vec((0u8..5, any::<u32>()), 0..150)) {
        let a = DEFAULT_SORTER.sort_by_key(items.clone(), |(k, _)| *k);
        let b = DEFAULT_SORTER.sort_by_key(items, |(k, _)| *k);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn descending_is_exact_reverse(stocks in prop::collection::vec(0i32..20, 0..60)) {
        let products: Vec<Product> = stocks.iter().enumerate().map(|(i, s)| product(i as i64, *s, 10)).collect();
        let asc: Vec<i64> = sort_products(&products, SortKey::StockQuantity, SortOrder::Ascending).iter().map(|p| p.id).collect();
        let mut desc: Vec<i64> = sort_products(&products, SortKey::StockQuantity, SortOrder::Descending).iter().map(|p| p.id).collect();
        desc.reverse();
        prop_assert_eq!(asc, desc);
    }

    #[test]
    fn classifier_partitions_the_number_line(stock in -1_000i64..100_000, min in 1i64..10_000) {
        let status = classify(stock, min).unwrap();
        let expected = if stock * 10 < min * 3 {
            StockStatus::Critical
        } else if stock < min {
            StockStatus::Low
        } else {
            StockStatus::Adequate
        };
        prop_assert_eq!(status, expected);
    }
}

#[test]
fn classify_then_sort_by_stock() {
    let products = vec![product(1, 8, 15), product(2, 150, 20), product(3, 15, 25)];
    let statuses: Vec<StockStatus> = products.iter().map(|p| p.stock_status().unwrap()).collect();
    // 0.3 * 15 = 4.5 and 0.3 * 25 = 7.5, so both short items sit in the low band.
    assert_eq!(statuses, [StockStatus::Low, StockStatus::Adequate, StockStatus::Low]);
    let ids: Vec<i64> = sort_products(&products, SortKey::StockQuantity, SortOrder::Ascending)
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, [1, 3, 2]);
}
