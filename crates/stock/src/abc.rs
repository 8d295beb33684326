//! ABC inventory classification.
//!
//! Ranks products by the monetary value moved in the analysis period and
//! partitions them into tiers: A carries the top ~80% of cumulative value,
//! B the next ~15%, C the tail. Purchasing attention follows the tiers.

use serde::{Deserialize, Serialize};

use crate::movement::StockMovement;
use crate::product::{Product, ProductId};

/// ABC tier, best (A) to worst (C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

/// One classified product, in descending movement-value order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcEntry {
    pub product_id: ProductId,
    pub name: String,
    /// Movements attributed to this product in the period.
    pub movement_count: usize,
    /// Σ `(movement unit_cost ?? product cost_price) × quantity`, in cents.
    pub movement_value: i64,
    /// `current_stock × cost_price`, in cents.
    pub current_value: i64,
    /// Movement value over current value; rough turnover indicator.
    pub rotation: f64,
    /// Cumulative share of total movement value after this product, 0..=100.
    pub accumulated_percentage: f64,
    pub classification: AbcClass,
}

/// Classify `products` by movement value over the given movement log.
///
/// Deterministic: products are sorted descending by movement value with a
/// stable sort, so ties keep their input order, and identical inputs always
/// produce identical output. Movements whose `product_id` matches no product
/// are ignored.
///
/// When the total movement value is zero every accumulated percentage is 0,
/// which the ascending threshold walk files under tier A.
pub fn classify_abc(products: &[Product], movements: &[StockMovement]) -> Vec<AbcEntry> {
    struct Ranked<'a> {
        product: &'a Product,
        movement_count: usize,
        movement_value: i64,
    }

    let mut ranked: Vec<Ranked<'_>> = products
        .iter()
        .map(|product| {
            let mut movement_count = 0;
            let mut movement_value = 0;
            for movement in movements {
                if movement.product_id == product.id_typed() {
                    movement_count += 1;
                    movement_value += movement.value_or(product.cost_price());
                }
            }
            Ranked {
                product,
                movement_count,
                movement_value,
            }
        })
        .collect();

    // Stable: equal movement values keep their input order.
    ranked.sort_by(|a, b| b.movement_value.cmp(&a.movement_value));

    let total_value: i64 = ranked.iter().map(|r| r.movement_value).sum();
    let mut accumulated_value = 0i64;

    let entries: Vec<AbcEntry> = ranked
        .into_iter()
        .map(|r| {
            accumulated_value += r.movement_value;
            let accumulated_percentage = if total_value > 0 {
                accumulated_value as f64 / total_value as f64 * 100.0
            } else {
                0.0
            };

            let classification = if accumulated_percentage <= 80.0 {
                AbcClass::A
            } else if accumulated_percentage <= 95.0 {
                AbcClass::B
            } else {
                AbcClass::C
            };

            let current_value = r.product.stock_value();
            let rotation = if r.movement_count > 0 {
                r.movement_value as f64 / if current_value == 0 { 1.0 } else { current_value as f64 }
            } else {
                0.0
            };

            AbcEntry {
                product_id: r.product.id_typed(),
                name: r.product.name().to_string(),
                movement_count: r.movement_count,
                movement_value: r.movement_value,
                current_value,
                rotation,
                accumulated_percentage,
                classification,
            }
        })
        .collect();

    tracing::debug!(
        products = entries.len(),
        total_value,
        "abc classification computed"
    );
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use estetica_core::{Aggregate, AggregateId, UserId};

    use crate::movement::{MovementId, MovementType};
    use crate::product::{ProductCommand, RegisterProduct};

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap()
    }

    fn product(name: &str, cost_price: i64) -> Product {
        let product_id = ProductId::new(AggregateId::new());
        let mut product = Product::empty(product_id);
        let events = product
            .handle(&ProductCommand::RegisterProduct(RegisterProduct {
                user_id: UserId::new(),
                product_id,
                name: name.to_string(),
                unit: "un".to_string(),
                category: None,
                cost_price,
                min_stock: 0,
                expiry_date: None,
                occurred_at: test_time(),
            }))
            .unwrap();
        for event in &events {
            product.apply(event);
        }
        product
    }

    fn movement_for(product: &Product, quantity: i64, unit_cost: Option<i64>) -> StockMovement {
        StockMovement {
            id: MovementId::new(AggregateId::new()),
            product_id: product.id_typed(),
            movement_type: MovementType::Out,
            quantity,
            unit_cost,
            occurred_at: test_time(),
        }
    }

    #[test]
    fn partitions_at_80_and_95_percent() {
        // Movement values 800 / 150 / 50 of a 1000 total:
        // cumulative 80%, 95%, 100% -> A, B, C.
        let products = vec![product("high", 0), product("mid", 0), product("low", 0)];
        let movements = vec![
            movement_for(&products[0], 1, Some(800)),
            movement_for(&products[1], 1, Some(150)),
            movement_for(&products[2], 1, Some(50)),
        ];

        let entries = classify_abc(&products, &movements);
        let classes: Vec<AbcClass> = entries.iter().map(|e| e.classification).collect();
        assert_eq!(classes, vec![AbcClass::A, AbcClass::B, AbcClass::C]);
        let percentages: Vec<f64> = entries.iter().map(|e| e.accumulated_percentage).collect();
        assert_eq!(percentages, vec![80.0, 95.0, 100.0]);
    }

    #[test]
    fn sorts_descending_by_movement_value() {
        let products = vec![product("small", 0), product("big", 0)];
        let movements = vec![
            movement_for(&products[0], 1, Some(10)),
            movement_for(&products[1], 1, Some(1000)),
        ];

        let entries = classify_abc(&products, &movements);
        assert_eq!(entries[0].name, "big");
        assert_eq!(entries[1].name, "small");
        assert!(entries[0].movement_value >= entries[1].movement_value);
    }

    #[test]
    fn ties_keep_input_order() {
        let products = vec![product("first", 0), product("second", 0), product("third", 0)];
        let movements: Vec<StockMovement> = products
            .iter()
            .map(|p| movement_for(p, 1, Some(100)))
            .collect();

        let entries = classify_abc(&products, &movements);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn zero_total_value_classifies_everything_as_a() {
        // With no movement value at all, every accumulated percentage is 0 and
        // the ascending threshold walk (<= 80 first) lands on tier A.
        let products = vec![product("idle-1", 500), product("idle-2", 500)];

        let entries = classify_abc(&products, &[]);
        assert_eq!(entries.len(), 2);
        for entry in &entries {
            assert_eq!(entry.accumulated_percentage, 0.0);
            assert_eq!(entry.classification, AbcClass::A);
            assert_eq!(entry.movement_value, 0);
            assert_eq!(entry.rotation, 0.0);
        }
    }

    #[test]
    fn falls_back_to_product_cost_price() {
        let products = vec![product("fallback", 250)];
        let movements = vec![movement_for(&products[0], 4, None)];

        let entries = classify_abc(&products, &movements);
        assert_eq!(entries[0].movement_value, 1000);
    }

    #[test]
    fn movements_for_unknown_products_are_ignored() {
        let products = vec![product("known", 100)];
        let stray = product("stray", 100);
        let movements = vec![movement_for(&stray, 10, Some(100))];

        let entries = classify_abc(&products, &movements);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].movement_value, 0);
    }

    #[test]
    fn classifier_is_idempotent() {
        let products = vec![product("a", 10), product("b", 20), product("c", 30)];
        let movements = vec![
            movement_for(&products[0], 3, None),
            movement_for(&products[1], 7, Some(15)),
            movement_for(&products[2], 1, None),
        ];

        let first = classify_abc(&products, &movements);
        let second = classify_abc(&products, &movements);
        assert_eq!(first, second);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: every input product lands in exactly one tier.
            #[test]
            fn tier_counts_sum_to_product_count(
                values in proptest::collection::vec((1i64..=10_000, 1i64..=20), 0..25)
            ) {
                let products: Vec<Product> =
                    (0..values.len()).map(|i| product(&format!("p{i}"), 100)).collect();
                let movements: Vec<StockMovement> = products
                    .iter()
                    .zip(&values)
                    .map(|(p, (unit_cost, quantity))| movement_for(p, *quantity, Some(*unit_cost)))
                    .collect();

                let entries = classify_abc(&products, &movements);
                prop_assert_eq!(entries.len(), products.len());

                let a = entries.iter().filter(|e| e.classification == AbcClass::A).count();
                let b = entries.iter().filter(|e| e.classification == AbcClass::B).count();
                let c = entries.iter().filter(|e| e.classification == AbcClass::C).count();
                prop_assert_eq!(a + b + c, products.len());
            }

            /// Property: walking the ranked output, accumulated percentage never
            /// decreases and the tier never improves.
            #[test]
            fn classification_is_monotonic_with_rank(
                values in proptest::collection::vec(0i64..=10_000, 1..25)
            ) {
                let products: Vec<Product> =
                    (0..values.len()).map(|i| product(&format!("p{i}"), 100)).collect();
                let movements: Vec<StockMovement> = products
                    .iter()
                    .zip(&values)
                    .map(|(p, unit_cost)| movement_for(p, 1, Some(*unit_cost)))
                    .collect();

                let entries = classify_abc(&products, &movements);
                for pair in entries.windows(2) {
                    prop_assert!(pair[0].accumulated_percentage <= pair[1].accumulated_percentage);
                    prop_assert!(pair[0].classification <= pair[1].classification);
                    prop_assert!(pair[0].movement_value >= pair[1].movement_value);
                }
            }
        }
    }
}
