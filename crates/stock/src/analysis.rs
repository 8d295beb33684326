//! Stock reporting: summary, alerts, valuation, movement totals.
//!
//! All functions here are pure folds over in-memory snapshots; the reference
//! date is an explicit parameter so reports are reproducible. Inactive
//! products are excluded throughout.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::movement::{MovementType, StockMovement};
use crate::product::{Product, ProductId};

/// Category label for products registered without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// How long before expiry a product counts as "expiring soon".
pub const EXPIRY_HORIZON_DAYS: i64 = 30;

/// Headline stock figures for the dashboard.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    pub total_products: u64,
    /// Σ `current_stock × cost_price` over active products, in cents.
    pub total_value: i64,
    pub low_stock_count: u64,
    pub expired_count: u64,
    pub expiring_soon_count: u64,
    /// Distinct categories, sorted.
    pub categories: Vec<String>,
}

/// Summarize active products relative to `today`.
pub fn stock_summary(products: &[Product], today: NaiveDate) -> StockSummary {
    let horizon = today + Duration::days(EXPIRY_HORIZON_DAYS);
    let mut summary = StockSummary::default();
    let mut categories: Vec<String> = Vec::new();

    for product in products.iter().filter(|p| p.is_active()) {
        summary.total_products += 1;
        summary.total_value += product.stock_value();

        if product.is_low_stock() {
            summary.low_stock_count += 1;
        }

        if let Some(expiry) = product.expiry_date() {
            if expiry < today {
                summary.expired_count += 1;
            } else if expiry <= horizon {
                summary.expiring_soon_count += 1;
            }
        }

        if let Some(category) = product.category() {
            if !categories.iter().any(|c| c == category) {
                categories.push(category.to_string());
            }
        }
    }

    categories.sort();
    summary.categories = categories;

    tracing::debug!(
        total_products = summary.total_products,
        total_value = summary.total_value,
        "stock summary computed"
    );
    summary
}

/// What an alert is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LowStock,
    Expired,
    ExpiringSoon,
}

/// Alert severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// An actionable stock warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAlert {
    pub product_id: ProductId,
    pub product_name: String,
    pub kind: AlertKind,
    pub severity: Severity,
    pub current_stock: i64,
    pub min_stock: Option<i64>,
    pub expiry_date: Option<NaiveDate>,
    pub days_until_expiry: Option<i64>,
}

/// Compute low-stock and expiry alerts over active products, sorted most
/// severe first (ties keep product order).
pub fn stock_alerts(products: &[Product], today: NaiveDate) -> Vec<StockAlert> {
    let mut alerts: Vec<StockAlert> = Vec::new();

    for product in products.iter().filter(|p| p.is_active()) {
        if product.is_low_stock() {
            let severity = if product.current_stock() == 0 {
                Severity::Critical
            } else if product.current_stock() <= product.min_stock() / 2 {
                Severity::High
            } else {
                Severity::Medium
            };
            alerts.push(StockAlert {
                product_id: product.id_typed(),
                product_name: product.name().to_string(),
                kind: AlertKind::LowStock,
                severity,
                current_stock: product.current_stock(),
                min_stock: Some(product.min_stock()),
                expiry_date: None,
                days_until_expiry: None,
            });
        }

        if let Some(expiry) = product.expiry_date() {
            let days_until_expiry = (expiry - today).num_days();

            if days_until_expiry < 0 {
                alerts.push(StockAlert {
                    product_id: product.id_typed(),
                    product_name: product.name().to_string(),
                    kind: AlertKind::Expired,
                    severity: Severity::Critical,
                    current_stock: product.current_stock(),
                    min_stock: None,
                    expiry_date: Some(expiry),
                    days_until_expiry: Some(days_until_expiry),
                });
            } else if days_until_expiry <= EXPIRY_HORIZON_DAYS {
                let severity = if days_until_expiry <= 7 {
                    Severity::High
                } else if days_until_expiry <= 15 {
                    Severity::Medium
                } else {
                    Severity::Low
                };
                alerts.push(StockAlert {
                    product_id: product.id_typed(),
                    product_name: product.name().to_string(),
                    kind: AlertKind::ExpiringSoon,
                    severity,
                    current_stock: product.current_stock(),
                    min_stock: None,
                    expiry_date: Some(expiry),
                    days_until_expiry: Some(days_until_expiry),
                });
            }
        }
    }

    alerts.sort_by_key(|alert| alert.severity);
    alerts
}

/// Per-category slice of the stock valuation.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryValuation {
    pub total_value: i64,
    pub total_quantity: i64,
    pub product_count: u64,
}

/// Stock valued at cost, overall and per category.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockValuation {
    pub total_value: i64,
    pub total_quantity: i64,
    pub average_cost_per_unit: f64,
    /// Keyed by category (BTreeMap keeps report order deterministic).
    pub by_category: BTreeMap<String, CategoryValuation>,
}

/// Value active products' stock at cost price.
pub fn stock_valuation(products: &[Product]) -> StockValuation {
    let mut valuation = StockValuation::default();

    for product in products.iter().filter(|p| p.is_active()) {
        let value = product.stock_value();
        valuation.total_value += value;
        valuation.total_quantity += product.current_stock();

        let category = product.category().unwrap_or(UNCATEGORIZED).to_string();
        let slice = valuation.by_category.entry(category).or_default();
        slice.total_value += value;
        slice.total_quantity += product.current_stock();
        slice.product_count += 1;
    }

    valuation.average_cost_per_unit = if valuation.total_quantity > 0 {
        valuation.total_value as f64 / valuation.total_quantity as f64
    } else {
        0.0
    };
    valuation
}

/// Quantity totals for a movement log.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementSummary {
    pub total_in: i64,
    pub total_out: i64,
    pub total_adjustments: i64,
    pub total_expired: i64,
    pub total_loss: i64,
    /// `in` and `adjustment` add; `out`, `expired` and `loss` subtract.
    pub net_movement: i64,
    pub by_type: BTreeMap<MovementType, i64>,
}

/// Fold quantity totals over a movement log (callers pre-filter the period).
pub fn movement_summary(movements: &[StockMovement]) -> MovementSummary {
    let mut summary = MovementSummary::default();

    for movement in movements {
        let quantity = movement.quantity;
        match movement.movement_type {
            MovementType::In => {
                summary.total_in += quantity;
                summary.net_movement += quantity;
            }
            MovementType::Out => {
                summary.total_out += quantity;
                summary.net_movement -= quantity;
            }
            MovementType::Adjustment => {
                summary.total_adjustments += quantity.abs();
                summary.net_movement += quantity;
            }
            MovementType::Expired => {
                summary.total_expired += quantity;
                summary.net_movement -= quantity;
            }
            MovementType::Loss => {
                summary.total_loss += quantity;
                summary.net_movement -= quantity;
            }
        }

        *summary.by_type.entry(movement.movement_type).or_insert(0) += quantity;
    }

    summary
}

/// Active products with stock on hand expiring within `within_days` of
/// `today` (exclusive of already-expired), soonest first.
pub fn expiring_products(
    products: &[Product],
    today: NaiveDate,
    within_days: i64,
) -> Vec<&Product> {
    let horizon = today + Duration::days(within_days);
    let mut expiring: Vec<&Product> = products
        .iter()
        .filter(|p| p.is_active() && p.current_stock() > 0)
        .filter(|p| {
            p.expiry_date()
                .is_some_and(|expiry| expiry > today && expiry <= horizon)
        })
        .collect();

    expiring.sort_by_key(|p| p.expiry_date());
    expiring
}
