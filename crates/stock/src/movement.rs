use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use estetica_core::{AggregateId, ValueObject};

use crate::product::ProductId;

/// Stock movement identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovementId(pub AggregateId);

impl MovementId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for MovementId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// How a movement affects on-hand stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Goods received; adds to stock.
    In,
    /// Goods consumed or sold; subtracts from stock.
    Out,
    /// Manual correction; the quantity is the absolute new stock level.
    Adjustment,
    /// Written off past expiry; subtracts from stock.
    Expired,
    /// Breakage, theft, spillage; subtracts from stock.
    Loss,
}

/// One entry in a product's append-only movement log.
///
/// Immutable once recorded. Corrections are expressed as new movements
/// (typically an `Adjustment`), never as edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: MovementId,
    pub product_id: ProductId,
    pub movement_type: MovementType,
    pub quantity: i64,
    /// Cost per unit in cents for this movement, when known. Valuation falls
    /// back to the product's cost price when absent.
    pub unit_cost: Option<i64>,
    pub occurred_at: DateTime<Utc>,
}

impl StockMovement {
    /// Monetary value of the movement in cents:
    /// `(unit_cost ?? cost_price) × quantity`.
    pub fn value_or(&self, cost_price: i64) -> i64 {
        self.unit_cost.unwrap_or(cost_price) * self.quantity
    }
}

impl ValueObject for StockMovement {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn movement(unit_cost: Option<i64>, quantity: i64) -> StockMovement {
        StockMovement {
            id: MovementId::new(AggregateId::new()),
            product_id: ProductId::new(AggregateId::new()),
            movement_type: MovementType::Out,
            quantity,
            unit_cost,
            occurred_at: Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn value_uses_own_unit_cost_when_present() {
        assert_eq!(movement(Some(250), 4).value_or(999), 1000);
    }

    #[test]
    fn value_falls_back_to_product_cost_price() {
        assert_eq!(movement(None, 4).value_or(250), 1000);
    }
}
