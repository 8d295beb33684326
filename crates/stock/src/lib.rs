//! Stock domain module.
//!
//! Products, their append-only movement log, the ABC classifier and the
//! stock reports, implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod abc;
pub mod analysis;
pub mod movement;
pub mod product;

pub use abc::{classify_abc, AbcClass, AbcEntry};
pub use analysis::{
    expiring_products, movement_summary, stock_alerts, stock_summary, stock_valuation,
    AlertKind, CategoryValuation, MovementSummary, Severity, StockAlert, StockSummary,
    StockValuation, EXPIRY_HORIZON_DAYS, UNCATEGORIZED,
};
pub use movement::{MovementId, MovementType, StockMovement};
pub use product::{
    DeactivateProduct, Product, ProductCommand, ProductDeactivated, ProductEvent, ProductId,
    ProductRegistered, RecordMovement, RegisterProduct, StockMovementRecorded,
};
