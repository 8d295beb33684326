//! Financial reporting domain module.
//!
//! Procedure profitability and fixed-cost normalization, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage).

pub mod fixed_costs;
pub mod profitability;

pub use fixed_costs::{fixed_cost_stats, CostFrequency, FixedCost, FixedCostStats};
pub use profitability::{rank_procedures, ProcedurePerformance, ProcedureProfitability};
