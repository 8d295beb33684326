//! Procedure profitability ranking.

use serde::{Deserialize, Serialize};

use estetica_core::ProcedureId;

/// What a procedure earned over the analysis period: catalog price and
/// material cost per session (cents) plus how many sessions were performed.
/// Supplied by the caller from completed-attendance records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedurePerformance {
    pub procedure_id: ProcedureId,
    pub name: String,
    pub category: Option<String>,
    pub price: i64,
    pub cost: i64,
    pub volume: i64,
}

/// One ranked row of the profitability report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureProfitability {
    pub procedure_id: ProcedureId,
    pub name: String,
    pub category: Option<String>,
    pub price: i64,
    pub cost: i64,
    /// `price - cost` per session, in cents.
    pub profit: i64,
    /// Profit as a share of price, 0..=100 (0 when price is 0).
    pub profit_margin: f64,
    pub volume: i64,
    pub total_revenue: i64,
    pub total_profit: i64,
    /// 1-based position after sorting by total profit, descending.
    pub rank: usize,
}

/// Rank procedures by total profit over the period.
///
/// Stable: procedures with equal total profit keep their input order, so the
/// report is deterministic for identical inputs.
pub fn rank_procedures(performances: &[ProcedurePerformance]) -> Vec<ProcedureProfitability> {
    let mut rows: Vec<ProcedureProfitability> = performances
        .iter()
        .map(|p| {
            let profit = p.price - p.cost;
            let profit_margin = if p.price > 0 {
                profit as f64 / p.price as f64 * 100.0
            } else {
                0.0
            };
            ProcedureProfitability {
                procedure_id: p.procedure_id,
                name: p.name.clone(),
                category: p.category.clone(),
                price: p.price,
                cost: p.cost,
                profit,
                profit_margin,
                volume: p.volume,
                total_revenue: p.price * p.volume,
                total_profit: profit * p.volume,
                rank: 0,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.total_profit.cmp(&a.total_profit));
    for (index, row) in rows.iter_mut().enumerate() {
        row.rank = index + 1;
    }

    tracing::debug!(procedures = rows.len(), "profitability ranking computed");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn performance(name: &str, price: i64, cost: i64, volume: i64) -> ProcedurePerformance {
        ProcedurePerformance {
            procedure_id: ProcedureId::new(),
            name: name.to_string(),
            category: None,
            price,
            cost,
            volume,
        }
    }

    #[test]
    fn ranks_by_total_profit_descending() {
        // Per-session profit 95 x 45 sessions vs 120 x 32 sessions.
        let rows = rank_procedures(&[
            performance("facial cleansing", 12_000, 2_500, 45),
            performance("relaxing massage", 15_000, 3_000, 32),
        ]);

        assert_eq!(rows[0].name, "facial cleansing");
        assert_eq!(rows[0].total_profit, 9_500 * 45);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].rank, 2);
        assert!(rows[0].total_profit >= rows[1].total_profit);
    }

    #[test]
    fn computes_margin_and_revenue() {
        let rows = rank_procedures(&[performance("chemical peel", 20_000, 8_000, 20)]);
        assert_eq!(rows[0].profit, 12_000);
        assert!((rows[0].profit_margin - 60.0).abs() < 1e-9);
        assert_eq!(rows[0].total_revenue, 400_000);
    }

    #[test]
    fn zero_price_has_zero_margin() {
        let rows = rank_procedures(&[performance("courtesy session", 0, 500, 3)]);
        assert_eq!(rows[0].profit_margin, 0.0);
        assert_eq!(rows[0].profit, -500);
    }

    #[test]
    fn ties_keep_input_order_and_ranks_stay_contiguous() {
        let rows = rank_procedures(&[
            performance("first", 100, 50, 10),
            performance("second", 200, 150, 10),
            performance("third", 300, 250, 10),
        ]);
        // All total profits equal 500.
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        let ranks: Vec<usize> = rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn empty_input_yields_empty_report() {
        assert!(rank_procedures(&[]).is_empty());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: ranks are 1-based, contiguous, and total profit never
            /// increases as rank worsens.
            #[test]
            fn ranking_is_contiguous_and_descending(
                inputs in proptest::collection::vec((0i64..=50_000, 0i64..=50_000, 0i64..=200), 0..30)
            ) {
                let performances: Vec<ProcedurePerformance> = inputs
                    .iter()
                    .enumerate()
                    .map(|(i, (price, cost, volume))| {
                        performance(&format!("proc{i}"), *price, *cost, *volume)
                    })
                    .collect();

                let rows = rank_procedures(&performances);
                prop_assert_eq!(rows.len(), performances.len());
                for (index, row) in rows.iter().enumerate() {
                    prop_assert_eq!(row.rank, index + 1);
                }
                for pair in rows.windows(2) {
                    prop_assert!(pair[0].total_profit >= pair[1].total_profit);
                }
            }
        }
    }
}
