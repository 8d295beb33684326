//! Fixed-cost normalization (rent, software, utilities).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use estetica_core::{AggregateId, Entity};

/// How often a fixed cost is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostFrequency {
    Monthly,
    Quarterly,
    Yearly,
}

impl CostFrequency {
    /// Normalize a billed amount (cents) to its monthly share.
    pub fn monthly_share(self, amount: i64) -> f64 {
        match self {
            CostFrequency::Monthly => amount as f64,
            CostFrequency::Quarterly => amount as f64 / 3.0,
            CostFrequency::Yearly => amount as f64 / 12.0,
        }
    }

    /// Normalize a billed amount (cents) to its yearly total.
    pub fn yearly_total(self, amount: i64) -> f64 {
        match self {
            CostFrequency::Monthly => amount as f64 * 12.0,
            CostFrequency::Quarterly => amount as f64 * 4.0,
            CostFrequency::Yearly => amount as f64,
        }
    }
}

/// A recurring business expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedCost {
    pub id: AggregateId,
    pub name: String,
    pub category: String,
    /// Billed amount per `frequency` period, in cents.
    pub amount: i64,
    pub frequency: CostFrequency,
    pub active: bool,
}

impl Entity for FixedCost {
    type Id = AggregateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Normalized fixed-cost totals. Fractional cents appear because quarterly
/// and yearly amounts divide unevenly into months.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCostStats {
    pub monthly_total: f64,
    pub yearly_total: f64,
    /// Monthly share per category (deterministic order).
    pub monthly_by_category: BTreeMap<String, f64>,
}

/// Fold active fixed costs into monthly/yearly totals and a per-category
/// monthly breakdown.
pub fn fixed_cost_stats(costs: &[FixedCost]) -> FixedCostStats {
    let mut stats = FixedCostStats::default();

    for cost in costs.iter().filter(|c| c.active) {
        let monthly = cost.frequency.monthly_share(cost.amount);
        stats.monthly_total += monthly;
        stats.yearly_total += cost.frequency.yearly_total(cost.amount);
        *stats
            .monthly_by_category
            .entry(cost.category.clone())
            .or_insert(0.0) += monthly;
    }

    tracing::debug!(
        categories = stats.monthly_by_category.len(),
        monthly_total = stats.monthly_total,
        "fixed cost stats computed"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cost(name: &str, category: &str, amount: i64, frequency: CostFrequency) -> FixedCost {
        FixedCost {
            id: AggregateId::new(),
            name: name.to_string(),
            category: category.to_string(),
            amount,
            frequency,
            active: true,
        }
    }

    #[test]
    fn normalizes_frequencies_to_monthly_and_yearly() {
        let costs = vec![
            cost("rent", "infrastructure", 250_000, CostFrequency::Monthly),
            cost("accounting", "services", 90_000, CostFrequency::Quarterly),
            cost("license", "software", 120_000, CostFrequency::Yearly),
        ];

        let stats = fixed_cost_stats(&costs);
        assert!((stats.monthly_total - (250_000.0 + 30_000.0 + 10_000.0)).abs() < 1e-9);
        assert!(
            (stats.yearly_total - (3_000_000.0 + 360_000.0 + 120_000.0)).abs() < 1e-9
        );
    }

    #[test]
    fn yearly_total_is_twelve_months_for_monthly_costs() {
        let costs = vec![
            cost("rent", "infrastructure", 250_000, CostFrequency::Monthly),
            cost("water", "infrastructure", 8_000, CostFrequency::Monthly),
        ];

        let stats = fixed_cost_stats(&costs);
        assert!((stats.yearly_total - stats.monthly_total * 12.0).abs() < 1e-9);
    }

    #[test]
    fn groups_monthly_share_by_category() {
        let costs = vec![
            cost("rent", "infrastructure", 250_000, CostFrequency::Monthly),
            cost("power", "infrastructure", 20_000, CostFrequency::Monthly),
            cost("crm", "software", 36_000, CostFrequency::Yearly),
        ];

        let stats = fixed_cost_stats(&costs);
        assert_eq!(stats.monthly_by_category.len(), 2);
        assert!((stats.monthly_by_category["infrastructure"] - 270_000.0).abs() < 1e-9);
        assert!((stats.monthly_by_category["software"] - 3_000.0).abs() < 1e-9);
    }

    #[test]
    fn inactive_costs_are_ignored() {
        let mut paused = cost("ads", "marketing", 50_000, CostFrequency::Monthly);
        paused.active = false;

        let stats = fixed_cost_stats(&[paused]);
        assert_eq!(stats, FixedCostStats::default());
    }
}
