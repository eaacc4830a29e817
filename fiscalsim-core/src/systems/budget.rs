//! Policy aggregation, budget settlement and GDP growth.

use crate::config::SimConfig;
use crate::policy::{PolicyDef, PolicySelection};
use crate::step::TurnError;
use crate::systems::factions::FactionImpacts;

/// Sum of every policy's contribution for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolicyTotals {
    pub revenue: f64,
    /// Negative costs (savings) reduce this.
    pub spending: f64,
    /// Growth points from policy.
    pub gdp_growth: f64,
    /// Unemployment points from policy.
    pub unemployment: f64,
}

/// Evaluate every policy at its selected value, in catalog order.
///
/// Approval deltas go into `impacts`; selections for ids missing from the
/// catalog are never looked at.
pub fn aggregate_policies(
    policies: &[PolicyDef],
    selection: &PolicySelection,
    impacts: &mut FactionImpacts,
) -> Result<PolicyTotals, TurnError> {
    let mut totals = PolicyTotals::default();

    for def in policies {
        let value = selection.value_of(def);
        let effect = def
            .effect(value)
            .ok_or_else(|| TurnError::ValueKindMismatch {
                policy: def.id.clone(),
            })?;

        totals.revenue += effect.revenue;
        totals.spending += effect.cost;
        totals.gdp_growth += effect.gdp_growth;
        totals.unemployment += effect.unemployment;
        impacts.add_all(&effect.approval);
    }

    Ok(totals)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    /// Revenue minus spending, including base revenue and interest.
    pub budget: f64,
    pub debt: f64,
}

/// Add base revenue and debt service, then roll the balance into debt.
pub fn settle_budget(config: &SimConfig, totals: &PolicyTotals, debt: f64, gdp: f64) -> Settlement {
    let revenue = totals.revenue + gdp * config.base_revenue_rate;
    let spending = totals.spending + debt * config.interest_rate;
    let budget = revenue - spending;
    Settlement {
        budget,
        debt: debt - budget,
    }
}

/// Growth points lost to a heavy debt load.
pub fn debt_drag(config: &SimConfig, debt_ratio: f64) -> f64 {
    if debt_ratio > config.debt_drag_threshold {
        (debt_ratio - config.debt_drag_threshold) * config.debt_drag_slope
    } else {
        0.0
    }
}

/// Final growth percent for the year.
///
/// The drag ratio uses the debt after settlement against GDP before growth.
pub fn growth_percent(config: &SimConfig, policy_growth: f64, new_debt: f64, old_gdp: f64) -> f64 {
    let growth = config.base_growth + policy_growth;
    let drag = debt_drag(config, new_debt / old_gdp);
    (growth - drag).max(config.growth_floor)
}
