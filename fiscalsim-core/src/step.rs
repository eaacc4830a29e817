use crate::catalog::Ruleset;
use crate::config::ConfigError;
use crate::policy::{PolicyId, PolicySelection};
use crate::rng::RandomSource;
use crate::state::{Faction, FactionId, GameState, TurnResult};
use crate::systems::{
    aggregate_approval, aggregate_policies, apply_outcome, enforce_gdp_floor, evaluate_outcome,
    growth_percent, roll_event, settle_budget, update_factions, update_unemployment,
    FactionImpacts,
};
use thiserror::Error;
use tracing::instrument;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TurnError {
    #[error("no factions to govern")]
    NoFactions,
    #[error("policy catalog is empty")]
    NoPolicies,
    #[error("faction {faction} has non-positive weight {weight}")]
    NonPositiveWeight { faction: FactionId, weight: f64 },
    #[error("selected value for policy {policy} is the wrong kind")]
    ValueKindMismatch { policy: PolicyId },
    #[error("the game is already over")]
    GameAlreadyOver,
    #[error("bad config: {0}")]
    BadConfig(ConfigError),
}

/// Resolve one year.
///
/// Pure apart from the single draw taken from `rng`: the inputs are only
/// borrowed, and everything in the result is freshly built. Given the same
/// inputs and draw, the output is bit-identical.
#[instrument(skip_all, name = "resolve_turn", fields(year = state.year))]
pub fn resolve_turn(
    rules: &Ruleset,
    state: &GameState,
    selection: &PolicySelection,
    factions: &[Faction],
    rng: &mut dyn RandomSource,
) -> Result<TurnResult, TurnError> {
    check_inputs(rules, state, factions)?;
    let config = &rules.config;

    let mut next = state.clone();
    next.year += 1;

    // Policies
    let mut impacts = FactionImpacts::new(factions);
    let totals = aggregate_policies(&rules.policies, selection, &mut impacts)?;

    // Budget
    let settlement = settle_budget(config, &totals, state.debt, state.gdp);
    next.budget = settlement.budget;
    next.debt = settlement.debt;

    // Growth
    let growth = growth_percent(config, totals.gdp_growth, next.debt, state.gdp);
    next.gdp = state.gdp * (1.0 + growth / 100.0);
    log::debug!(
        "{}: revenue {:.2}, spending {:.2}, budget {:+.2}, debt {:.2}, growth {:+.2}%",
        next.year,
        totals.revenue,
        totals.spending,
        next.budget,
        next.debt,
        growth
    );

    // Random event
    let mut event_log = Vec::new();
    if let Some(event) = roll_event(&rules.events, rng, &mut next, &mut impacts) {
        event_log.push(event);
    }
    let gdp_floor_hit = enforce_gdp_floor(config, &mut next);

    // Factions react to the unemployment they lived through this year.
    let new_factions = update_factions(config, factions, &impacts, growth, state.unemployment);
    next.unemployment =
        update_unemployment(config, state.unemployment, growth, totals.unemployment);
    next.approval = aggregate_approval(&new_factions);

    next.history.push(next.debt, next.gdp, next.approval);

    let outcome = evaluate_outcome(config, &next, gdp_floor_hit);
    if let Some(outcome) = outcome {
        apply_outcome(&mut next, &mut event_log, outcome);
    }

    log::debug!(
        "{}: gdp {:.2}, unemployment {:.1}%, approval {:.1}%",
        next.year,
        next.gdp,
        next.unemployment,
        next.approval
    );

    Ok(TurnResult {
        new_state: next,
        new_factions,
        event_log,
        outcome,
    })
}

fn check_inputs(
    rules: &Ruleset,
    state: &GameState,
    factions: &[Faction],
) -> Result<(), TurnError> {
    if state.game_over {
        return Err(TurnError::GameAlreadyOver);
    }
    rules.config.validate().map_err(TurnError::BadConfig)?;
    if rules.policies.is_empty() {
        return Err(TurnError::NoPolicies);
    }
    if factions.is_empty() {
        return Err(TurnError::NoFactions);
    }
    let bad_weight = factions
        .iter()
        .find(|f| f.weight <= 0.0 || f.weight.is_nan());
    if let Some(f) = bad_weight {
        return Err(TurnError::NonPositiveWeight {
            faction: f.id.clone(),
            weight: f.weight,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
