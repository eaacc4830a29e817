//! Win/lose evaluation.
//!
//! Conditions are checked in a fixed order and the first match ends the
//! game: GDP collapse, victory, impeachment, bankruptcy, term limit.
//! Bankruptcy is only reachable while approval is at or above the
//! impeachment threshold.

use crate::config::SimConfig;
use crate::state::{Event, GameState, Outcome};

pub fn evaluate_outcome(
    config: &SimConfig,
    state: &GameState,
    gdp_floor_hit: bool,
) -> Option<Outcome> {
    let ratio = state.debt_ratio();

    if gdp_floor_hit {
        Some(Outcome::Bankruptcy)
    } else if ratio <= config.victory_debt_ratio {
        Some(Outcome::Victory)
    } else if state.approval < config.min_approval {
        Some(Outcome::Impeached)
    } else if ratio > config.bankruptcy_debt_ratio {
        Some(Outcome::Bankruptcy)
    } else if i64::from(state.year) >= i64::from(config.epoch_year) + i64::from(state.max_turns) {
        Some(Outcome::TermLimit)
    } else {
        None
    }
}

/// The lose event narrating `outcome`. Victory has none.
pub fn lose_event(outcome: Outcome) -> Option<Event> {
    match outcome {
        Outcome::Victory => None,
        Outcome::Impeached => Some(Event::lose("Impeached!", "Approval rating too low.")),
        Outcome::Bankruptcy => Some(Event::lose(
            "Total Economic Collapse",
            "Debt is unmanageable.",
        )),
        Outcome::TermLimit => Some(Event::lose(
            "Term Limit Reached",
            "Did not solve the crisis in time.",
        )),
    }
}

/// Mark the state terminal and log the matching event.
pub fn apply_outcome(state: &mut GameState, event_log: &mut Vec<Event>, outcome: Outcome) {
    state.game_over = true;
    state.victory = outcome.is_victory();
    if let Some(event) = lose_event(outcome) {
        event_log.push(event);
    }
    log::info!("Game over in {}: {}", state.year, outcome);
}
