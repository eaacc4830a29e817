//! Random event resolution.

use crate::config::SimConfig;
use crate::events::{EventDef, EventTable};
use crate::rng::RandomSource;
use crate::state::{Event, GameState};
use crate::systems::factions::FactionImpacts;

/// Draw once and apply the selected event, if any.
///
/// Exactly one draw is taken from `rng` whether or not an event fires.
pub fn roll_event(
    table: &EventTable,
    rng: &mut dyn RandomSource,
    state: &mut GameState,
    impacts: &mut FactionImpacts,
) -> Option<Event> {
    let draw = rng.next_unit();
    let def = table.roll(draw)?;
    log::debug!("Event '{}' fired (draw {:.4})", def.title, draw);
    apply_event(def, state, impacts);
    Some(def.to_event())
}

pub fn apply_event(def: &EventDef, state: &mut GameState, impacts: &mut FactionImpacts) {
    let effect = &def.effect;
    state.gdp *= effect.gdp_multiplier;
    state.debt += effect.debt_delta;
    state.budget += effect.budget_delta;
    impacts.add_all(&effect.approval);
}

/// Hold GDP at the configured floor. Returns `true` if the floor was hit.
pub fn enforce_gdp_floor(config: &SimConfig, state: &mut GameState) -> bool {
    if state.gdp <= config.gdp_floor {
        log::warn!(
            "GDP fell to {} in {}; holding at floor {}",
            state.gdp,
            state.year,
            config.gdp_floor
        );
        state.gdp = config.gdp_floor;
        true
    } else {
        false
    }
}
