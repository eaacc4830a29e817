//! Builders for tests and tools that need hand-made games.

use crate::catalog::Ruleset;
use crate::config::SimConfig;
use crate::events::EventTable;
use crate::policy::{Linear, PolicyCategory, PolicyControl, PolicyDef, SliderEffects};
use crate::state::{Faction, GameState, History};

pub struct GameStateBuilder {
    state: GameState,
}

impl GameStateBuilder {
    /// Opening state of the standard game.
    pub fn new() -> Self {
        Self {
            state: Ruleset::standard().initial_state,
        }
    }

    pub fn year(mut self, year: i32) -> Self {
        self.state.year = year;
        self
    }

    pub fn max_turns(mut self, max_turns: u32) -> Self {
        self.state.max_turns = max_turns;
        self
    }

    pub fn debt(mut self, debt: f64) -> Self {
        self.state.debt = debt;
        self
    }

    pub fn gdp(mut self, gdp: f64) -> Self {
        self.state.gdp = gdp;
        self
    }

    pub fn unemployment(mut self, unemployment: f64) -> Self {
        self.state.unemployment = unemployment;
        self
    }

    pub fn approval(mut self, approval: f64) -> Self {
        self.state.approval = approval;
        self
    }

    /// Finish, reseeding history from the configured starting values.
    pub fn build(mut self) -> GameState {
        self.state.history =
            History::starting_at(self.state.debt, self.state.gdp, self.state.approval);
        self.state
    }
}

impl Default for GameStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn faction(id: &str, weight: f64, approval: f64) -> Faction {
    Faction {
        id: id.into(),
        name: id.to_string(),
        description: String::new(),
        weight,
        approval,
    }
}

/// A quiet ruleset: two factions at 50, no events, and one spending slider
/// (`spending`, 0..20, default 8) with no side effects beyond its cost.
///
/// With the default state (debt 100, gdp 100) the deficit roughly keeps
/// pace with growth, so games run to the term limit.
pub fn flat_ruleset() -> Ruleset {
    let config = SimConfig::default();
    let mut initial_state = Ruleset::standard().initial_state;
    initial_state.debt = 100.0;
    initial_state.gdp = 100.0;
    initial_state.approval = 50.0;
    initial_state.history = History::starting_at(100.0, 100.0, 50.0);

    Ruleset {
        config,
        initial_state,
        factions: vec![faction("left", 1.0, 50.0), faction("right", 1.0, 50.0)],
        policies: vec![PolicyDef {
            id: "spending".into(),
            name: "Spending".into(),
            category: PolicyCategory::Spending,
            description: String::new(),
            tooltip: None,
            control: PolicyControl::Slider {
                min: 0.0,
                max: 20.0,
                default: 8.0,
                step: 0.5,
                unit: "$B".into(),
                effects: SliderEffects {
                    cost: Some(Linear::per_unit(1.0)),
                    ..Default::default()
                },
            },
        }],
        events: EventTable::default(),
    }
}
