//! A game in progress: the state the player sees between turns.
//!
//! The session owns the mutable pieces (state, factions, policy selection)
//! and borrows everything static from a shared [`Ruleset`]. It enforces the
//! rules the engine itself does not care about: policy values must be legal,
//! a finished game accepts no more turns, and acknowledging the end wipes
//! the save and starts over.

use crate::catalog::Ruleset;
use crate::persist::{
    load_json, store_json, KeyValueStore, PersistError, SavedPolicy, FACTIONS_KEY, POLICIES_KEY,
    STATE_KEY,
};
use crate::policy::{PolicyControl, PolicyId, PolicySelection, PolicyValue};
use crate::rng::RandomSource;
use crate::state::{Faction, GameState, TurnResult};
use crate::step::{resolve_turn, TurnError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("unknown policy: {0}")]
    UnknownPolicy(PolicyId),
    #[error("policy {policy} does not take a {expected} value")]
    KindMismatch {
        policy: PolicyId,
        expected: &'static str,
    },
    #[error("policy {policy}: {value} is outside {min}..={max}")]
    OutOfRange {
        policy: PolicyId,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("policy {policy}: {value} is not a multiple of {step} from {min}")]
    OffStep {
        policy: PolicyId,
        value: f64,
        min: f64,
        step: f64,
    },
    #[error("the game is over; acknowledge it to start again")]
    GameOver,
    #[error(transparent)]
    Turn(#[from] TurnError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone)]
pub struct GameSession {
    rules: Arc<Ruleset>,
    state: GameState,
    factions: Vec<Faction>,
    selection: PolicySelection,
}

impl GameSession {
    /// Fresh game from the ruleset's opening position.
    pub fn new(rules: Arc<Ruleset>) -> Self {
        let state = rules.initial_state.clone();
        let factions = rules.factions.clone();
        Self {
            rules,
            state,
            factions,
            selection: PolicySelection::new(),
        }
    }

    /// Resume from `store`, falling back to the opening position for
    /// anything missing. A saved game that had already ended, or that does
    /// not fit this ruleset, is discarded.
    pub fn restore(rules: Arc<Ruleset>, store: &dyn KeyValueStore) -> Result<Self, SessionError> {
        let mut session = Self::new(rules);

        if let Some(state) = load_json::<GameState>(store, STATE_KEY)? {
            if state.game_over {
                log::info!("Saved game had ended in {}; starting over", state.year);
                return Ok(session);
            }
            if let Err(problem) = check_saved_state(&session.rules, &state) {
                log::warn!("Discarding saved game: {}", problem);
                return Ok(session);
            }
            session.state = state;
        }
        if let Some(factions) = load_json::<Vec<Faction>>(store, FACTIONS_KEY)? {
            if let Err(problem) = check_saved_factions(&session.rules, &factions) {
                log::warn!("Discarding saved game: {}", problem);
                session.state = session.rules.initial_state.clone();
                return Ok(session);
            }
            session.factions = factions;
        }
        if let Some(saved) = load_json::<Vec<SavedPolicy>>(store, POLICIES_KEY)? {
            session.relink_policies(saved);
        }

        log::debug!(
            "Restored session at {} with {} policy overrides",
            session.state.year,
            session.selection.len()
        );
        Ok(session)
    }

    /// Attach saved values to catalog policies, dropping anything that no
    /// longer fits.
    fn relink_policies(&mut self, saved: Vec<SavedPolicy>) {
        for SavedPolicy { id, value } in saved {
            let Some(def) = self.rules.policy(&id) else {
                log::debug!("Dropping saved value for unknown policy {}", id);
                continue;
            };
            let legal = match value {
                PolicyValue::Level(level) => def.allows_level(level),
                PolicyValue::Enabled(_) => def.accepts(value),
            };
            if legal {
                self.selection.set(id, value);
            } else {
                log::warn!("Dropping saved value {} for policy {}: not a legal setting", value, id);
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), SessionError> {
        let saved: Vec<SavedPolicy> = self
            .rules
            .policies
            .iter()
            .map(|def| SavedPolicy {
                id: def.id.clone(),
                value: self.selection.value_of(def),
            })
            .collect();

        store_json(store, STATE_KEY, &self.state)?;
        store_json(store, FACTIONS_KEY, &self.factions)?;
        store_json(store, POLICIES_KEY, &saved)?;
        Ok(())
    }

    /// Set a slider.
    pub fn set_level(&mut self, id: &PolicyId, level: f64) -> Result<(), SessionError> {
        let def = self
            .rules
            .policy(id)
            .ok_or_else(|| SessionError::UnknownPolicy(id.clone()))?;
        match def.control {
            PolicyControl::Slider { min, max, step, .. } => {
                if !(min..=max).contains(&level) {
                    return Err(SessionError::OutOfRange {
                        policy: id.clone(),
                        value: level,
                        min,
                        max,
                    });
                }
                if !def.allows_level(level) {
                    return Err(SessionError::OffStep {
                        policy: id.clone(),
                        value: level,
                        min,
                        step,
                    });
                }
            }
            PolicyControl::Toggle { .. } => {
                return Err(SessionError::KindMismatch {
                    policy: id.clone(),
                    expected: "numeric",
                })
            }
        }
        self.selection.set(id.clone(), PolicyValue::Level(level));
        Ok(())
    }

    /// Flip a toggle.
    pub fn set_enabled(&mut self, id: &PolicyId, enabled: bool) -> Result<(), SessionError> {
        let def = self
            .rules
            .policy(id)
            .ok_or_else(|| SessionError::UnknownPolicy(id.clone()))?;
        if !def.accepts(PolicyValue::Enabled(enabled)) {
            return Err(SessionError::KindMismatch {
                policy: id.clone(),
                expected: "on/off",
            });
        }
        self.selection.set(id.clone(), PolicyValue::Enabled(enabled));
        Ok(())
    }

    /// Resolve one turn and adopt its result.
    pub fn end_turn(&mut self, rng: &mut dyn RandomSource) -> Result<TurnResult, SessionError> {
        if self.state.game_over {
            return Err(SessionError::GameOver);
        }
        let result = resolve_turn(&self.rules, &self.state, &self.selection, &self.factions, rng)?;
        self.state = result.new_state.clone();
        self.factions = result.new_factions.clone();
        Ok(result)
    }

    /// Back to the opening position with default policies.
    pub fn reset(&mut self) {
        self.state = self.rules.initial_state.clone();
        self.factions = self.rules.factions.clone();
        self.selection = PolicySelection::new();
    }

    /// The player has seen the ending: wipe the save and start over.
    pub fn acknowledge_game_over(&mut self, store: &mut dyn KeyValueStore) -> Result<(), SessionError> {
        store.clear()?;
        self.reset();
        Ok(())
    }

    pub fn rules(&self) -> &Ruleset {
        &self.rules
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn factions(&self) -> &[Faction] {
        &self.factions
    }

    pub fn selection(&self) -> &PolicySelection {
        &self.selection
    }

    /// Current value of a policy, default included.
    pub fn policy_value(&self, id: &PolicyId) -> Option<PolicyValue> {
        self.rules.policy(id).map(|def| self.selection.value_of(def))
    }

    pub fn is_over(&self) -> bool {
        self.state.game_over
    }
}

/// Shape checks a saved state must pass before it is resumed.
fn check_saved_state(rules: &Ruleset, state: &GameState) -> Result<(), String> {
    let history = &state.history;
    if history.gdp.len() != history.debt.len() || history.approval.len() != history.debt.len() {
        return Err("history series have different lengths".to_string());
    }
    let turns = state.year - rules.config.epoch_year;
    if history.is_empty() || turns < 0 || history.len() - 1 != turns as usize {
        return Err(format!(
            "{} history entries do not match year {}",
            history.len(),
            state.year
        ));
    }
    if !(0.0..=100.0).contains(&state.approval) {
        return Err(format!("approval {} is outside 0..=100", state.approval));
    }
    Ok(())
}

/// Saved factions must be the ruleset's factions, in order, with sane
/// approvals.
fn check_saved_factions(rules: &Ruleset, factions: &[Faction]) -> Result<(), String> {
    if factions.len() != rules.factions.len() {
        return Err(format!(
            "{} saved factions, expected {}",
            factions.len(),
            rules.factions.len()
        ));
    }
    for (saved, def) in factions.iter().zip(&rules.factions) {
        if saved.id != def.id {
            return Err(format!("unexpected faction {}", saved.id));
        }
        if !(0.0..=100.0).contains(&saved.approval) {
            return Err(format!(
                "faction {} approval {} is outside 0..=100",
                saved.id, saved.approval
            ));
        }
    }
    Ok(())
}
