//! # Fiscal Simulation Core
//!
//! Turn-based economic policy engine: one turn is one fiscal year of a
//! debt-laden island government.
//!
//! The core is a single pure function, [`resolve_turn`], which takes the
//! current state, the player's policy selection and the faction registry,
//! plus one draw from a [`RandomSource`], and returns the next year.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌──────────────┐
//! │ GameSession │────▶│ PolicySelection │────▶│ resolve_turn │
//! │  (player)   │     │ (slider values) │     │  (pure fn)   │
//! └─────────────┘     └─────────────────┘     └──────┬───────┘
//!        ▲                                           │
//!        │            ┌─────────────────┐     ┌──────▼───────┐
//!        └────────────│    Observers    │◀────│  TurnResult  │
//!                     │    (side fx)    │     │ (next state) │
//!                     └─────────────────┘     └──────────────┘
//! ```
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Ruleset`] | Immutable game data: config, opening state, factions, policies, events |
//! | [`GameState`] | Economy snapshot for one year, with history |
//! | [`PolicySelection`] | The player's slider and toggle values |
//! | [`resolve_turn`] | Pure function: `(state, selection, factions, draw) -> TurnResult` |
//! | [`GameSession`] | A game in progress, with save/restore |
//! | [`TurnObserver`] | Trait for watching resolved turns |

pub mod catalog;
pub mod config;
pub mod events;
pub mod observer;
pub mod persist;
pub mod policy;
pub mod rng;
pub mod session;
pub mod state;
pub mod step;
pub mod systems;
pub mod testing;

pub use catalog::{Ruleset, RulesetError, RulesetLoadError};
pub use config::{ConfigError, SimConfig};
pub use events::{EventBand, EventDef, EventEffect, EventTable};
pub use observer::event_log::EventLogObserver;
pub use observer::{ObserverError, ObserverRegistry, TurnObserver, TurnRecord};
pub use persist::{KeyValueStore, MemoryStore, PersistError};
pub use policy::{PolicyDef, PolicyId, PolicySelection, PolicyValue};
pub use rng::{FixedDraw, RandomSource, SeededRng};
pub use session::{GameSession, SessionError};
pub use state::{Event, EventKind, Faction, FactionId, GameState, Outcome, TurnResult};
pub use step::{resolve_turn, TurnError};
