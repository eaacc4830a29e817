//! Observers for resolved turns.
//!
//! Observers see a [`TurnRecord`] after each turn and cannot feed anything
//! back into the simulation.
//!
//! ```text
//! TurnObserver trait
//!        │
//!        └── EventLogObserver (JSONL to any writer)
//! ```
//!
//! # Example
//!
//! ```ignore
//! let mut registry = ObserverRegistry::new();
//! registry.register(Box::new(EventLogObserver::stdout()));
//!
//! let result = session.end_turn(&mut rng)?;
//! registry.notify(&TurnRecord::from_result(&result));
//! ```

pub mod event_log;

use crate::state::{Event, Outcome, TurnResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What an observer is told about one resolved turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub year: i32,
    pub debt: f64,
    pub gdp: f64,
    pub approval: f64,
    pub budget: f64,
    pub unemployment: f64,
    pub debt_ratio: f64,
    pub events: Vec<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl TurnRecord {
    pub fn from_result(result: &TurnResult) -> Self {
        let state = &result.new_state;
        Self {
            year: state.year,
            debt: state.debt,
            gdp: state.gdp,
            approval: state.approval,
            budget: state.budget,
            unemployment: state.unemployment,
            debt_ratio: state.debt_ratio(),
            events: result.event_log.clone(),
            outcome: result.outcome,
        }
    }
}

#[derive(Error, Debug)]
pub enum ObserverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Render error: {0}")]
    Render(String),
}

/// Something that wants to hear about every resolved turn.
///
/// Errors returned from `on_turn` are logged by the registry and do not
/// stop the game.
pub trait TurnObserver: Send {
    fn on_turn(&mut self, record: &TurnRecord) -> Result<(), ObserverError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Called when the game loop ends. No-op by default.
    fn on_shutdown(&mut self) {}
}

#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Box<dyn TurnObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Box<dyn TurnObserver>) {
        log::info!("Registered observer: {}", observer.name());
        self.observers.push(observer);
    }

    pub fn notify(&mut self, record: &TurnRecord) {
        for observer in &mut self.observers {
            if let Err(e) = observer.on_turn(record) {
                log::warn!("Observer '{}' error: {}", observer.name(), e);
            }
        }
    }

    pub fn shutdown(&mut self) {
        for observer in &mut self.observers {
            observer.on_shutdown();
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl Drop for ObserverRegistry {
    fn drop(&mut self) {
        // Flush anything buffered.
        self.shutdown();
    }
}
