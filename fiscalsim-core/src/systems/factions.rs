//! Faction approval: per-turn impact accumulation, approval update and the
//! weighted aggregate.

use crate::config::SimConfig;
use crate::state::{Faction, FactionId};
use std::collections::BTreeMap;

/// Approval change owed to each known faction this turn.
///
/// Only ids present when the ledger was created accept deltas; anything
/// else is dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FactionImpacts {
    impacts: BTreeMap<FactionId, f64>,
}

impl FactionImpacts {
    /// Zero impact for every faction in `factions`.
    pub fn new(factions: &[Faction]) -> Self {
        Self {
            impacts: factions.iter().map(|f| (f.id.clone(), 0.0)).collect(),
        }
    }

    /// Add `delta` to a known faction. Returns `false` if the id is unknown.
    pub fn add(&mut self, id: &FactionId, delta: f64) -> bool {
        match self.impacts.get_mut(id) {
            Some(total) => {
                *total += delta;
                true
            }
            None => {
                log::trace!("Ignoring approval delta {} for unknown faction {}", delta, id);
                false
            }
        }
    }

    pub fn add_all<'a>(&mut self, deltas: impl IntoIterator<Item = (&'a FactionId, &'a f64)>) {
        for (id, delta) in deltas {
            self.add(id, *delta);
        }
    }

    pub fn get(&self, id: &FactionId) -> f64 {
        self.impacts.get(id).copied().unwrap_or(0.0)
    }
}

/// Economy-wide mood applied to every faction.
pub fn general_sentiment(config: &SimConfig, growth: f64, unemployment: f64) -> f64 {
    let mut change = 0.0;
    if growth > config.strong_growth {
        change += config.strong_growth_bonus;
    }
    if growth < 0.0 {
        change -= config.recession_penalty;
    }
    if unemployment > config.high_unemployment {
        change -= config.high_unemployment_penalty;
    }
    change
}

/// New faction list with updated, clamped approvals. `factions` is left
/// untouched; identity, order and weight carry over.
///
/// `unemployment` is the rate going into the turn.
pub fn update_factions(
    config: &SimConfig,
    factions: &[Faction],
    impacts: &FactionImpacts,
    growth: f64,
    unemployment: f64,
) -> Vec<Faction> {
    let sentiment = general_sentiment(config, growth, unemployment);
    factions
        .iter()
        .map(|f| {
            let change = impacts.get(&f.id) + sentiment;
            Faction {
                approval: (f.approval + change).clamp(0.0, 100.0),
                ..f.clone()
            }
        })
        .collect()
}

/// `sum(approval * weight) / sum(weight)`.
pub fn aggregate_approval(factions: &[Faction]) -> f64 {
    let (weighted, total_weight) = factions.iter().fold((0.0, 0.0), |(w, t), f| {
        (w + f.approval * f.weight, t + f.weight)
    });
    weighted / total_weight
}
