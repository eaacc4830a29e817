//! Random event table.
//!
//! Events occupy fixed, ordered bands of `[0, 1)`. Each band is described by
//! its exclusive upper bound; a draw fires the first band whose bound it is
//! below. Draws past the last bound fire nothing.

use crate::state::{Event, EventKind, FactionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direct state mutations of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventEffect {
    /// Applied to GDP after growth.
    pub gdp_multiplier: f64,
    /// Added to debt.
    pub debt_delta: f64,
    /// Added to the reported budget only; debt is not recomputed.
    pub budget_delta: f64,
    pub approval: BTreeMap<FactionId, f64>,
}

impl Default for EventEffect {
    fn default() -> Self {
        Self {
            gdp_multiplier: 1.0,
            debt_delta: 0.0,
            budget_delta: 0.0,
            approval: BTreeMap::new(),
        }
    }
}

/// Catalog entry for one random event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDef {
    pub title: String,
    pub description: String,
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub effect: EventEffect,
}

impl EventDef {
    /// The log record shown to the player.
    pub fn to_event(&self) -> Event {
        Event {
            title: self.title.clone(),
            description: self.description.clone(),
            kind: self.kind,
            image: self.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBand {
    /// Exclusive upper bound of this band; the lower bound is the previous
    /// band's upper bound (or 0).
    pub below: f64,
    pub event: EventDef,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventTable {
    bands: Vec<EventBand>,
}

impl EventTable {
    pub fn new(bands: Vec<EventBand>) -> Self {
        Self { bands }
    }

    /// The event selected by `draw`, if any.
    pub fn roll(&self, draw: f64) -> Option<&EventDef> {
        self.bands
            .iter()
            .find(|band| draw < band.below)
            .map(|band| &band.event)
    }

    pub fn bands(&self) -> &[EventBand] {
        &self.bands
    }

    /// Total probability that some event fires.
    pub fn event_probability(&self) -> f64 {
        self.bands.last().map_or(0.0, |band| band.below)
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(below: f64, title: &str) -> EventBand {
        EventBand {
            below,
            event: EventDef {
                title: title.to_string(),
                description: String::new(),
                kind: EventKind::Negative,
                image: None,
                effect: EventEffect::default(),
            },
        }
    }

    fn table() -> EventTable {
        EventTable::new(vec![band(0.05, "a"), band(0.10, "b"), band(0.15, "c")])
    }

    #[test]
    fn test_roll_picks_first_matching_band() {
        let table = table();
        assert_eq!(table.roll(0.0).unwrap().title, "a");
        assert_eq!(table.roll(0.049).unwrap().title, "a");
        assert_eq!(table.roll(0.12).unwrap().title, "c");
    }

    #[test]
    fn test_band_bounds_are_exclusive() {
        let table = table();
        assert_eq!(table.roll(0.05).unwrap().title, "b");
        assert_eq!(table.roll(0.10).unwrap().title, "c");
        assert!(table.roll(0.15).is_none());
    }

    #[test]
    fn test_draw_past_last_band_is_quiet() {
        assert!(table().roll(0.5).is_none());
        assert!(EventTable::default().roll(0.0).is_none());
    }

    #[test]
    fn test_event_probability() {
        assert!((table().event_probability() - 0.15).abs() < 1e-12);
        assert_eq!(EventTable::default().event_probability(), 0.0);
    }

    #[test]
    fn test_default_effect_is_neutral() {
        let effect = EventEffect::default();
        assert_eq!(effect.gdp_multiplier, 1.0);
        assert_eq!(effect.debt_delta, 0.0);
        assert!(effect.approval.is_empty());
    }
}
