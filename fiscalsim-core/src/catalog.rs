//! Static game content: policies, factions, events and the opening state.
//!
//! Everything here is bundled into a [`Ruleset`], which the engine and the
//! session read from but never modify. Share one ruleset between games with
//! `Arc<Ruleset>`.

use crate::config::{ConfigError, SimConfig};
use crate::events::{EventBand, EventDef, EventEffect, EventTable};
use crate::policy::{
    LaborEffect, Linear, PolicyCategory, PolicyControl, PolicyDef, PolicyEffect, PolicyId,
    SliderEffects,
};
use crate::state::{EventKind, Faction, FactionId, GameState, History};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RulesetError {
    #[error("duplicate policy id: {0}")]
    DuplicatePolicy(PolicyId),
    #[error("duplicate faction id: {0}")]
    DuplicateFaction(FactionId),
    #[error("faction {0} must have a positive weight")]
    NonPositiveWeight(FactionId),
    #[error("policy {id}: range {min}..{max} does not contain default {default}")]
    BadSliderRange {
        id: PolicyId,
        min: f64,
        max: f64,
        default: f64,
    },
    #[error("policy {id}: step {step} must not be negative")]
    BadSliderStep { id: PolicyId, step: f64 },
    #[error("event band {index} has bound {below}; bands must rise strictly within (0, 1]")]
    BadEventBand { index: usize, below: f64 },
    #[error("bad config: {0}")]
    BadConfig(#[from] ConfigError),
}

/// Immutable content and constants for a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    #[serde(default)]
    pub config: SimConfig,
    pub initial_state: GameState,
    pub factions: Vec<Faction>,
    pub policies: Vec<PolicyDef>,
    #[serde(default)]
    pub events: EventTable,
}

impl Ruleset {
    /// The built-in island debt-crisis scenario.
    pub fn standard() -> Self {
        let config = SimConfig::default();
        Self {
            initial_state: standard_initial_state(&config),
            config,
            factions: standard_factions(),
            policies: standard_policies(),
            events: standard_events(),
        }
    }

    /// Parse a ruleset from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, RulesetLoadError> {
        let rules: Ruleset = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn policy(&self, id: &PolicyId) -> Option<&PolicyDef> {
        self.policies.iter().find(|p| &p.id == id)
    }

    pub fn faction(&self, id: &FactionId) -> Option<&Faction> {
        self.factions.iter().find(|f| &f.id == id)
    }

    pub fn validate(&self) -> Result<(), RulesetError> {
        self.config.validate()?;

        let mut seen = HashSet::new();
        for policy in &self.policies {
            if !seen.insert(&policy.id) {
                return Err(RulesetError::DuplicatePolicy(policy.id.clone()));
            }
            if let PolicyControl::Slider {
                min,
                max,
                default,
                step,
                ..
            } = policy.control
            {
                if step < 0.0 || step.is_nan() {
                    return Err(RulesetError::BadSliderStep {
                        id: policy.id.clone(),
                        step,
                    });
                }
                if !(min <= default && default <= max) {
                    return Err(RulesetError::BadSliderRange {
                        id: policy.id.clone(),
                        min,
                        max,
                        default,
                    });
                }
            }
        }

        let mut seen = HashSet::new();
        for faction in &self.factions {
            if !seen.insert(&faction.id) {
                return Err(RulesetError::DuplicateFaction(faction.id.clone()));
            }
            if faction.weight <= 0.0 || faction.weight.is_nan() {
                return Err(RulesetError::NonPositiveWeight(faction.id.clone()));
            }
        }

        let mut floor = 0.0;
        for (index, band) in self.events.bands().iter().enumerate() {
            if band.below <= floor || band.below > 1.0 || band.below.is_nan() {
                return Err(RulesetError::BadEventBand {
                    index,
                    below: band.below,
                });
            }
            floor = band.below;
        }

        Ok(())
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Error, Debug)]
pub enum RulesetLoadError {
    #[error("failed to parse ruleset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid ruleset: {0}")]
    Invalid(#[from] RulesetError),
}

pub fn standard_initial_state(config: &SimConfig) -> GameState {
    let (debt, gdp, approval) = (70.0, 100.0, 50.0);
    GameState {
        year: config.epoch_year,
        max_turns: 10,
        debt,
        gdp,
        unemployment: 10.0,
        approval,
        budget: 0.0,
        game_over: false,
        victory: false,
        history: History::starting_at(debt, gdp, approval),
    }
}

fn faction(id: &str, name: &str, weight: f64, approval: f64, description: &str) -> Faction {
    Faction {
        id: id.into(),
        name: name.to_string(),
        description: description.to_string(),
        weight,
        approval,
    }
}

#[rustfmt::skip]
pub fn standard_factions() -> Vec<Faction> {
    vec![
        faction("business", "Local Business", 1.2, 50.0, "Concerned with taxes and regulations."),
        faction("investors", "Foreign Investors", 1.0, 50.0, "Want debt repayment and stability."),
        faction("unions", "Labor Unions", 1.5, 50.0, "Fight for wages and job security."),
        faction("oversight", "Oversight Board", 2.0, 40.0, "Demands balanced budgets and austerity."),
        faction("diaspora", "Diaspora", 0.8, 60.0, "Sends remittances, cares about social issues."),
        faction("tourists", "Tourism Sector", 1.0, 60.0, "Needs safety and infrastructure."),
        faction("elderly", "Pensioners", 1.3, 50.0, "Reliant on pensions and healthcare."),
        faction("youth", "Youth", 1.1, 40.0, "Wants education and jobs."),
    ]
}

fn approvals<T: Copy>(entries: &[(&str, T)]) -> BTreeMap<FactionId, T> {
    entries.iter().map(|&(id, v)| (id.into(), v)).collect()
}

/// Every standard slider moves in half-unit notches.
const SLIDER_STEP: f64 = 0.5;

#[allow(clippy::too_many_arguments)]
fn slider(
    id: &str,
    name: &str,
    category: PolicyCategory,
    (min, max, default): (f64, f64, f64),
    unit: &str,
    description: &str,
    tooltip: &str,
    effects: SliderEffects,
) -> PolicyDef {
    PolicyDef {
        id: id.into(),
        name: name.to_string(),
        category,
        description: description.to_string(),
        tooltip: Some(tooltip.to_string()),
        control: PolicyControl::Slider {
            min,
            max,
            default,
            step: SLIDER_STEP,
            unit: unit.to_string(),
            effects,
        },
    }
}

fn toggle(
    id: &str,
    name: &str,
    description: &str,
    tooltip: &str,
    effects: PolicyEffect,
) -> PolicyDef {
    PolicyDef {
        id: id.into(),
        name: name.to_string(),
        category: PolicyCategory::Policies,
        description: description.to_string(),
        tooltip: Some(tooltip.to_string()),
        control: PolicyControl::Toggle {
            default: false,
            effects,
        },
    }
}

/// Standard policy catalog.
///
/// `poor` and `locals` appear in some approval deltas without a matching
/// faction; the engine drops those deltas.
pub fn standard_policies() -> Vec<PolicyDef> {
    use PolicyCategory::{Revenue, Spending};

    vec![
        slider(
            "corp_tax",
            "Corporate Tax Rate",
            Revenue,
            (0.0, 35.0, 20.0),
            "%",
            "Tax on corporate profits. High taxes hurt business but raise revenue.",
            "Raise for cash, lower for growth.",
            SliderEffects {
                revenue: Some(Linear::per_unit(0.8)),
                gdp_growth: Some(Linear::around(-0.05, 15.0)),
                approval: approvals(&[
                    ("business", Linear::around(-1.5, 15.0)),
                    ("investors", Linear::around(-0.5, 15.0)),
                    ("unions", Linear::per_unit(0.2)),
                ]),
                ..Default::default()
            },
        ),
        slider(
            "sales_tax",
            "Sales Tax (IVU)",
            Revenue,
            (5.0, 15.0, 11.5),
            "%",
            "Consumption tax. High rates hurt the poor and consumption.",
            "Very effective revenue, but hurts everyone.",
            SliderEffects {
                revenue: Some(Linear::per_unit(1.2)),
                gdp_growth: Some(Linear::per_unit(-0.02)),
                approval: approvals(&[
                    ("business", Linear::per_unit(-0.5)),
                    ("unions", Linear::per_unit(-1.0)),
                    ("youth", Linear::per_unit(-0.8)),
                    ("elderly", Linear::per_unit(-1.0)),
                ]),
                ..Default::default()
            },
        ),
        slider(
            "tourism_tax",
            "Tourism Tax",
            Revenue,
            (0.0, 20.0, 7.0),
            "%",
            "Tax on hotel stays and airport fees.",
            "Free money from tourists, until they stop coming.",
            SliderEffects {
                revenue: Some(Linear::per_unit(0.15)),
                gdp_growth: Some(Linear::per_unit(0.0)),
                approval: approvals(&[
                    ("tourists", Linear::per_unit(-2.0)),
                    ("business", Linear::per_unit(-0.5)),
                ]),
                labor: Some(LaborEffect::AboveThreshold {
                    threshold: 10.0,
                    delta: 0.2,
                }),
                ..Default::default()
            },
        ),
        slider(
            "education",
            "Education Spending",
            Spending,
            (1.0, 10.0, 3.0),
            "$B",
            "Investment in schools and universities.",
            "Long-term growth and youth approval.",
            SliderEffects {
                cost: Some(Linear::per_unit(1.0)),
                gdp_growth: Some(Linear::per_unit(0.1)),
                approval: approvals(&[
                    ("youth", Linear::per_unit(3.0)),
                    ("unions", Linear::per_unit(1.0)),
                    ("diaspora", Linear::per_unit(0.5)),
                ]),
                ..Default::default()
            },
        ),
        slider(
            "healthcare",
            "Healthcare Spending",
            Spending,
            (1.0, 10.0, 4.0),
            "$B",
            "Hospitals and public health.",
            "Critical for the elderly.",
            SliderEffects {
                cost: Some(Linear::per_unit(1.0)),
                gdp_growth: Some(Linear::per_unit(0.05)),
                approval: approvals(&[
                    ("elderly", Linear::per_unit(3.0)),
                    ("unions", Linear::per_unit(1.0)),
                    ("poor", Linear::per_unit(2.0)),
                ]),
                ..Default::default()
            },
        ),
        slider(
            "infrastructure",
            "Infrastructure & Power",
            Spending,
            (0.0, 8.0, 1.0),
            "$B",
            "Grid repairs (PREPA) and roads.",
            "Boosts business and tourism significantly.",
            SliderEffects {
                cost: Some(Linear::per_unit(1.0)),
                gdp_growth: Some(Linear::per_unit(0.2)),
                approval: approvals(&[
                    ("business", Linear::per_unit(2.0)),
                    ("tourists", Linear::per_unit(1.5)),
                    ("oversight", Linear::per_unit(-0.5)),
                ]),
                labor: Some(LaborEffect::PerUnit { delta: -0.2 }),
                ..Default::default()
            },
        ),
        toggle(
            "pension_cuts",
            "Pension Cuts",
            "Reduce public pensions to save money. Highly unpopular.",
            "Saves $2B/year but angers the elderly and unions.",
            PolicyEffect {
                cost: -2.0,
                gdp_growth: -0.1,
                approval: approvals(&[
                    ("elderly", -40.0),
                    ("unions", -20.0),
                    ("poor", -25.0),
                    ("oversight", 30.0),
                ]),
                ..Default::default()
            },
        ),
        toggle(
            "diaspora_incentives",
            "Diaspora Incentives",
            "Tax breaks for returning professionals (Act 60 mod).",
            "Attracts talent but may cause gentrification.",
            PolicyEffect {
                cost: 0.5,
                gdp_growth: 0.3,
                approval: approvals(&[
                    ("diaspora", 20.0),
                    ("business", 10.0),
                    ("locals", -5.0),
                ]),
                ..Default::default()
            },
        ),
    ]
}

fn event(
    below: f64,
    title: &str,
    description: &str,
    kind: EventKind,
    effect: EventEffect,
) -> EventBand {
    EventBand {
        below,
        event: EventDef {
            title: title.to_string(),
            description: description.to_string(),
            kind,
            image: None,
            effect,
        },
    }
}

/// Five 5%-wide bands; 75% of turns are quiet.
pub fn standard_events() -> EventTable {
    let mut hurricane = event(
        0.05,
        "Hurricane Strike!",
        "A major hurricane hit the island. Infrastructure damaged.",
        EventKind::Negative,
        EventEffect {
            gdp_multiplier: 0.95,
            debt_delta: 2.0,
            approval: approvals(&[("tourists", -10.0), ("business", -5.0)]),
            ..Default::default()
        },
    );
    hurricane.event.image = Some("event_hurricane".to_string());

    EventTable::new(vec![
        hurricane,
        event(
            0.10,
            "FEMA Audit",
            "Federal auditors found irregularities. Funds frozen.",
            EventKind::Negative,
            EventEffect {
                budget_delta: -1.0,
                approval: approvals(&[("oversight", 10.0), ("locals", -5.0)]),
                ..Default::default()
            },
        ),
        event(
            0.15,
            "Crypto Boom",
            "Influx of crypto investors boosts local spending.",
            EventKind::Positive,
            EventEffect {
                gdp_multiplier: 1.02,
                approval: approvals(&[("business", 5.0), ("locals", -5.0)]),
                ..Default::default()
            },
        ),
        event(
            0.20,
            "Grid Collapse",
            "Massive island-wide blackout. Economy halts.",
            EventKind::Negative,
            EventEffect {
                gdp_multiplier: 0.98,
                approval: approvals(&[("business", -10.0), ("locals", -10.0)]),
                ..Default::default()
            },
        ),
        event(
            0.25,
            "Brain Drain",
            "Young professionals are leaving for the mainland.",
            EventKind::Negative,
            EventEffect {
                gdp_multiplier: 0.99,
                approval: approvals(&[("youth", -5.0)]),
                ..Default::default()
            },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyValue;

    #[test]
    fn test_standard_ruleset_is_valid() {
        let rules = Ruleset::standard();
        assert_eq!(rules.validate(), Ok(()));
        assert_eq!(rules.policies.len(), 8);
        assert_eq!(rules.factions.len(), 8);
        assert_eq!(rules.events.len(), 5);
        assert!((rules.events.event_probability() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_initial_state_history_seeded() {
        let state = Ruleset::standard().initial_state;
        assert_eq!(state.year, 2025);
        assert_eq!(state.max_turns, 10);
        assert_eq!(state.history.debt, vec![70.0]);
        assert_eq!(state.history.gdp, vec![100.0]);
        assert_eq!(state.history.approval, vec![50.0]);
    }

    #[test]
    fn test_orphan_approval_targets_are_not_factions() {
        let rules = Ruleset::standard();
        assert!(rules.faction(&"poor".into()).is_none());
        assert!(rules.faction(&"locals".into()).is_none());
    }

    #[test]
    fn test_duplicate_policy_rejected() {
        let mut rules = Ruleset::standard();
        let dup = rules.policies[0].clone();
        rules.policies.push(dup);
        assert_eq!(
            rules.validate(),
            Err(RulesetError::DuplicatePolicy("corp_tax".into()))
        );
    }

    #[test]
    fn test_zero_weight_rejected() {
        let mut rules = Ruleset::standard();
        rules.factions[3].weight = 0.0;
        assert_eq!(
            rules.validate(),
            Err(RulesetError::NonPositiveWeight("oversight".into()))
        );
    }

    #[test]
    fn test_default_outside_range_rejected() {
        let mut rules = Ruleset::standard();
        if let PolicyControl::Slider { default, .. } = &mut rules.policies[0].control {
            *default = 50.0;
        }
        assert!(matches!(
            rules.validate(),
            Err(RulesetError::BadSliderRange { .. })
        ));
    }

    #[test]
    fn test_policy_descriptions_keep_local_names() {
        let rules = Ruleset::standard();
        let description = |id: &str| rules.policy(&id.into()).map(|p| p.description.clone());
        assert_eq!(
            description("infrastructure").as_deref(),
            Some("Grid repairs (PREPA) and roads.")
        );
        assert_eq!(
            description("diaspora_incentives").as_deref(),
            Some("Tax breaks for returning professionals (Act 60 mod).")
        );
    }

    #[test]
    fn test_negative_step_rejected() {
        let mut rules = Ruleset::standard();
        if let PolicyControl::Slider { step, .. } = &mut rules.policies[1].control {
            *step = -0.5;
        }
        assert_eq!(
            rules.validate(),
            Err(RulesetError::BadSliderStep {
                id: "sales_tax".into(),
                step: -0.5
            })
        );
    }

    #[test]
    fn test_standard_defaults_sit_on_the_step_grid() {
        for def in Ruleset::standard().policies {
            if let PolicyValue::Level(level) = def.default_value() {
                assert!(def.allows_level(level), "{} default {}", def.id, level);
            }
        }
    }

    #[test]
    fn test_unordered_bands_rejected() {
        let mut rules = Ruleset::standard();
        let mut bands = rules.events.bands().to_vec();
        bands.swap(0, 1);
        rules.events = EventTable::new(bands);
        assert_eq!(
            rules.validate(),
            Err(RulesetError::BadEventBand {
                index: 1,
                below: 0.05
            })
        );
    }

    #[test]
    fn test_inverted_unemployment_range_rejected() {
        let mut rules = Ruleset::standard();
        rules.config = SimConfig::from_json(r#"{"unemployment_min": 40}"#).unwrap();
        assert_eq!(
            rules.validate(),
            Err(RulesetError::BadConfig(ConfigError::EmptyUnemploymentRange {
                min: 40.0,
                max: 30.0
            }))
        );
    }

    #[test]
    fn test_json_round_trip_validates() {
        let json = serde_json::to_string(&Ruleset::standard()).unwrap();
        let rules = Ruleset::from_json(&json).expect("standard ruleset reloads");
        assert_eq!(rules.policies.len(), 8);
        assert_eq!(rules.policies[6].id, PolicyId::from("pension_cuts"));
        assert_eq!(rules.factions[3].weight, 2.0);
        assert_eq!(rules.events.bands()[2].event.title, "Crypto Boom");
    }

    #[test]
    fn test_json_with_invalid_content_fails() {
        let mut rules = Ruleset::standard();
        rules.factions[0].weight = -1.0;
        let json = serde_json::to_string(&rules).unwrap();
        assert!(matches!(
            Ruleset::from_json(&json),
            Err(RulesetLoadError::Invalid(_))
        ));
    }
}
