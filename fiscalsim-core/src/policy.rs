//! Policy levers: immutable definitions and the player's current selection.
//!
//! A [`PolicyDef`] never changes during a game. What the player adjusts is a
//! [`PolicyValue`], stored per policy id in a [`PolicySelection`]. Effects are
//! described as data (linear terms and fixed deltas) rather than closures, so
//! a catalog can be serialized, inspected, and loaded from JSON.

use crate::state::FactionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable key of a policy (e.g. `"corp_tax"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(pub String);

impl PolicyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PolicyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tab a policy is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyCategory {
    Revenue,
    Spending,
    Policies,
}

/// `slope * (value - pivot)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Linear {
    pub slope: f64,
    #[serde(default)]
    pub pivot: f64,
}

impl Linear {
    /// Proportional to the value.
    pub const fn per_unit(slope: f64) -> Self {
        Self { slope, pivot: 0.0 }
    }

    /// Zero at `pivot`, growing by `slope` per unit above it.
    pub const fn around(slope: f64, pivot: f64) -> Self {
        Self { slope, pivot }
    }

    pub fn at(&self, value: f64) -> f64 {
        self.slope * (value - self.pivot)
    }
}

/// How a slider moves unemployment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LaborEffect {
    /// Adds `delta` once the value exceeds `threshold`.
    AboveThreshold { threshold: f64, delta: f64 },
    /// Adds `delta` for every unit of value.
    PerUnit { delta: f64 },
}

impl LaborEffect {
    pub fn at(&self, value: f64) -> f64 {
        match *self {
            LaborEffect::AboveThreshold { threshold, delta } => {
                if value > threshold {
                    delta
                } else {
                    0.0
                }
            }
            LaborEffect::PerUnit { delta } => delta * value,
        }
    }
}

/// Effect terms of a continuous policy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderEffects {
    pub revenue: Option<Linear>,
    pub cost: Option<Linear>,
    pub gdp_growth: Option<Linear>,
    pub approval: BTreeMap<FactionId, Linear>,
    pub labor: Option<LaborEffect>,
}

impl SliderEffects {
    pub fn evaluate(&self, value: f64) -> PolicyEffect {
        let term = |t: &Option<Linear>| t.map_or(0.0, |l| l.at(value));
        PolicyEffect {
            revenue: term(&self.revenue),
            cost: term(&self.cost),
            gdp_growth: term(&self.gdp_growth),
            unemployment: self.labor.map_or(0.0, |l| l.at(value)),
            approval: self
                .approval
                .iter()
                .map(|(id, l)| (id.clone(), l.at(value)))
                .collect(),
        }
    }
}

/// Economic and political delta produced by one policy for one turn.
///
/// A negative `cost` is a saving.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyEffect {
    pub revenue: f64,
    pub cost: f64,
    /// Growth contribution in percentage points.
    pub gdp_growth: f64,
    /// Unemployment contribution in percentage points.
    pub unemployment: f64,
    /// Approval change per faction. Factions not listed are unaffected.
    pub approval: BTreeMap<FactionId, f64>,
}

impl PolicyEffect {
    pub fn is_empty(&self) -> bool {
        self.revenue == 0.0
            && self.cost == 0.0
            && self.gdp_growth == 0.0
            && self.unemployment == 0.0
            && self.approval.is_empty()
    }
}

/// Value domain and effect model of a policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolicyControl {
    Slider {
        min: f64,
        max: f64,
        default: f64,
        /// Levels sit on `min + k * step`; zero allows any level.
        #[serde(default)]
        step: f64,
        unit: String,
        effects: SliderEffects,
    },
    /// `effects` apply only while the toggle is on.
    Toggle { default: bool, effects: PolicyEffect },
}

/// Immutable catalog entry for one lever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDef {
    pub id: PolicyId,
    pub name: String,
    pub category: PolicyCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    pub control: PolicyControl,
}

impl PolicyDef {
    pub fn default_value(&self) -> PolicyValue {
        match &self.control {
            PolicyControl::Slider { default, .. } => PolicyValue::Level(*default),
            PolicyControl::Toggle { default, .. } => PolicyValue::Enabled(*default),
        }
    }

    /// Whether `value` is of the right kind for this policy.
    pub fn accepts(&self, value: PolicyValue) -> bool {
        matches!(
            (&self.control, value),
            (PolicyControl::Slider { .. }, PolicyValue::Level(_))
                | (PolicyControl::Toggle { .. }, PolicyValue::Enabled(_))
        )
    }

    /// Whether `level` is a legal slider setting: inside `min..=max` and on
    /// the step grid. Always false for toggles.
    pub fn allows_level(&self, level: f64) -> bool {
        match self.control {
            PolicyControl::Slider { min, max, step, .. } => {
                (min..=max).contains(&level) && on_grid(level - min, step)
            }
            PolicyControl::Toggle { .. } => false,
        }
    }

    /// Evaluate the effect model. `None` if `value` is the wrong kind.
    pub fn effect(&self, value: PolicyValue) -> Option<PolicyEffect> {
        match (&self.control, value) {
            (PolicyControl::Slider { effects, .. }, PolicyValue::Level(v)) => {
                Some(effects.evaluate(v))
            }
            (PolicyControl::Toggle { effects, .. }, PolicyValue::Enabled(on)) => Some(if on {
                effects.clone()
            } else {
                PolicyEffect::default()
            }),
            _ => None,
        }
    }
}

fn on_grid(offset: f64, step: f64) -> bool {
    if step <= 0.0 {
        return true;
    }
    let steps = offset / step;
    (steps - steps.round()).abs() < 1e-9
}

/// Current setting of a lever. Serialized as a bare number or boolean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PolicyValue {
    Level(f64),
    Enabled(bool),
}

impl PolicyValue {
    pub fn as_level(self) -> Option<f64> {
        match self {
            PolicyValue::Level(v) => Some(v),
            PolicyValue::Enabled(_) => None,
        }
    }

    pub fn as_enabled(self) -> Option<bool> {
        match self {
            PolicyValue::Enabled(on) => Some(on),
            PolicyValue::Level(_) => None,
        }
    }
}

impl fmt::Display for PolicyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyValue::Level(v) => write!(f, "{v}"),
            PolicyValue::Enabled(true) => f.write_str("on"),
            PolicyValue::Enabled(false) => f.write_str("off"),
        }
    }
}

/// The player's choices, keyed by policy id. Policies without an entry run
/// at their catalog default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicySelection {
    values: BTreeMap<PolicyId, PolicyValue>,
}

impl PolicySelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: PolicyId, value: PolicyValue) {
        self.values.insert(id, value);
    }

    pub fn get(&self, id: &PolicyId) -> Option<PolicyValue> {
        self.values.get(id).copied()
    }

    /// Selected value, or the catalog default when nothing was chosen.
    pub fn value_of(&self, def: &PolicyDef) -> PolicyValue {
        self.get(&def.id).unwrap_or_else(|| def.default_value())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PolicyId, &PolicyValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
