use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A constant the engine cannot run with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} is not a number")]
    NotANumber { field: &'static str },
    #[error("unemployment range {min}..={max} is empty")]
    EmptyUnemploymentRange { min: f64, max: f64 },
    #[error("gdp_floor must be positive, got {0}")]
    NonPositiveGdpFloor(f64),
    #[error("debt_drag_slope must not be negative, got {0}")]
    NegativeDebtDrag(f64),
}

/// Simulation constants.
///
/// Every tunable number the turn engine reads lives here. Missing keys in a
/// JSON document fall back to the defaults, so a config file only needs to
/// name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Year the game starts in; the term limit is measured from here.
    pub epoch_year: i32,

    /// Annual growth before policy effects (percentage points).
    pub base_growth: f64,
    /// Share of GDP collected as revenue regardless of policy.
    pub base_revenue_rate: f64,
    /// Interest paid on outstanding debt each year.
    pub interest_rate: f64,

    /// Debt-to-GDP ratio above which growth is penalised.
    pub debt_drag_threshold: f64,
    /// Growth points lost per unit of debt-to-GDP above the threshold
    /// (a ratio of 1.0 against a 0.8 threshold costs 0.2 * slope).
    pub debt_drag_slope: f64,
    /// Worst possible growth in a single year (percent).
    pub growth_floor: f64,

    /// Growth above which factions and the labour market react favourably.
    pub strong_growth: f64,
    pub strong_growth_bonus: f64,
    /// Approval lost by every faction in a shrinking economy.
    pub recession_penalty: f64,
    /// Unemployment above which every faction loses approval.
    pub high_unemployment: f64,
    pub high_unemployment_penalty: f64,

    pub unemployment_min: f64,
    pub unemployment_max: f64,

    /// GDP never drops below this; hitting it ends the game in bankruptcy.
    pub gdp_floor: f64,

    /// Win when debt-to-GDP falls to or below this.
    pub victory_debt_ratio: f64,
    /// Lose when aggregate approval drops below this.
    pub min_approval: f64,
    /// Lose when debt-to-GDP rises above this.
    pub bankruptcy_debt_ratio: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            epoch_year: 2025,
            base_growth: 2.0,
            base_revenue_rate: 0.10,
            interest_rate: 0.04,
            debt_drag_threshold: 0.8,
            debt_drag_slope: 5.0,
            growth_floor: -10.0,
            strong_growth: 2.0,
            strong_growth_bonus: 2.0,
            recession_penalty: 5.0,
            high_unemployment: 12.0,
            high_unemployment_penalty: 2.0,
            unemployment_min: 2.0,
            unemployment_max: 30.0,
            gdp_floor: 0.01,
            victory_debt_ratio: 0.50,
            min_approval: 20.0,
            bankruptcy_debt_ratio: 2.0,
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON config.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject constants that would make a turn panic or run backwards.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let numbers = [
            ("base_growth", self.base_growth),
            ("base_revenue_rate", self.base_revenue_rate),
            ("interest_rate", self.interest_rate),
            ("debt_drag_threshold", self.debt_drag_threshold),
            ("debt_drag_slope", self.debt_drag_slope),
            ("growth_floor", self.growth_floor),
            ("strong_growth", self.strong_growth),
            ("strong_growth_bonus", self.strong_growth_bonus),
            ("recession_penalty", self.recession_penalty),
            ("high_unemployment", self.high_unemployment),
            ("high_unemployment_penalty", self.high_unemployment_penalty),
            ("unemployment_min", self.unemployment_min),
            ("unemployment_max", self.unemployment_max),
            ("gdp_floor", self.gdp_floor),
            ("victory_debt_ratio", self.victory_debt_ratio),
            ("min_approval", self.min_approval),
            ("bankruptcy_debt_ratio", self.bankruptcy_debt_ratio),
        ];
        if let Some(&(field, _)) = numbers.iter().find(|(_, v)| v.is_nan()) {
            return Err(ConfigError::NotANumber { field });
        }
        if self.unemployment_min > self.unemployment_max {
            return Err(ConfigError::EmptyUnemploymentRange {
                min: self.unemployment_min,
                max: self.unemployment_max,
            });
        }
        if self.gdp_floor <= 0.0 {
            return Err(ConfigError::NonPositiveGdpFloor(self.gdp_floor));
        }
        if self.debt_drag_slope < 0.0 {
            return Err(ConfigError::NegativeDebtDrag(self.debt_drag_slope));
        }
        Ok(())
    }
}
