//! Labour market: next year's unemployment rate.

use crate::config::SimConfig;

/// Next year's unemployment rate.
///
/// Strong growth trims a point, a shrinking economy adds one, and policy
/// labour effects are added on top before clamping.
pub fn update_unemployment(
    config: &SimConfig,
    unemployment: f64,
    growth: f64,
    policy_delta: f64,
) -> f64 {
    let base = if growth > config.strong_growth {
        -1.0
    } else if growth < 0.0 {
        1.0
    } else {
        0.0
    };

    (unemployment + base + policy_delta).clamp(config.unemployment_min, config.unemployment_max)
}
