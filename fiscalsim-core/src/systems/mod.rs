//! Turn systems, run by [`crate::step::resolve_turn`] in this order:
//!
//! 1. `budget`: policy aggregation, budget settlement, GDP growth
//! 2. `events`: random event draw, GDP floor
//! 3. `factions`: faction approval and the weighted aggregate
//! 4. `labor`: unemployment
//! 5. `outcome`: win/lose checks

pub mod budget;
pub mod events;
pub mod factions;
pub mod labor;
pub mod outcome;

pub use budget::{aggregate_policies, growth_percent, settle_budget, PolicyTotals, Settlement};
pub use events::{enforce_gdp_floor, roll_event};
pub use factions::{aggregate_approval, update_factions, FactionImpacts};
pub use labor::update_unemployment;
pub use outcome::{apply_outcome, evaluate_outcome};
