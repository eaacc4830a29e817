//! Headless front end for the fiscal simulation: dashboard figures, a
//! file-backed save store, and the `fiscalsim` command line.

pub mod dashboard;
pub mod store;

pub use dashboard::{game_over_summary, ApprovalTier, Dashboard, GameOverSummary};
pub use store::JsonFileStore;
