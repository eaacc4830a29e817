//! Figures the player sees between turns.
//!
//! Everything here is derived from a [`GameSession`]; nothing is stored.

use fiscalsim_core::policy::{PolicyCategory, PolicyControl};
use fiscalsim_core::state::{Event, EventKind, GameState};
use fiscalsim_core::{FactionId, GameSession, PolicyId};
use std::fmt;

/// Debt-to-GDP percentage above which the ratio is flagged.
pub const DEBT_ALERT_PERCENT: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalTier {
    Critical,
    Uneasy,
    Supportive,
}

impl ApprovalTier {
    pub fn of(approval: f64) -> Self {
        if approval < 30.0 {
            ApprovalTier::Critical
        } else if approval < 60.0 {
            ApprovalTier::Uneasy
        } else {
            ApprovalTier::Supportive
        }
    }
}

impl fmt::Display for ApprovalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ApprovalTier::Critical => "critical",
            ApprovalTier::Uneasy => "uneasy",
            ApprovalTier::Supportive => "supportive",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactionStanding {
    pub id: FactionId,
    pub name: String,
    /// First two letters of the name, upper-cased.
    pub initials: String,
    pub approval: f64,
    pub tier: ApprovalTier,
}

/// Debt and GDP over time, one point per year.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSeries {
    pub labels: Vec<i32>,
    pub debt: Vec<f64>,
    pub gdp: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRow {
    pub id: PolicyId,
    pub name: String,
    pub category: PolicyCategory,
    /// Current value with its unit, e.g. `20%` or `on`.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub year: i32,
    pub approval: f64,
    pub debt: f64,
    pub gdp: f64,
    pub unemployment: f64,
    pub budget: f64,
    pub debt_ratio_percent: f64,
    pub debt_alert: bool,
    pub surplus: bool,
    pub chart: ChartSeries,
    pub factions: Vec<FactionStanding>,
}

impl Dashboard {
    pub fn from_session(session: &GameSession) -> Self {
        let state = session.state();
        let debt_ratio_percent = state.debt_ratio() * 100.0;

        let epoch = session.rules().config.epoch_year;
        let chart = ChartSeries {
            labels: (0..state.history.debt.len())
                .map(|i| epoch + i as i32)
                .collect(),
            debt: state.history.debt.clone(),
            gdp: state.history.gdp.clone(),
        };

        let factions = session
            .factions()
            .iter()
            .map(|f| FactionStanding {
                id: f.id.clone(),
                name: f.name.clone(),
                initials: f.name.chars().take(2).collect::<String>().to_uppercase(),
                approval: f.approval,
                tier: ApprovalTier::of(f.approval),
            })
            .collect();

        Self {
            year: state.year,
            approval: state.approval,
            debt: state.debt,
            gdp: state.gdp,
            unemployment: state.unemployment,
            budget: state.budget,
            debt_ratio_percent,
            debt_alert: debt_ratio_percent > DEBT_ALERT_PERCENT,
            surplus: state.budget >= 0.0,
            chart,
            factions,
        }
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.surplus { '+' } else { '-' };
        write!(
            f,
            "{} | approval {:.1}% | debt ${:.1}B | gdp ${:.1}B | debt/gdp {:.1}%{} | unemployment {:.1}% | budget {}${:.1}B",
            self.year,
            self.approval,
            self.debt,
            self.gdp,
            self.debt_ratio_percent,
            if self.debt_alert { " (!)" } else { "" },
            self.unemployment,
            sign,
            self.budget.abs()
        )
    }
}

/// The policy board, in catalog order.
pub fn policy_rows(session: &GameSession) -> Vec<PolicyRow> {
    session
        .rules()
        .policies
        .iter()
        .map(|def| {
            let value = session.selection().value_of(def);
            let value = match &def.control {
                PolicyControl::Slider { unit, .. } => format!("{value}{unit}"),
                PolicyControl::Toggle { .. } => value.to_string(),
            };
            PolicyRow {
                id: def.id.clone(),
                name: def.name.clone(),
                category: def.category,
                value,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameOverSummary {
    pub title: String,
    pub body: String,
    pub victory: bool,
}

impl fmt::Display for GameOverSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n{}", self.title, self.body)
    }
}

/// End-of-game message, or `None` while the game is still running.
///
/// `events` is the log of the final turn; its first loss event explains a
/// defeat.
pub fn game_over_summary(state: &GameState, events: &[Event]) -> Option<GameOverSummary> {
    if !state.game_over {
        return None;
    }

    if state.victory {
        return Some(GameOverSummary {
            title: "VICTORY!".to_string(),
            body: format!(
                "You have successfully saved the island!\n\nFinal Debt: ${:.1}B\nFinal GDP: ${:.1}B\nApproval: {:.1}%",
                state.debt, state.gdp, state.approval
            ),
            victory: true,
        });
    }

    let reason = events
        .iter()
        .find(|e| e.kind == EventKind::Lose)
        .map_or("Time ran out.", |e| e.description.as_str());
    Some(GameOverSummary {
        title: "GAME OVER".to_string(),
        body: format!("Your term has ended.\n\nReason: {reason}"),
        victory: false,
    })
}
