use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable key of a political faction (e.g. `"unions"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactionId(pub String);

impl FactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FactionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-turn series kept for charting. One entry per resolved turn plus the
/// starting value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct History {
    pub debt: Vec<f64>,
    pub gdp: Vec<f64>,
    pub approval: Vec<f64>,
}

impl History {
    /// History seeded with the starting values.
    pub fn starting_at(debt: f64, gdp: f64, approval: f64) -> Self {
        Self {
            debt: vec![debt],
            gdp: vec![gdp],
            approval: vec![approval],
        }
    }

    pub fn push(&mut self, debt: f64, gdp: f64, approval: f64) {
        self.debt.push(debt);
        self.gdp.push(gdp);
        self.approval.push(approval);
    }

    pub fn len(&self) -> usize {
        self.debt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.debt.is_empty()
    }
}

/// Economic and political snapshot for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub year: i32,
    pub max_turns: u32,
    /// Outstanding debt (billions).
    pub debt: f64,
    /// Gross domestic product (billions).
    pub gdp: f64,
    /// Percent of the labour force out of work.
    pub unemployment: f64,
    /// Weighted mean of faction approvals.
    pub approval: f64,
    /// Last turn's surplus (positive) or deficit (negative).
    pub budget: f64,
    pub game_over: bool,
    pub victory: bool,
    pub history: History,
}

impl GameState {
    pub fn debt_ratio(&self) -> f64 {
        self.debt / self.gdp
    }

    /// Number of turns resolved since the game started.
    pub fn turns_played(&self) -> usize {
        self.history.len().saturating_sub(1)
    }
}

/// A political constituency whose approval the player courts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    pub description: String,
    /// Relative influence in the aggregate approval score.
    pub weight: f64,
    /// Approval in [0, 100].
    pub approval: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Positive,
    Negative,
    /// Narrates a loss condition.
    Lose,
}

/// Something that happened during a turn, for the player to read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Event {
    pub fn lose(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            kind: EventKind::Lose,
            image: None,
        }
    }
}

/// Which terminal condition ended the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Victory,
    Impeached,
    Bankruptcy,
    TermLimit,
}

impl Outcome {
    pub fn is_victory(self) -> bool {
        matches!(self, Outcome::Victory)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Victory => "victory",
            Outcome::Impeached => "impeached",
            Outcome::Bankruptcy => "bankruptcy",
            Outcome::TermLimit => "term limit",
        };
        f.write_str(label)
    }
}

/// Everything a resolved turn hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub new_state: GameState,
    pub new_factions: Vec<Faction>,
    pub event_log: Vec<Event>,
    /// Set when this turn ended the game.
    pub outcome: Option<Outcome>,
}
