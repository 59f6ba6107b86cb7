use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// What a single timed move asks the agent to do.
///
/// The optimizer ships actions as bare strings. Anything outside the
/// recognised set is kept verbatim as [`ActionKind::Unknown`] so the
/// evaluator can mark the candidate invalid instead of failing to parse the
/// whole population.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    Left,
    Right,
    Jump,
    /// Ends the candidate's run as soon as it becomes the active move.
    Pause,
    Unknown(String),
}

impl ActionKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Jump => "jump",
            Self::Pause => "pause",
            Self::Unknown(raw) => raw,
        }
    }

    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<&str> for ActionKind {
    fn from(raw: &str) -> Self {
        match raw {
            "left" => Self::Left,
            "right" => Self::Right,
            "jump" => Self::Jump,
            "pause" => Self::Pause,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for ActionKind {
    fn from(raw: String) -> Self {
        match Self::from(raw.as_str()) {
            Self::Unknown(_) => Self::Unknown(raw),
            known => known,
        }
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a candidate's timeline: hold `action` for `duration` seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub action: ActionKind,
    pub duration: f64,
}

impl Move {
    pub fn new(action: impl Into<ActionKind>, duration: f64) -> Self {
        Self {
            action: action.into(),
            duration,
        }
    }
}

/// A single candidate solution: its full move sequence.
pub type Candidate = Vec<Move>;

/// Every candidate of one generation, in optimizer order.
pub type Population = Vec<Candidate>;

/// Number of distinct action kinds appearing in a move sequence.
#[must_use]
pub fn distinct_actions(moves: &[Move]) -> usize {
    moves.iter().map(|m| &m.action).collect::<HashSet<_>>().len()
}

/// Sum of all move durations, i.e. the longest the candidate can run.
#[must_use]
pub fn total_duration(moves: &[Move]) -> f64 {
    moves.iter().map(|m| m.duration.max(0.0)).sum()
}
