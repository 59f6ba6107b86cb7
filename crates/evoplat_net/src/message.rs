use crate::error::{ProtocolError, Result};
use evoplat_data::Population;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

pub const EVALUATE_POPULATION: &str = "EVALUATE_POPULATION";
pub const FITNESS_RESULTS: &str = "FITNESS_RESULTS";

/// Optimizer task identifier, echoed back exactly as received.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum TaskId {
    Numeric(i64),
    Text(String),
}

impl TaskId {
    /// The id as a UUID, when it is one.
    #[must_use]
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Text(raw) => Uuid::parse_str(raw).ok(),
            Self::Numeric(_) => None,
        }
    }
}

impl From<Uuid> for TaskId {
    fn from(id: Uuid) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<&str> for TaskId {
    fn from(raw: &str) -> Self {
        Self::Text(raw.to_string())
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        Self::Numeric(id)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(raw) => f.write_str(raw),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub task_id: TaskId,
    pub generation: u64,
    pub population: Population,
}

impl EvaluateRequest {
    /// Encodes the request as the optimizer would send it.
    pub fn to_json(&self) -> Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.insert("type".into(), Value::from(EVALUATE_POPULATION));
        }
        Ok(serde_json::to_string(&value)?)
    }
}

/// Per-generation report from the optimizer. Display only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub generation: u64,
    pub best_fitness: f64,
    #[serde(default)]
    pub best_solution: Value,
    #[serde(default)]
    pub average_fitness: Option<f64>,
    #[serde(default)]
    pub population_diversity: Option<f64>,
    #[serde(default)]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A classified inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Evaluate(EvaluateRequest),
    Progress(ProgressUpdate),
    /// Typed message this client does not handle.
    Unknown { kind: String },
}

/// Messages sent to the optimizer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Outbound {
    #[serde(rename = "FITNESS_RESULTS", rename_all = "camelCase")]
    FitnessResults {
        task_id: TaskId,
        generation: u64,
        scores: Vec<f64>,
    },
}

impl Outbound {
    #[must_use]
    pub fn fitness_results(task_id: TaskId, generation: u64, scores: Vec<f64>) -> Self {
        Self::FitnessResults {
            task_id,
            generation,
            scores,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Classifies one inbound text frame.
///
/// Frames without a `type` are progress updates; `EVALUATE_POPULATION`
/// carries a population. Any other type is returned as
/// [`Inbound::Unknown`] for the caller to log and skip.
pub fn parse_inbound(text: &str) -> Result<Inbound> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(ProtocolError::NotAnObject);
    }
    let kind = match value.get("type") {
        None | Some(Value::Null) => None,
        Some(Value::String(kind)) => Some(kind.clone()),
        Some(other) => return Err(ProtocolError::InvalidType(other.to_string())),
    };

    match kind.as_deref() {
        None => Ok(Inbound::Progress(serde_json::from_value(value)?)),
        Some(EVALUATE_POPULATION) => Ok(Inbound::Evaluate(serde_json::from_value(value)?)),
        Some(other) => Ok(Inbound::Unknown {
            kind: other.to_string(),
        }),
    }
}
