//! Wire protocol between the evaluator and the remote optimizer.
//!
//! The optimizer sends two kinds of text frames over one WebSocket:
//! populations to evaluate (`"type": "EVALUATE_POPULATION"`) and untyped
//! progress reports. The evaluator answers each population with a single
//! `FITNESS_RESULTS` frame.

pub mod error;
pub mod message;

pub use error::{ProtocolError, Result};
pub use message::{
    parse_inbound, EvaluateRequest, Inbound, Outbound, ProgressUpdate, TaskId,
    EVALUATE_POPULATION, FITNESS_RESULTS,
};
