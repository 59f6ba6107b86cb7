//! Plain data types shared by the evaluator, the wire protocol and the client.

pub mod data;

pub use data::agent::{Agent, AgentStatus, InputState, Position, Velocity};
pub use data::moves::{
    distinct_actions, total_duration, ActionKind, Candidate, Move, Population,
};
pub use data::world::Platform;
