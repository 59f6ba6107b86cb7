//! Connection to the remote optimizer: task creation over HTTP and the
//! evaluation channel over WebSocket.

pub mod error;
pub mod manager;
pub mod tasks;

pub use error::{ClientError, Result};
pub use manager::{NetworkManager, NetworkState};
pub use tasks::{channel_url, OptimizationRequest, TaskClient, TaskResponse};
