//! Error types for the optimizer client.

use evoplat_net::ProtocolError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP transport or decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket handshake or frame failure
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The optimizer refused a new task because too many are running
    #[error("Optimizer is at its concurrent task limit: {0}")]
    TaskLimit(String),

    /// Any other non-success answer to a task request
    #[error("Task request failed with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Optimizer channel closed")]
    ChannelClosed,
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    #[must_use]
    pub fn rejected<S: Into<String>>(status: u16, body: S) -> Self {
        Self::Rejected {
            status,
            body: body.into(),
        }
    }
}
