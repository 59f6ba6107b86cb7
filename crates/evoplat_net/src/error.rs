use thiserror::Error;

/// Why an inbound optimizer message could not be used.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object")]
    NotAnObject,

    #[error("Message type must be a string, got {0}")]
    InvalidType(String),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
