use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoherenceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error: {route} returned status {status}")]
    Api { route: String, status: u16 },

    #[error("Transport error: {0}")]
    Transport(#[from] eyre::Report),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type CoherenceResult<T> = Result<T, CoherenceError>;
