//! Error types for schoolcal.

use thiserror::Error;

/// Errors that can occur while fetching, rendering or caching a schedule.
#[derive(Error, Debug)]
pub enum SchoolCalError {
    #[error("Malformed date '{0}': expected YYYYMMDD")]
    MalformedDate(String),

    #[error("Could not reach NEIS: {0}")]
    Transport(String),

    #[error("NEIS returned an error: {0}")]
    Upstream(String),

    #[error("Malformed NEIS response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for schoolcal operations.
pub type SchoolCalResult<T> = Result<T, SchoolCalError>;
