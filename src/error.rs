//! Error taxonomy shared by the fetcher, the parser and the CLI.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlightError {
    /// Caller input rejected before any request is made.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Response body is not JSON or lacks an expected field.
    #[error("parse error at `{field}`: {reason}")]
    Parse { field: String, reason: String },
}

impl FlightError {
    pub fn invalid(message: impl Into<String>) -> Self {
        FlightError::InvalidArgument(message.into())
    }

    pub fn parse(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FlightError::Parse {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FlightError>;
