//! Error types for termin-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemporalError {
    #[error("Unparseable time expression: {0}")]
    UnparseableTime(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}

pub type Result<T> = std::result::Result<T, TemporalError>;
