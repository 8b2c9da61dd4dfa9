//! Harness-specific error types

use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Test environment setup failed: {message}")]
    Setup { message: String },

    #[error("Result aggregation failed: {message}")]
    Aggregator { message: String },

    #[error("Scheduler worker failed: {message}")]
    Scheduler { message: String },

    #[error("Shared component error")]
    Shared(#[from] SharedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
