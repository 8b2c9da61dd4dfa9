//! Shared error types for the test harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Duplicate test id: {id}")]
    DuplicateTestId { id: String },

    #[error("Invalid size class: {input} (expected short, medium or long)")]
    InvalidSizeClass { input: String },

    #[error("Invalid descriptor {id}: {reason}")]
    InvalidDescriptor { id: String, reason: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
