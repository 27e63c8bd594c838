//! Core error types for Tempo domain logic
//!
//! Errors are `Clone` so the manager can return one to the caller and
//! keep a copy in its last-error slot.

use thiserror::Error;

use crate::task::TaskId;

/// Core domain and persistence errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task {0} not found")]
    NotFound(TaskId),

    #[error("Task {0} already exists")]
    Duplicate(TaskId),

    #[error("Invalid task data: {0}")]
    InvalidData(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl TaskError {
    /// Create an invalid-data error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

impl From<std::io::Error> for TaskError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TaskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, TaskError>;
