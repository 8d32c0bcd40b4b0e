// SPDX-License-Identifier: Apache-2.0

//! Errors raised by the result set contract itself.
//!
//! These are structural failures (missing column, cursor misuse, allocation
//! failure). Join strategies translate the recoverable ones into job
//! diagnostics; only `Allocation` is expected to escape a join.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ResultSetError {
    #[error("Column '{name}' does not exist")]
    ColumnNotFound { name: String },

    #[error("Column index {index} is out of bounds for {count} columns")]
    ColumnOutOfBounds { index: usize, count: usize },

    #[error("Cursor is not positioned on a row")]
    NoCurrentRow,

    #[error("Row has {actual} cells but the schema has {expected} columns")]
    RowWidth { expected: usize, actual: usize },

    #[error("Failed to grow result set: {message}")]
    Allocation { message: String },
}

impl ResultSetError {
    pub fn column_not_found(name: impl Into<String>) -> Self {
        Self::ColumnNotFound { name: name.into() }
    }

    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation { message: msg.into() }
    }
}

/// Result type alias for result set operations
pub type ResultSetResult<T> = Result<T, ResultSetError>;
