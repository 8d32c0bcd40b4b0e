// SPDX-License-Identifier: Apache-2.0

//! Join error taxonomy
//!
//! Every variant is recovered inside the strategy that raised it and surfaced
//! as an `Error` job whose message is this type's `Display` output. The
//! message prefixes (`LeftResultSet is null`, `RightColumn : ...`) are part of
//! the public contract.

use std::fmt;

use fedjoin_core::ResultSetError;
use thiserror::Error;

use crate::join::request::Side;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("{side}ResultSet is null")]
    MissingOperand { side: Side },

    #[error("{side}Column : {message}")]
    ColumnResolution { side: Side, message: String },

    #[error("{message}")]
    SchemaMismatch { message: String },

    #[error("Invalid setting '{key}': {message}")]
    Configuration { key: String, message: String },
}

impl JoinError {
    pub fn missing_operand(side: Side) -> Self {
        Self::MissingOperand { side }
    }

    pub fn column_resolution(side: Side, msg: impl fmt::Display) -> Self {
        Self::ColumnResolution {
            side,
            message: msg.to_string(),
        }
    }

    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch { message: msg.into() }
    }

    pub fn configuration(key: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Configuration {
            key: key.into(),
            message: msg.into(),
        }
    }
}

/// Result type alias for a strategy run.
///
/// Only failures of the result set itself travel through the `Err` arm;
/// everything in [`JoinError`] ends up on the job instead.
pub type JoinResult<T> = Result<T, ResultSetError>;
