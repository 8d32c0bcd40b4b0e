// SPDX-License-Identifier: Apache-2.0

//! Tabular data contract shared by every fedjoin strategy.
//!
//! Operand result sets are produced by the resource layer and consumed here
//! read-only; output result sets are built row by row through the cursor API.

pub mod error;
pub mod job;
pub mod result_set;
pub mod types;

pub use error::{ResultSetError, ResultSetResult};
pub use job::{Job, JobId, JobStatus, ResultShape, SessionId};
pub use result_set::{Cursor, ResultSet, Scan};
pub use types::{Column, DataType, Value};
