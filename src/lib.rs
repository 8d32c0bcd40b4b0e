// SPDX-License-Identifier: Apache-2.0

//! fedjoin: join execution engine for federated query results.
//!
//! Combines the tabular outputs of two resources with one of four
//! strategies: inner hash join, left outer join, full outer join, or a
//! schema-checked union. Every strategy takes a [`JoinRequest`] and leaves a
//! [`Job`] in a terminal state carrying either the output or a diagnostic.

pub mod config;
pub mod error;
pub mod hooks;
pub mod join;
pub mod metrics;
pub mod observability;

pub use fedjoin_core::{
    Column, Cursor, DataType, Job, JobId, JobStatus, ResultSet, ResultSetError, ResultShape, Scan,
    SessionId, Value,
};

pub use config::{JoinParams, JoinSettings};
pub use error::{JoinError, JoinResult};
pub use hooks::{fire_after_join, AfterJoinHook, LoggingHook};
pub use join::{
    ColumnSpec, FullOuterJoin, HashJoin, HashJoinMode, InnerHashJoin, JoinImplementation,
    JoinKind, JoinRequest, JoinStats, JoinStrategy, LeftOuterJoin, Side, UnionJoin,
};
