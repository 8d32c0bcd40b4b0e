// SPDX-License-Identifier: Apache-2.0

//! Execution envelope returned by every join strategy.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::result_set::ResultSet;

/// Unique identifier for a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for the caller's session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Job lifecycle status.
///
/// `Complete` and `Error` are terminal; a join run always ends in one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Created,
    Running,
    Complete,
    Error,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }
}

/// Shape of the data a strategy produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ResultShape {
    Tabular,
}

/// Status, diagnostic, and data of one execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    /// Set only when `status` is `Error`
    pub message: Option<String>,
    pub data: ResultSet,
}

impl Job {
    pub fn new() -> Self {
        Self::with_data(ResultSet::new())
    }

    pub fn with_data(data: ResultSet) -> Self {
        Self {
            id: JobId::new(),
            status: JobStatus::Created,
            message: None,
            data,
        }
    }

    /// Marks the job failed with a diagnostic; `data` is left untouched.
    pub fn fail(&mut self, error: impl fmt::Display) {
        self.status = JobStatus::Error;
        self.message = Some(error.to_string());
    }

    /// Marks the job complete and replaces its data.
    pub fn complete(&mut self, data: ResultSet) {
        self.status = JobStatus::Complete;
        self.message = None;
        self.data = data;
    }

    pub fn is_complete(&self) -> bool {
        self.status == JobStatus::Complete
    }
}

impl Default for Job {
    fn default() -> Self {
        Self::new()
    }
}
