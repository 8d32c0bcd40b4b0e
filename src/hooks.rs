// SPDX-License-Identifier: Apache-2.0

//! Post-join hooks.
//!
//! Hooks consume a job after a strategy has run, e.g. to archive the output
//! to durable storage. They fire only for jobs whose status is exactly
//! `Complete`; error jobs are never handed to a hook.

use fedjoin_core::{Job, JobStatus, SessionId};
use tracing::{info, warn};

pub trait AfterJoinHook: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Handles a completed job. Errors are logged and do not affect the job status.
    fn fire(&self, session: &SessionId, job: &mut Job) -> Result<(), String>;
}

/// Fires every hook in order if `job` completed. Returns how many hooks ran successfully.
pub fn fire_after_join(hooks: &[Box<dyn AfterJoinHook>], session: &SessionId, job: &mut Job) -> usize {
    if job.status != JobStatus::Complete {
        return 0;
    }
    let mut succeeded = 0;
    for hook in hooks {
        match hook.fire(session, job) {
            Ok(()) => succeeded += 1,
            Err(e) => warn!(hook = hook.name(), job = %job.id, "After-join hook failed: {}", e),
        }
    }
    succeeded
}

/// Logs the shape of each completed job.
#[derive(Debug, Default)]
pub struct LoggingHook;

impl AfterJoinHook for LoggingHook {
    fn name(&self) -> &str {
        "logging"
    }

    fn fire(&self, session: &SessionId, job: &mut Job) -> Result<(), String> {
        info!(
            session = %session,
            job = %job.id,
            rows = job.data.row_count(),
            columns = job.data.column_count(),
            "Join output ready"
        );
        Ok(())
    }
}
