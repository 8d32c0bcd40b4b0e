// SPDX-License-Identifier: Apache-2.0

//! Join strategies and the hash join engine they share.

pub mod full_outer;
pub mod hash;
pub mod inner;
pub mod left_outer;
pub mod request;
pub mod strategy;
pub mod traits;
pub mod union;

mod validate;

pub use full_outer::FullOuterJoin;
pub use hash::{HashJoin, HashJoinMode, JoinStats};
pub use inner::InnerHashJoin;
pub use left_outer::LeftOuterJoin;
pub use request::{ColumnSpec, JoinRequest, Side};
pub use strategy::{JoinKind, JoinStrategy};
pub use traits::JoinImplementation;
pub use union::UnionJoin;

use std::time::Instant;

use fedjoin_core::{Job, ResultSet, ResultSetError};
use tracing::{error, info, warn};

use crate::error::{JoinError, JoinResult};
use crate::metrics;

/// Why a strategy stopped before producing output.
#[derive(Debug)]
pub(crate) enum Failure {
    /// Request or operand problem, reported on the job.
    Rejected(JoinError),
    /// Result set failure, returned to the caller.
    Broken(ResultSetError),
}

impl From<JoinError> for Failure {
    fn from(e: JoinError) -> Self {
        Self::Rejected(e)
    }
}

impl From<ResultSetError> for Failure {
    fn from(e: ResultSetError) -> Self {
        Self::Broken(e)
    }
}

/// Moves `job` to its terminal state and records the run.
pub(crate) fn finish(
    kind: JoinKind,
    job: &mut Job,
    outcome: Result<ResultSet, Failure>,
    started: Instant,
) -> JoinResult<&mut Job> {
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    match outcome {
        Ok(mut data) => {
            data.reset();
            let rows = data.row_count();
            info!(
                kind = %kind,
                rows,
                columns = data.column_count(),
                elapsed_ms,
                "join complete"
            );
            metrics::record_join(kind, elapsed_ms, rows, true);
            job.complete(data);
            Ok(job)
        }
        Err(Failure::Rejected(e)) => {
            warn!(kind = %kind, error = %e, "join rejected");
            metrics::record_join(kind, elapsed_ms, 0, false);
            job.fail(&e);
            Ok(job)
        }
        Err(Failure::Broken(e)) => {
            error!(kind = %kind, error = %e, "join aborted");
            metrics::record_join(kind, elapsed_ms, 0, false);
            job.fail(&e);
            Err(e)
        }
    }
}
