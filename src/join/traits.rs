// SPDX-License-Identifier: Apache-2.0

//! JoinImplementation trait definition
//!
//! Every join strategy implements this trait. The caller configures a
//! strategy once with `setup`, then calls `run` with a request and a job;
//! the job comes back in a terminal state.

use fedjoin_core::{Job, ResultShape, SessionId};

use crate::config::JoinParams;
use crate::error::{JoinError, JoinResult};
use crate::join::request::JoinRequest;
use crate::join::strategy::JoinKind;

pub trait JoinImplementation {
    /// Returns which join this strategy performs
    fn kind(&self) -> JoinKind;

    /// Applies strategy settings (e.g. `block_size`)
    ///
    /// Call once before `run`. A strategy that was never set up runs with
    /// default settings.
    fn setup(&mut self, params: &JoinParams) -> Result<(), JoinError>;

    /// Executes the join and leaves `job` in a terminal state
    ///
    /// Problems with the request or the operands' data (missing operand,
    /// unknown column, schema mismatch) become an `Error` status with a
    /// message. Only a failure of the result set itself, such as running out
    /// of memory while appending, is returned as `Err`.
    fn run<'j>(
        &self,
        session: &SessionId,
        request: &JoinRequest<'_>,
        job: &'j mut Job,
    ) -> JoinResult<&'j mut Job>;

    /// Returns the job as left by `run`
    fn results<'j>(&self, job: &'j Job) -> &'j Job {
        job
    }

    /// Shape of the data placed on a completed job
    fn declared_result_shape(&self) -> ResultShape {
        ResultShape::Tabular
    }
}
