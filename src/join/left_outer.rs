// SPDX-License-Identifier: Apache-2.0

//! Left outer join through the hybrid hash join engine.
//!
//! Every left row appears at least once. A left row with `k` right matches
//! yields `k` rows; a left row without matches yields one row whose right
//! cells are null. The right key columns are not repeated in the output, so
//! the right side's remaining columns start at `left.column_count()`.

use std::time::Instant;

use fedjoin_core::{Job, ResultSet, SessionId};
use tracing::{debug, instrument};

use crate::config::{JoinParams, JoinSettings};
use crate::error::{JoinError, JoinResult};
use crate::join::hash::{HashJoin, HashJoinMode};
use crate::join::request::JoinRequest;
use crate::join::strategy::JoinKind;
use crate::join::traits::JoinImplementation;
use crate::join::{finish, validate, Failure};

#[derive(Debug, Clone)]
pub struct LeftOuterJoin {
    settings: JoinSettings,
}

impl Default for LeftOuterJoin {
    /// Default settings with the `FEDJOIN_BLOCK_SIZE` override applied.
    fn default() -> Self {
        Self {
            settings: JoinSettings::from_env(),
        }
    }
}

impl LeftOuterJoin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &JoinSettings {
        &self.settings
    }

    pub(crate) fn execute(&self, request: &JoinRequest<'_>) -> Result<ResultSet, Failure> {
        let operands = validate::operands(request)?;
        let keys = validate::key_columns(request, operands)?;

        let mut output = ResultSet::new();
        let stats = HashJoin::new(
            operands.left,
            operands.right,
            &keys.left,
            &keys.right,
            HashJoinMode::LeftOuter,
            self.settings.block_size,
        )?
        .join(&mut output)?;
        debug!(?stats, "left outer hash join finished");
        Ok(output)
    }
}

impl JoinImplementation for LeftOuterJoin {
    fn kind(&self) -> JoinKind {
        JoinKind::LeftOuter
    }

    fn setup(&mut self, params: &JoinParams) -> Result<(), JoinError> {
        self.settings = JoinSettings::from_params(params)?;
        Ok(())
    }

    #[instrument(skip_all, fields(kind = "left_outer", session = %session, job = %job.id))]
    fn run<'j>(
        &self,
        session: &SessionId,
        request: &JoinRequest<'_>,
        job: &'j mut Job,
    ) -> JoinResult<&'j mut Job> {
        let started = Instant::now();
        let outcome = self.execute(request);
        finish(JoinKind::LeftOuter, job, outcome, started)
    }
}
