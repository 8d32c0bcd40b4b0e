// SPDX-License-Identifier: Apache-2.0

//! Full outer join, composed from [`LeftOuterJoin`].
//!
//! The left outer join supplies every left row and all matches. A second
//! pass appends each right row whose key value appears nowhere on the left:
//! the key goes into the left key column, the right's other columns go after
//! the left block, and the remaining left cells stay null.
//!
//! Only single-column keys are supported here, unlike the inner and left
//! outer joins which accept composite keys.

use std::collections::HashSet;
use std::time::Instant;

use fedjoin_core::{Job, ResultSet, SessionId, Value};
use tracing::{debug, instrument};

use crate::config::JoinParams;
use crate::error::{JoinError, JoinResult};
use crate::join::left_outer::LeftOuterJoin;
use crate::join::request::{JoinRequest, Side};
use crate::join::strategy::JoinKind;
use crate::join::traits::JoinImplementation;
use crate::join::{finish, validate, Failure};

#[derive(Debug, Clone, Default)]
pub struct FullOuterJoin {
    left_outer: LeftOuterJoin,
}

impl FullOuterJoin {
    pub fn new() -> Self {
        Self::default()
    }

    fn execute(&self, request: &JoinRequest<'_>) -> Result<ResultSet, Failure> {
        let operands = validate::operands(request)?;
        let keys = validate::key_columns(request, operands)?;
        if keys.left.len() != 1 {
            return Err(JoinError::column_resolution(
                Side::Left,
                format!(
                    "full outer join takes a single key column, got {}",
                    keys.left.len()
                ),
            )
            .into());
        }
        let (left_key, right_key) = (keys.left[0], keys.right[0]);

        let mut output = self.left_outer.execute(request)?;
        let base = operands.left.column_count();

        let left_values: HashSet<&Value> = operands.left.scan().map(|row| &row[left_key]).collect();
        let right_columns: Vec<usize> = (0..operands.right.column_count())
            .filter(|&i| i != right_key)
            .collect();

        let mut right_only = 0usize;
        for row in operands.right.scan() {
            let key = &row[right_key];
            if left_values.contains(key) {
                continue;
            }
            output.append_row()?;
            output.set_cell(left_key, key.clone())?;
            for (j, &c) in right_columns.iter().enumerate() {
                output.set_cell(base + j, row[c].clone())?;
            }
            right_only += 1;
        }

        debug!(right_only, "full outer join appended unmatched right rows");
        Ok(output)
    }
}

impl JoinImplementation for FullOuterJoin {
    fn kind(&self) -> JoinKind {
        JoinKind::FullOuter
    }

    fn setup(&mut self, params: &JoinParams) -> Result<(), JoinError> {
        self.left_outer.setup(params)
    }

    #[instrument(skip_all, fields(kind = "full_outer", session = %session, job = %job.id))]
    fn run<'j>(
        &self,
        session: &SessionId,
        request: &JoinRequest<'_>,
        job: &'j mut Job,
    ) -> JoinResult<&'j mut Job> {
        let started = Instant::now();
        let outcome = self.execute(request);
        finish(JoinKind::FullOuter, job, outcome, started)
    }
}
