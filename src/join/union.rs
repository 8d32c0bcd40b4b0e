// SPDX-License-Identifier: Apache-2.0

//! Schema-checked concatenation of two result sets.
//!
//! Both operands must agree on column count and, position by position, on
//! column name (case-sensitive) and data type. The output takes the right
//! operand's column descriptors and holds every left row followed by every
//! right row.

use std::time::Instant;

use fedjoin_core::{Job, ResultSet, SessionId};
use tracing::{debug, instrument};

use crate::config::JoinParams;
use crate::error::{JoinError, JoinResult};
use crate::join::request::JoinRequest;
use crate::join::strategy::JoinKind;
use crate::join::traits::JoinImplementation;
use crate::join::{finish, validate, Failure};

#[derive(Debug, Clone, Default)]
pub struct UnionJoin;

impl UnionJoin {
    pub fn new() -> Self {
        Self
    }

    fn execute(&self, request: &JoinRequest<'_>) -> Result<ResultSet, Failure> {
        let operands = validate::operands(request)?;
        let (left, right) = (operands.left, operands.right);
        check_schemas(left, right)?;

        let mut output = ResultSet::with_columns(right.columns().iter().cloned());
        for operand in [left, right] {
            for row in operand.scan() {
                output.append_row()?;
                for (i, value) in row.iter().enumerate() {
                    output.set_cell(i, value.clone())?;
                }
            }
        }

        debug!(
            left_rows = left.row_count(),
            right_rows = right.row_count(),
            "union finished"
        );
        Ok(output)
    }
}

fn check_schemas(left: &ResultSet, right: &ResultSet) -> Result<(), JoinError> {
    if left.column_count() != right.column_count() {
        return Err(JoinError::schema_mismatch(format!(
            "Result sets have unequal number of columns: left has {}, right has {}",
            left.column_count(),
            right.column_count()
        )));
    }
    for (l, r) in left.columns().iter().zip(right.columns()) {
        if l.name() != r.name() || l.data_type() != r.data_type() {
            return Err(JoinError::schema_mismatch(format!(
                "Left Column {l} is not equal to Right Column {r}"
            )));
        }
    }
    Ok(())
}

impl JoinImplementation for UnionJoin {
    fn kind(&self) -> JoinKind {
        JoinKind::Union
    }

    /// Union takes no settings; any parameters are ignored.
    fn setup(&mut self, _params: &JoinParams) -> Result<(), JoinError> {
        Ok(())
    }

    #[instrument(skip_all, fields(kind = "union", session = %session, job = %job.id))]
    fn run<'j>(
        &self,
        session: &SessionId,
        request: &JoinRequest<'_>,
        job: &'j mut Job,
    ) -> JoinResult<&'j mut Job> {
        let started = Instant::now();
        let outcome = self.execute(request);
        finish(JoinKind::Union, job, outcome, started)
    }
}
