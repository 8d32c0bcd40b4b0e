// SPDX-License-Identifier: Apache-2.0

//! Inner join through the hybrid hash join engine.
//!
//! The left operand is the build side. Composite keys are supported; the
//! output carries every left column followed by every right column.

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
pub struct InnerHashJoin {
    settings: JoinSettings,
}

impl Default for InnerHashJoin {
    /// Default settings with the `FEDJOIN_BLOCK_SIZE` override applied.
    fn default() -> Self {
        Self {
            settings: JoinSettings::from_env(),
        }
    }
}

impl InnerHashJoin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &JoinSettings {
        &self.settings
    }

    fn execute(&self, request: &JoinRequest<'_>) -> Result<ResultSet, Failure> {
        let operands = validate::operands(request)?;
        let keys = validate::key_columns(request, operands)?;

        let mut output = ResultSet::new();
        let stats = HashJoin::new(
            operands.left,
            operands.right,
            &keys.left,
            &keys.right,
            HashJoinMode::Inner,
            self.settings.block_size,
        )?
        .join(&mut output)?;
        debug!(?stats, "inner hash join finished");
        Ok(output)
    }
}

impl JoinImplementation for InnerHashJoin {
    fn kind(&self) -> JoinKind {
        JoinKind::Inner
    }

    fn setup(&mut self, params: &JoinParams) -> Result<(), JoinError> {
        self.settings = JoinSettings::from_params(params)?;
        Ok(())
    }

    #[instrument(skip_all, fields(kind = "inner", session = %session, job = %job.id))]
    fn run<'j>(
        &self,
        session: &SessionId,
        request: &JoinRequest<'_>,
        job: &'j mut Job,
    ) -> JoinResult<&'j mut Job> {
        let started = Instant::now();
        let outcome = self.execute(request);
        finish(JoinKind::Inner, job, outcome, started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fedjoin_core::{Column, DataType, JobStatus, Value};
    use serde_json::json;

    fn people() -> ResultSet {
        ResultSet::from_rows(
            [
                Column::new("id", DataType::Integer),
                Column::new("Name", DataType::String),
            ],
            vec![
                vec![Value::from(1), Value::from("Jeremy")],
                vec![Value::from(2), Value::from("James")],
                vec![Value::from(3), Value::from("Bob")],
            ],
        )
        .unwrap()
    }

    fn ages() -> ResultSet {
        ResultSet::from_rows(
            [
                Column::new("user_id", DataType::Integer),
                Column::new("Age", DataType::Integer),
            ],
            vec![
                vec![Value::from(1), Value::from(20)],
                vec![Value::from(2), Value::from(30)],
                vec![Value::from(5), Value::from(10)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn setup_accepts_empty_params() {
        let mut join = InnerHashJoin::new();
        join.setup(&JoinParams::new()).unwrap();
        assert!(join.settings().block_size > 0);
    }

    #[test]
    fn setup_rejects_zero_block_size() {
        let mut join = InnerHashJoin::new();
        let params = JoinParams::from([("block_size".to_string(), json!(0))]);
        assert!(matches!(
            join.setup(&params),
            Err(JoinError::Configuration { .. })
        ));
    }

    #[test]
    fn run_joins_matching_ids() {
        let (left, right) = (people(), ages());
        let request = JoinRequest::new().left(&left, "id").right(&right, "user_id");
        let mut job = Job::new();

        let job = InnerHashJoin::new()
            .run(&SessionId::new(), &request, &mut job)
            .unwrap();

        assert_eq!(job.status, JobStatus::Complete);
        assert!(job.data.is_before_first());
        let rows: Vec<Vec<Value>> = job.data.scan().map(<[Value]>::to_vec).collect();
        assert_eq!(
            rows,
            vec![
                vec![Value::from(1), Value::from("Jeremy"), Value::from(1), Value::from(20)],
                vec![Value::from(2), Value::from("James"), Value::from(2), Value::from(30)],
            ]
        );
    }

    #[test]
    fn swapped_operands_fail_on_column_lookup() {
        let (left, right) = (people(), ages());
        let request = JoinRequest::new().left(&right, "id").right(&left, "user_id");
        let mut job = Job::new();

        InnerHashJoin::new()
            .run(&SessionId::new(), &request, &mut job)
            .unwrap();

        assert_eq!(job.status, JobStatus::Error);
        assert_eq!(
            job.message.as_deref(),
            Some("LeftColumn : Column 'id' does not exist")
        );
        assert!(job.data.is_empty());
    }
}
