// SPDX-License-Identifier: Apache-2.0

//! Operand and key-column checks shared by every strategy.
//!
//! Order is fixed: both operands are checked for presence first, then the
//! left key columns, then the right ones. The first failure wins.

use fedjoin_core::ResultSet;

use crate::error::JoinError;
use crate::join::request::{JoinRequest, Side};

/// Both operands of a request, known to be present.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Operands<'a> {
    pub left: &'a ResultSet,
    pub right: &'a ResultSet,
}

/// Resolved key column indices of both sides, equal in length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyColumns {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

pub(crate) fn operands<'a>(request: &JoinRequest<'a>) -> Result<Operands<'a>, JoinError> {
    let left = request
        .operand(Side::Left)
        .ok_or_else(|| JoinError::missing_operand(Side::Left))?;
    let right = request
        .operand(Side::Right)
        .ok_or_else(|| JoinError::missing_operand(Side::Right))?;
    Ok(Operands { left, right })
}

/// Resolves the column names of `side` against its operand.
pub(crate) fn key_columns_of(
    request: &JoinRequest<'_>,
    operand: &ResultSet,
    side: Side,
) -> Result<Vec<usize>, JoinError> {
    let spec = request
        .columns(side)
        .filter(|spec| !spec.is_empty())
        .ok_or_else(|| JoinError::column_resolution(side, "no join column given"))?;
    spec.names()
        .map(|name| {
            operand
                .find_column(name)
                .map_err(|e| JoinError::column_resolution(side, e))
        })
        .collect()
}

/// Resolves both sides and checks that they name the same number of columns.
pub(crate) fn key_columns(
    request: &JoinRequest<'_>,
    operands: Operands<'_>,
) -> Result<KeyColumns, JoinError> {
    let left = key_columns_of(request, operands.left, Side::Left)?;
    let right = key_columns_of(request, operands.right, Side::Right)?;
    if left.len() != right.len() {
        return Err(JoinError::column_resolution(
            Side::Right,
            format!(
                "expected {} key column(s) to match the left side, got {}",
                left.len(),
                right.len()
            ),
        ));
    }
    Ok(KeyColumns { left, right })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fedjoin_core::{Column, DataType};
    use crate::join::request::ColumnSpec;

    fn people() -> ResultSet {
        ResultSet::with_columns([
            Column::new("id", DataType::Integer),
            Column::new("Name", DataType::String),
        ])
    }

    #[test]
    fn missing_left_is_reported_before_missing_right() {
        let request = JoinRequest::new();
        let err = operands(&request).unwrap_err();
        assert_eq!(err.to_string(), "LeftResultSet is null");
    }

    #[test]
    fn missing_right_is_reported_when_left_is_present() {
        let left = people();
        let request = JoinRequest::new().left(&left, "id");
        let err = operands(&request).unwrap_err();
        assert_eq!(err.to_string(), "RightResultSet is null");
    }

    #[test]
    fn composite_names_resolve_in_order() {
        let (left, right) = (people(), people());
        let request = JoinRequest::new()
            .left(&left, "Name,id")
            .right(&right, "Name, id");
        let keys = key_columns(&request, operands(&request).unwrap()).unwrap();
        assert_eq!(keys.left, vec![1, 0]);
        assert_eq!(keys.right, vec![1, 0]);
    }

    #[test]
    fn unknown_column_names_the_side() {
        let (left, right) = (people(), people());
        let request = JoinRequest::new().left(&left, "id").right(&right, "user_id");
        let err = key_columns(&request, operands(&request).unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "RightColumn : Column 'user_id' does not exist");
    }

    #[test]
    fn key_arity_must_agree() {
        let (left, right) = (people(), people());
        let request = JoinRequest::new().left(&left, "id,Name").right(&right, "id");
        let err = key_columns(&request, operands(&request).unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("RightColumn : "));
    }

    #[test]
    fn absent_column_spec_is_a_resolution_error() {
        let (left, right) = (people(), people());
        let request = JoinRequest::union(&left, &right);
        let err = key_columns(&request, operands(&request).unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "LeftColumn : no join column given");
    }

    #[test]
    fn empty_column_spec_is_a_resolution_error() {
        let (left, right) = (people(), people());
        let empty: ColumnSpec = serde_json::from_str("[]").unwrap();
        let request = JoinRequest {
            right_columns: Some(empty),
            ..JoinRequest::new().left(&left, "id").right(&right, "id")
        };
        let err = key_columns(&request, operands(&request).unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "RightColumn : no join column given");
    }
}
