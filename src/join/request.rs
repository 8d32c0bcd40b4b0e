// SPDX-License-Identifier: Apache-2.0

//! Join request: the two operands and the columns to match them on.

use std::fmt;

use compact_str::CompactString;
use fedjoin_core::ResultSet;
use serde::{Deserialize, Serialize};

/// Operand role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("Left"),
            Self::Right => f.write_str("Right"),
        }
    }
}

/// Ordered list of column names forming a (possibly composite) join key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec(Vec<CompactString>);

impl ColumnSpec {
    /// Parses `"id"` or `"first, last"`. Each name is trimmed; empty
    /// segments are kept so that they fail column resolution by name.
    pub fn parse(spec: &str) -> Self {
        Self(spec.split(',').map(|s| CompactString::from(s.trim())).collect())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_composite(&self) -> bool {
        self.0.len() > 1
    }
}

impl From<&str> for ColumnSpec {
    fn from(spec: &str) -> Self {
        Self::parse(spec)
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for name in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

/// Operands and matching columns for one join.
///
/// Operands are borrowed for the duration of the run; either may be absent,
/// which every strategy reports as an error job.
#[derive(Debug, Clone, Default)]
pub struct JoinRequest<'a> {
    pub left: Option<&'a ResultSet>,
    pub right: Option<&'a ResultSet>,
    pub left_columns: Option<ColumnSpec>,
    pub right_columns: Option<ColumnSpec>,
}

impl<'a> JoinRequest<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request for a union, which matches no columns.
    pub fn union(left: &'a ResultSet, right: &'a ResultSet) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
            ..Self::default()
        }
    }

    pub fn left(mut self, result_set: &'a ResultSet, columns: impl Into<ColumnSpec>) -> Self {
        self.left = Some(result_set);
        self.left_columns = Some(columns.into());
        self
    }

    pub fn right(mut self, result_set: &'a ResultSet, columns: impl Into<ColumnSpec>) -> Self {
        self.right = Some(result_set);
        self.right_columns = Some(columns.into());
        self
    }

    pub fn operand(&self, side: Side) -> Option<&'a ResultSet> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn columns(&self, side: Side) -> Option<&ColumnSpec> {
        match side {
            Side::Left => self.left_columns.as_ref(),
            Side::Right => self.right_columns.as_ref(),
        }
    }
}
