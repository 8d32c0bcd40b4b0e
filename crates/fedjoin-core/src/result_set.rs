// SPDX-License-Identifier: Apache-2.0

//! In-memory tabular result set with a single cursor.
//!
//! Two ways to read rows:
//! - the cursor API (`reset` / `advance` / `cell`), owned by the result set
//!   and used to build output row by row;
//! - [`ResultSet::scan`], an index-based iterator that borrows the rows
//!   immutably. Scans never touch the cursor, so any number of them can run
//!   over the same operand at once.

use serde::{Deserialize, Serialize};

use crate::error::{ResultSetError, ResultSetResult};
use crate::types::{Column, Value};

/// Cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    BeforeFirst,
    OnRow(usize),
    AfterLast,
}

/// Ordered rows under a shared schema.
///
/// Every row holds exactly `column_count()` cells. Deserialization goes
/// through [`ResultSet::from_rows`], so ragged input is rejected and column
/// positions are reassigned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawResultSet")]
pub struct ResultSet {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
    #[serde(skip)]
    cursor: Cursor,
}

/// Wire form of a [`ResultSet`], checked before use.
#[derive(Deserialize)]
struct RawResultSet {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl TryFrom<RawResultSet> for ResultSet {
    type Error = ResultSetError;

    fn try_from(raw: RawResultSet) -> ResultSetResult<Self> {
        Self::from_rows(raw.columns, raw.rows)
    }
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty result set with the given schema.
    pub fn with_columns(columns: impl IntoIterator<Item = Column>) -> Self {
        let mut rs = Self::new();
        for column in columns {
            rs.push_column(column);
        }
        rs
    }

    /// Creates a result set from a schema and complete rows.
    pub fn from_rows(
        columns: impl IntoIterator<Item = Column>,
        rows: impl IntoIterator<Item = Vec<Value>>,
    ) -> ResultSetResult<Self> {
        let mut rs = Self::with_columns(columns);
        let expected = rs.column_count();
        for row in rows {
            if row.len() != expected {
                return Err(ResultSetError::RowWidth {
                    expected,
                    actual: row.len(),
                });
            }
            rs.rows
                .try_reserve(1)
                .map_err(|e| ResultSetError::allocation(e.to_string()))?;
            rs.rows.push(row);
        }
        Ok(rs)
    }

    // ==================== Cursor ====================

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Moves the cursor before the first row.
    pub fn reset(&mut self) {
        self.cursor = Cursor::BeforeFirst;
    }

    /// Moves to the next row and reports whether one exists.
    ///
    /// Once past the end the cursor stays after-last and every further call
    /// returns `false`.
    pub fn advance(&mut self) -> bool {
        let next = match self.cursor {
            Cursor::BeforeFirst => 0,
            Cursor::OnRow(i) => i + 1,
            Cursor::AfterLast => return false,
        };
        if next < self.rows.len() {
            self.cursor = Cursor::OnRow(next);
            true
        } else {
            self.cursor = Cursor::AfterLast;
            false
        }
    }

    pub fn is_before_first(&self) -> bool {
        self.cursor == Cursor::BeforeFirst
    }

    pub fn is_after_last(&self) -> bool {
        self.cursor == Cursor::AfterLast
    }

    /// Reads a cell of the current row.
    pub fn cell(&self, index: usize) -> ResultSetResult<&Value> {
        let row = self.current_row()?;
        self.check_column(index)?;
        Ok(&self.rows[row][index])
    }

    /// Writes a cell of the current row.
    pub fn set_cell(&mut self, index: usize, value: impl Into<Value>) -> ResultSetResult<()> {
        let row = self.current_row()?;
        self.check_column(index)?;
        self.rows[row][index] = value.into();
        Ok(())
    }

    fn current_row(&self) -> ResultSetResult<usize> {
        match self.cursor {
            Cursor::OnRow(i) => Ok(i),
            _ => Err(ResultSetError::NoCurrentRow),
        }
    }

    // ==================== Schema ====================

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, index: usize) -> ResultSetResult<&Column> {
        self.check_column(index)?;
        Ok(&self.columns[index])
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the index of the first column named `name`.
    pub fn find_column(&self, name: &str) -> ResultSetResult<usize> {
        self.columns
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| ResultSetError::column_not_found(name))
    }

    /// Appends a column and back-fills every existing row with `Null`.
    ///
    /// Returns the position assigned to the new column.
    pub fn append_column(&mut self, column: Column) -> ResultSetResult<usize> {
        for row in &mut self.rows {
            row.try_reserve(1)
                .map_err(|e| ResultSetError::allocation(e.to_string()))?;
            row.push(Value::Null);
        }
        self.columns
            .try_reserve(1)
            .map_err(|e| ResultSetError::allocation(e.to_string()))?;
        Ok(self.push_column(column))
    }

    fn push_column(&mut self, column: Column) -> usize {
        let position = self.columns.len();
        self.columns.push(column.at_position(position));
        position
    }

    fn check_column(&self, index: usize) -> ResultSetResult<()> {
        if index < self.columns.len() {
            Ok(())
        } else {
            Err(ResultSetError::ColumnOutOfBounds {
                index,
                count: self.columns.len(),
            })
        }
    }

    // ==================== Rows ====================

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row of `Null` cells and moves the cursor onto it.
    pub fn append_row(&mut self) -> ResultSetResult<()> {
        let mut row = Vec::new();
        row.try_reserve_exact(self.columns.len())
            .map_err(|e| ResultSetError::allocation(e.to_string()))?;
        row.resize(self.columns.len(), Value::Null);
        self.rows
            .try_reserve(1)
            .map_err(|e| ResultSetError::allocation(e.to_string()))?;
        self.rows.push(row);
        self.cursor = Cursor::OnRow(self.rows.len() - 1);
        Ok(())
    }

    /// Returns the cells of row `index`, independent of the cursor.
    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Starts an independent forward pass over all rows.
    pub fn scan(&self) -> Scan<'_> {
        Scan {
            rows: &self.rows,
            next: 0,
        }
    }

    /// Starts an independent pass over rows `start..end` (clamped to the row count).
    pub fn scan_range(&self, start: usize, end: usize) -> Scan<'_> {
        let end = end.min(self.rows.len());
        let start = start.min(end);
        Scan {
            rows: &self.rows[..end],
            next: start,
        }
    }
}

/// Index-based iterator over the rows of a [`ResultSet`].
#[derive(Debug, Clone)]
pub struct Scan<'a> {
    rows: &'a [Vec<Value>],
    next: usize,
}

impl<'a> Iterator for Scan<'a> {
    type Item = &'a [Value];

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.get(self.next)?;
        self.next += 1;
        Some(row.as_slice())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rows.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Scan<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn users() -> ResultSet {
        ResultSet::from_rows(
            vec![
                Column::new("id", DataType::Integer),
                Column::new("Name", DataType::String),
            ],
            vec![
                vec![Value::from(1), Value::from("Jeremy")],
                vec![Value::from(2), Value::from("James")],
                vec![Value::from(3), Value::from("Bob")],
            ],
        )
        .expect("valid rows")
    }

    fn collect_with_cursor(rs: &mut ResultSet) -> Vec<Value> {
        let mut seen = Vec::new();
        rs.reset();
        while rs.advance() {
            seen.push(rs.cell(0).expect("on row").clone());
        }
        seen
    }

    #[test]
    fn advance_past_end_keeps_returning_false() {
        let mut rs = users();
        while rs.advance() {}
        for _ in 0..5 {
            assert!(!rs.advance());
        }
        assert!(rs.is_after_last());
        assert_eq!(rs.cell(0), Err(ResultSetError::NoCurrentRow));
    }

    #[test]
    fn reset_replays_the_same_sequence() {
        let mut rs = users();
        let first = collect_with_cursor(&mut rs);
        let second = collect_with_cursor(&mut rs);
        assert_eq!(first, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(first, second);
    }

    #[test]
    fn cell_access_requires_a_current_row() {
        let mut rs = users();
        assert_eq!(rs.cell(0), Err(ResultSetError::NoCurrentRow));
        assert_eq!(
            rs.set_cell(0, 9),
            Err(ResultSetError::NoCurrentRow)
        );
        assert!(rs.advance());
        assert_eq!(
            rs.cell(5),
            Err(ResultSetError::ColumnOutOfBounds { index: 5, count: 2 })
        );
    }

    #[test]
    fn find_column_returns_first_match() {
        let mut rs = users();
        rs.append_column(Column::new("id", DataType::Long)).unwrap();
        assert_eq!(rs.find_column("id"), Ok(0));
        assert_eq!(rs.find_column("Name"), Ok(1));
        assert_eq!(
            rs.find_column("name"),
            Err(ResultSetError::column_not_found("name"))
        );
    }

    #[test]
    fn append_column_backfills_existing_rows() {
        let mut rs = users();
        let position = rs.append_column(Column::new("Age", DataType::Integer)).unwrap();
        assert_eq!(position, 2);
        assert_eq!(rs.column(2).unwrap().position(), 2);
        for row in rs.scan() {
            assert_eq!(row.len(), 3);
            assert!(row[2].is_null());
        }
    }

    #[test]
    fn append_row_positions_cursor_on_new_null_row() {
        let mut rs = users();
        rs.append_row().unwrap();
        assert_eq!(rs.cursor(), Cursor::OnRow(3));
        assert!(rs.cell(1).unwrap().is_null());
        rs.set_cell(1, "Alice").unwrap();
        assert_eq!(rs.row(3).unwrap()[1], Value::from("Alice"));
        assert_eq!(rs.row_count(), 4);
    }

    #[test]
    fn scans_are_independent_of_the_cursor_and_each_other() {
        let mut rs = users();
        rs.advance();
        let mut outer = rs.scan();
        let first = outer.next().unwrap();
        let inner_count = rs.scan().count();
        assert_eq!(first[0], Value::Int(1));
        assert_eq!(inner_count, 3);
        assert_eq!(outer.len(), 2);
        assert_eq!(rs.cursor(), Cursor::OnRow(0));
    }

    #[test]
    fn scan_range_is_clamped() {
        let rs = users();
        let ids: Vec<_> = rs.scan_range(1, 10).map(|r| r[0].clone()).collect();
        assert_eq!(ids, vec![Value::Int(2), Value::Int(3)]);
        assert_eq!(rs.scan_range(5, 10).count(), 0);
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let err = ResultSet::from_rows(
            vec![Column::new("id", DataType::Integer)],
            vec![vec![Value::from(1), Value::from(2)]],
        )
        .unwrap_err();
        assert_eq!(err, ResultSetError::RowWidth { expected: 1, actual: 2 });
    }

    #[test]
    fn serialization_drops_the_cursor() {
        let mut rs = users();
        rs.advance();
        let json = serde_json::to_string(&rs).unwrap();
        let restored: ResultSet = serde_json::from_str(&json).unwrap();
        assert!(restored.is_before_first());
        assert_eq!(restored.row_count(), 3);
        assert_eq!(restored.column(1).unwrap().name(), "Name");
        assert_eq!(restored.column(1).unwrap().position(), 1);
    }

    #[test]
    fn deserializing_ragged_rows_fails() {
        let json = r#"{
            "columns": [
                {"name": "id", "data_type": "INTEGER"},
                {"name": "x", "data_type": "INTEGER"}
            ],
            "rows": [[1]]
        }"#;
        let err = serde_json::from_str::<ResultSet>(json).unwrap_err();
        assert!(err.to_string().contains("schema has 2 columns"), "{err}");
    }

    #[test]
    fn deserializing_reassigns_column_positions() {
        let json = r#"{
            "columns": [
                {"name": "id", "data_type": "INTEGER", "position": 7},
                {"name": "Name", "data_type": "STRING"}
            ],
            "rows": [[1, "Jeremy"]]
        }"#;
        let rs: ResultSet = serde_json::from_str(json).unwrap();
        let positions: Vec<usize> = rs.columns().iter().map(Column::position).collect();
        assert_eq!(positions, vec![0, 1]);
        assert_eq!(rs.row(0).unwrap()[1], Value::from("Jeremy"));
    }
}
