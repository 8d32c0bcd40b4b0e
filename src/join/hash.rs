// SPDX-License-Identifier: Apache-2.0

//! Hybrid hash join engine
//!
//! The build side is cut into blocks of at most `block_size` rows. For each
//! block an in-memory table from composite key to build rows is built, then
//! the probe side is scanned once against it. Peak memory is bounded by the
//! block size, not by the build side's total size.
//!
//! Output layout is every build column followed by the probe columns. Inner
//! mode keeps every probe column; left-outer mode drops the probe key
//! columns, so the probe's non-key columns start at `build.column_count()`.

use std::collections::HashMap;

use fedjoin_core::{ResultSet, ResultSetError, Value};
use tracing::debug;

use crate::error::JoinResult;

/// Which rows the engine emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashJoinMode {
    /// Only (build, probe) pairs with equal keys.
    Inner,
    /// Matched pairs, plus every unmatched build row padded with nulls.
    LeftOuter,
}

/// Counters for one engine run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub blocks: usize,
    pub build_rows: usize,
    pub probe_rows: usize,
    pub output_rows: usize,
}

/// Composite key borrowed from a row; compared element-wise in key order.
pub(crate) type KeyRef<'a> = Vec<&'a Value>;

pub(crate) fn key_of<'a>(row: &'a [Value], key_columns: &[usize]) -> KeyRef<'a> {
    key_columns.iter().map(|&i| &row[i]).collect()
}

/// One engine invocation over borrowed operands.
#[derive(Debug)]
pub struct HashJoin<'a> {
    build: &'a ResultSet,
    probe: &'a ResultSet,
    build_keys: &'a [usize],
    probe_keys: &'a [usize],
    mode: HashJoinMode,
    block_size: usize,
}

impl<'a> HashJoin<'a> {
    /// Key indices must address existing columns of their side.
    pub fn new(
        build: &'a ResultSet,
        probe: &'a ResultSet,
        build_keys: &'a [usize],
        probe_keys: &'a [usize],
        mode: HashJoinMode,
        block_size: usize,
    ) -> JoinResult<Self> {
        check_keys(build, build_keys)?;
        check_keys(probe, probe_keys)?;
        Ok(Self {
            build,
            probe,
            build_keys,
            probe_keys,
            mode,
            block_size: block_size.max(1),
        })
    }

    /// Probe column indices copied into the output, in order.
    fn probe_columns(&self) -> Vec<usize> {
        let all = 0..self.probe.column_count();
        match self.mode {
            HashJoinMode::Inner => all.collect(),
            HashJoinMode::LeftOuter => all.filter(|i| !self.probe_keys.contains(i)).collect(),
        }
    }

    /// Appends the joined schema and rows to `output`.
    pub fn join(&self, output: &mut ResultSet) -> JoinResult<JoinStats> {
        let base = output.column_count();
        for column in self.build.columns() {
            output.append_column(column.clone())?;
        }
        let probe_columns = self.probe_columns();
        for &i in &probe_columns {
            output.append_column(self.probe.column(i)?.clone())?;
        }

        let emitter = Emitter {
            base,
            probe_base: base + self.build.column_count(),
            probe_columns: &probe_columns,
        };

        let total = self.build.row_count();
        let rows_before = output.row_count();
        let mut stats = JoinStats {
            build_rows: total,
            probe_rows: self.probe.row_count(),
            ..JoinStats::default()
        };

        let mut start = 0;
        while start < total {
            let end = total.min(start + self.block_size);
            let emitted = self.join_block(start, end, &emitter, output)?;
            debug!(
                block = stats.blocks,
                start,
                end,
                emitted,
                "hash join block finished"
            );
            stats.blocks += 1;
            start = end;
        }

        stats.output_rows = output.row_count() - rows_before;
        Ok(stats)
    }

    fn join_block(
        &self,
        start: usize,
        end: usize,
        emitter: &Emitter<'_>,
        output: &mut ResultSet,
    ) -> JoinResult<usize> {
        let block: Vec<&'a [Value]> = self.build.scan_range(start, end).collect();

        let mut table: HashMap<KeyRef<'a>, Vec<usize>> = HashMap::with_capacity(block.len());
        for (offset, &row) in block.iter().enumerate() {
            table
                .entry(key_of(row, self.build_keys))
                .or_default()
                .push(offset);
        }

        let mut matched = match self.mode {
            HashJoinMode::Inner => Vec::new(),
            HashJoinMode::LeftOuter => vec![false; block.len()],
        };
        let mut emitted = 0;

        for probe_row in self.probe.scan() {
            let key = key_of(probe_row, self.probe_keys);
            let Some(offsets) = table.get(&key) else {
                continue;
            };
            for &offset in offsets {
                if let Some(flag) = matched.get_mut(offset) {
                    *flag = true;
                }
                emitter.emit(output, block[offset], Some(probe_row))?;
                emitted += 1;
            }
        }

        if self.mode == HashJoinMode::LeftOuter {
            for (offset, was_matched) in matched.iter().enumerate() {
                if !was_matched {
                    emitter.emit(output, block[offset], None)?;
                    emitted += 1;
                }
            }
        }

        Ok(emitted)
    }
}

fn check_keys(rs: &ResultSet, keys: &[usize]) -> JoinResult<()> {
    match keys.iter().find(|&&i| i >= rs.column_count()) {
        Some(&index) => Err(ResultSetError::ColumnOutOfBounds {
            index,
            count: rs.column_count(),
        }),
        None => Ok(()),
    }
}

/// Writes one output row per call.
struct Emitter<'p> {
    base: usize,
    probe_base: usize,
    probe_columns: &'p [usize],
}

impl Emitter<'_> {
    fn emit(
        &self,
        output: &mut ResultSet,
        build_row: &[Value],
        probe_row: Option<&[Value]>,
    ) -> JoinResult<()> {
        output.append_row()?;
        for (i, value) in build_row.iter().enumerate() {
            output.set_cell(self.base + i, value.clone())?;
        }
        if let Some(probe_row) = probe_row {
            for (j, &c) in self.probe_columns.iter().enumerate() {
                output.set_cell(self.probe_base + j, probe_row[c].clone())?;
            }
        }
        Ok(())
    }
}
