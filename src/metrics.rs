// SPDX-License-Identifier: Apache-2.0

//! Lightweight in-memory join metrics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use serde::Serialize;

use crate::join::strategy::JoinKind;

#[derive(Default)]
struct JoinMetrics {
    total: AtomicU64,
    failed: AtomicU64,
    by_kind: [AtomicU64; 4],
    rows_total: AtomicU64,
    duration_total_ms: AtomicU64,
    duration_max_ms: AtomicU64,
}

static JOIN_METRICS: OnceLock<JoinMetrics> = OnceLock::new();

fn metrics() -> &'static JoinMetrics {
    JOIN_METRICS.get_or_init(JoinMetrics::default)
}

pub fn record_join(kind: JoinKind, duration_ms: f64, output_rows: usize, success: bool) {
    let duration_ms = duration_ms.max(0.0) as u64;
    let metrics = metrics();
    metrics.total.fetch_add(1, Ordering::Relaxed);
    metrics.by_kind[kind.index()].fetch_add(1, Ordering::Relaxed);
    if success {
        metrics
            .rows_total
            .fetch_add(output_rows as u64, Ordering::Relaxed);
    } else {
        metrics.failed.fetch_add(1, Ordering::Relaxed);
    }
    metrics
        .duration_total_ms
        .fetch_add(duration_ms, Ordering::Relaxed);
    metrics
        .duration_max_ms
        .fetch_max(duration_ms, Ordering::Relaxed);
}

#[derive(Debug, Serialize)]
pub struct JoinMetricsSnapshot {
    pub total: u64,
    pub failed: u64,
    pub inner: u64,
    pub left_outer: u64,
    pub full_outer: u64,
    pub union: u64,
    pub rows_total: u64,
    pub avg_ms: Option<f64>,
    pub max_ms: Option<u64>,
}

pub fn snapshot() -> JoinMetricsSnapshot {
    let metrics = metrics();
    let total = metrics.total.load(Ordering::Relaxed);
    let failed = metrics.failed.load(Ordering::Relaxed);
    let by_kind = |kind: JoinKind| metrics.by_kind[kind.index()].load(Ordering::Relaxed);
    let duration_total = metrics.duration_total_ms.load(Ordering::Relaxed);
    let max_ms = metrics.duration_max_ms.load(Ordering::Relaxed);

    let avg_ms = (total > 0).then(|| duration_total as f64 / total as f64);

    JoinMetricsSnapshot {
        total,
        failed,
        inner: by_kind(JoinKind::Inner),
        left_outer: by_kind(JoinKind::LeftOuter),
        full_outer: by_kind(JoinKind::FullOuter),
        union: by_kind(JoinKind::Union),
        rows_total: metrics.rows_total.load(Ordering::Relaxed),
        avg_ms,
        max_ms: (total > 0).then_some(max_ms),
    }
}
