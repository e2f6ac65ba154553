//! Ingestion counters, reported through tracing

use std::sync::atomic::{AtomicU64, Ordering};

use crate::ledger::TrimPlan;

/// Counters for a single tail session
#[derive(Debug, Default)]
pub struct TailMetrics {
    lines_appended: AtomicU64,
    bytes_appended: AtomicU64,
    trim_passes: AtomicU64,
    lines_trimmed: AtomicU64,
    bytes_trimmed: AtomicU64,
}

impl TailMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_appended(&self, bytes: u64) {
        self.lines_appended.fetch_add(1, Ordering::Relaxed);
        self.bytes_appended.fetch_add(bytes, Ordering::Relaxed);
        tracing::trace!(counter = "lines_appended", bytes, "Metric incremented");
    }

    pub fn trimmed(&self, plan: &TrimPlan) {
        self.trim_passes.fetch_add(1, Ordering::Relaxed);
        self.lines_trimmed.fetch_add(plan.lines as u64, Ordering::Relaxed);
        self.bytes_trimmed.fetch_add(plan.bytes, Ordering::Relaxed);
        tracing::debug!(
            counter = "trim_passes",
            lines = plan.lines,
            bytes = plan.bytes,
            "Metric incremented"
        );
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_appended: self.lines_appended.load(Ordering::Relaxed),
            bytes_appended: self.bytes_appended.load(Ordering::Relaxed),
            trim_passes: self.trim_passes.load(Ordering::Relaxed),
            lines_trimmed: self.lines_trimmed.load(Ordering::Relaxed),
            bytes_trimmed: self.bytes_trimmed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub lines_appended: u64,
    pub bytes_appended: u64,
    pub trim_passes: u64,
    pub lines_trimmed: u64,
    pub bytes_trimmed: u64,
}
