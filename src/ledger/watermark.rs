//! Hysteresis trimming: once a ceiling is crossed, discard the oldest lines
//! until the dimension is back at its floor.

use super::error::{LedgerError, Result};
use super::sizes::LineLedger;

/// Ceiling and floor for one dimension (bytes or lines)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watermark {
    max: u64,
    min: u64,
}

impl Watermark {
    /// `min` defaults to `max`, which trims tightly to the ceiling.
    pub fn new(min: Option<u64>, max: u64) -> Result<Self> {
        let min = min.unwrap_or(max);
        if min > max {
            return Err(LedgerError::InvertedWatermark { min, max });
        }
        Ok(Self { max, min })
    }

    pub fn ceiling(max: u64) -> Self {
        Self { max, min: max }
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn min(&self) -> u64 {
        self.min
    }
}

/// Limits enforced on the log file. An unset dimension is never trimmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub bytes: Option<Watermark>,
    pub lines: Option<Watermark>,
}

/// Oldest lines to discard before the next append
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimPlan {
    pub lines: usize,
    pub bytes: u64,
}

impl TrimPlan {
    pub fn is_empty(&self) -> bool {
        self.bytes == 0
    }
}

/// Work out what to discard so that a line of `incoming` bytes fits.
///
/// `incoming == 0` is the settle pass over a freshly replayed file: no line is
/// pending, so a file already within its bounds is left alone.
///
/// The line pass runs first. The byte pass then continues from the first line
/// the line pass kept, so the two passes share their counters and never count
/// a line twice.
pub fn plan(ledger: &LineLedger, incoming: u64, bounds: &Bounds) -> TrimPlan {
    let pending_lines = u64::from(incoming > 0);
    let current_lines = ledger.lines() as u64;
    let current_bytes = ledger.bytes();

    let mut sizes = ledger.iter();
    let mut trim = TrimPlan::default();

    if let Some(lines) = bounds.lines {
        if current_lines + pending_lines > lines.max {
            while current_lines + pending_lines - trim.lines as u64 > lines.min {
                let Some(size) = sizes.next() else { break };
                trim.lines += 1;
                trim.bytes += size;
            }
        }
    }

    if let Some(bytes) = bounds.bytes {
        if current_bytes + incoming - trim.bytes > bytes.max {
            while current_bytes + incoming - trim.bytes > bytes.min {
                let Some(size) = sizes.next() else { break };
                trim.lines += 1;
                trim.bytes += size;
            }
        }
    }

    trim
}
