use std::collections::VecDeque;
use std::io::BufRead;

use tracing::{debug, warn};

/// Byte length of every line currently in the log file, oldest first.
///
/// The running totals live here so that `bytes()` and `lines()` always agree
/// with the sizes stored: `bytes() == iter().sum()` and `lines() == iter().count()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineLedger {
    sizes: VecDeque<u64>,
    bytes: u64,
}

/// Outcome of scanning an existing file into a ledger
#[derive(Debug)]
pub struct Replay {
    pub ledger: LineLedger,
    /// The last line had no terminating newline; its size already counts one.
    pub missing_newline: bool,
    /// The scan stopped early; the ledger covers only the bytes read so far.
    pub error: Option<std::io::Error>,
}

impl LineLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the ledger from file contents, one entry per line.
    ///
    /// Each line counts its text plus one byte for the newline, including a
    /// trailing unterminated line.
    pub fn replay<R: BufRead>(mut reader: R) -> Replay {
        let mut ledger = Self::new();
        let mut missing_newline = false;
        let mut line = Vec::new();

        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(read) => {
                    if line.last() != Some(&b'\n') {
                        missing_newline = true;
                        ledger.record_append(read as u64 + 1);
                        break;
                    }
                    ledger.record_append(read as u64);
                }
                Err(err) => {
                    warn!(error = %err, lines = ledger.lines(), "Replay scan stopped early");
                    return Replay {
                        ledger,
                        missing_newline: false,
                        error: Some(err),
                    };
                }
            }
        }

        debug!(lines = ledger.lines(), bytes = ledger.bytes(), "Replayed existing lines");
        Replay {
            ledger,
            missing_newline,
            error: None,
        }
    }

    /// Record a line appended at the end of the file.
    ///
    /// # Panics
    ///
    /// A line always carries at least its newline, so `size` must be non-zero.
    pub fn record_append(&mut self, size: u64) {
        assert!(size > 0, "line size must include its newline");
        self.sizes.push_back(size);
        self.bytes += size;
    }

    /// Drop the `count` oldest lines and return how many bytes they held.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds the number of recorded lines.
    pub fn remove_prefix(&mut self, count: usize) -> u64 {
        assert!(
            count <= self.sizes.len(),
            "cannot trim {count} lines from a ledger of {}",
            self.sizes.len()
        );
        let removed: u64 = self.sizes.drain(..count).sum();
        self.bytes -= removed;
        removed
    }

    pub fn lines(&self) -> usize {
        self.sizes.len()
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Line sizes, oldest first
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.sizes.iter().copied()
    }
}
