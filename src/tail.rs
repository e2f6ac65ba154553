//! Ingestion loop: replay the existing file, settle it against the bounds,
//! then append input lines one at a time, trimming before each append.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::format::{Clock, LineFormat, SystemClock};
use crate::ledger::{self, Bounds, LedgerError, LineLedger, TrimPlan, Truncate};
use crate::observability::{MetricsSnapshot, TailMetrics};

#[derive(Debug, Error)]
pub enum TailError {
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Trim failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, TailError>;

/// Validated settings consumed by [`LogTail`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TailSettings {
    pub bounds: Bounds,
    /// Compaction buffer size; `None` buffers the whole remaining tail
    pub max_memory: Option<NonZeroUsize>,
    pub format: LineFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailStats {
    pub lines: usize,
    pub bytes: u64,
}

/// Sole owner of the bounded log file.
///
/// Between calls the handle sits at end of file and the ledger matches the
/// file exactly.
pub struct LogTail<F = File> {
    file: F,
    ledger: LineLedger,
    settings: TailSettings,
    clock: Box<dyn Clock>,
    metrics: TailMetrics,
}

impl LogTail<File> {
    /// Open or create the log file at `path` and settle it against the bounds.
    ///
    /// The file is modified in place and never replaced.
    pub fn open(path: impl AsRef<Path>, settings: TailSettings) -> Result<Self> {
        let path = path.as_ref();
        let open_error = |source| TailError::Open {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(open_error)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(open_error)?;

        info!(path = %path.display(), "Opened log file");
        Self::from_handle(file, settings)
    }
}

impl<F> LogTail<F>
where
    F: Read + Write + Seek + Truncate,
{
    /// Replay `file` from the start, then run the settle pass.
    pub fn from_handle(mut file: F, settings: TailSettings) -> Result<Self> {
        file.seek(SeekFrom::Start(0))?;
        let replay = LineLedger::replay(BufReader::new(&mut file));
        let ledger = replay.ledger;

        if let Some(err) = replay.error {
            // Unread bytes are not in the ledger; cut them so the two agree.
            warn!(error = %err, kept_bytes = ledger.bytes(), "Dropping unreadable tail of log file");
            file.truncate(ledger.bytes())?;
        } else if replay.missing_newline {
            file.seek(SeekFrom::End(0))?;
            file.write_all(b"\n")?;
            debug!("Terminated trailing partial line");
        }

        let mut tail = Self {
            file,
            ledger,
            settings,
            clock: Box::new(SystemClock),
            metrics: TailMetrics::new(),
        };

        info!(
            lines = tail.ledger.lines(),
            bytes = tail.ledger.bytes(),
            "Replayed existing log"
        );

        let settled = tail.trim_for(0)?;
        if !settled.is_empty() {
            info!(
                lines = settled.lines,
                bytes = settled.bytes,
                "Settled existing log against bounds"
            );
        }
        tail.file.seek(SeekFrom::End(0))?;

        Ok(tail)
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Format and append one input line, trimming first if a bound would be
    /// crossed. Line breaks inside `text` start new lines.
    pub fn append_line(&mut self, text: &str) -> Result<()> {
        self.append_bytes(text.as_bytes())
    }

    /// Byte-level [`LogTail::append_line`]: `text` is written as is and need
    /// not be UTF-8. One trailing `\n` is dropped, and a `\r` before each line
    /// break or at the very end is dropped with it.
    pub fn append_bytes(&mut self, text: &[u8]) -> Result<()> {
        let text = text.strip_suffix(b"\n").unwrap_or(text);

        for part in text.split(|&b| b == b'\n') {
            let part = part.strip_suffix(b"\r").unwrap_or(part);
            let line = self.settings.format.render(part, self.clock.as_ref());
            self.append_formatted(&line)?;
        }
        Ok(())
    }

    /// Append lines from `input` until it ends.
    ///
    /// A read error on the input ends the loop without failing; the file is
    /// left consistent. Trim and append failures are returned.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<u64> {
        let mut ingested = 0u64;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match input.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    self.append_bytes(&buf)?;
                    ingested += 1;
                }
                Err(err) => {
                    warn!(error = %err, ingested, "Input stream failed, stopping");
                    break;
                }
            }
        }

        Ok(ingested)
    }

    pub fn stats(&self) -> TailStats {
        TailStats {
            lines: self.ledger.lines(),
            bytes: self.ledger.bytes(),
        }
    }

    pub fn ledger(&self) -> &LineLedger {
        &self.ledger
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn get_ref(&self) -> &F {
        &self.file
    }

    pub fn into_inner(self) -> F {
        self.file
    }

    fn append_formatted(&mut self, line: &[u8]) -> Result<()> {
        let size = line.len() as u64;
        self.trim_for(size)?;

        self.file.write_all(line)?;
        self.file.flush()?;
        self.ledger.record_append(size);
        self.metrics.line_appended(size);
        Ok(())
    }

    /// Discard the oldest lines so that `incoming` more bytes fit.
    fn trim_for(&mut self, incoming: u64) -> Result<TrimPlan> {
        let plan = ledger::plan(&self.ledger, incoming, &self.settings.bounds);
        if plan.is_empty() {
            return Ok(plan);
        }

        ledger::compact(
            &mut self.file,
            plan.bytes,
            self.ledger.bytes(),
            self.settings.max_memory,
        )?;
        self.ledger.remove_prefix(plan.lines);
        self.metrics.trimmed(&plan);

        debug!(
            trimmed_lines = plan.lines,
            trimmed_bytes = plan.bytes,
            lines = self.ledger.lines(),
            bytes = self.ledger.bytes(),
            "Trimmed log file"
        );
        Ok(plan)
    }
}
