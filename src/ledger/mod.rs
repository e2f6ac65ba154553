//! Line-size bookkeeping and in-place trimming for the bounded log file
//!
//! The ledger mirrors the file line by line: one entry per line holding its
//! byte length, newline included. Every bound decision is made from the
//! ledger alone, without reading the file back.
//!
//! ## Trimming
//!
//! Each dimension (bytes, lines) has a ceiling and a floor. Crossing the
//! ceiling discards the oldest lines until the dimension is back at its floor,
//! so a burst of appends after a trim needs no further work. See
//! [`watermark::plan`].
//!
//! ## Compaction
//!
//! Discarded lines are removed by shifting the rest of the file forward with a
//! bounded buffer and truncating, keeping the same inode. See
//! [`compaction::compact`].
//!
//! ```rust,ignore
//! use logtail::ledger::{plan, compact, Bounds, LineLedger, Watermark};
//!
//! let trim = plan(&ledger, line.len() as u64, &bounds);
//! if !trim.is_empty() {
//!     compact(&mut file, trim.bytes, ledger.bytes(), None)?;
//!     ledger.remove_prefix(trim.lines);
//! }
//! ```

pub mod compaction;
pub mod error;
pub mod sizes;
pub mod watermark;

pub use compaction::{Truncate, compact};
pub use error::{LedgerError, Result};
pub use sizes::{LineLedger, Replay};
pub use watermark::{Bounds, TrimPlan, Watermark, plan};
