//! Configuration management for logtail
//!
//! Settings are layered, lowest priority first:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables
//! 4. Command-line flags (applied by the binary)
//!
//! # Usage
//!
//! ```no_run
//! use logtail::config::Config;
//!
//! let config = Config::read(None).expect("Failed to load configuration");
//! let settings = config.tail_settings().expect("Invalid limits");
//! println!("Writing to {}", config.output.path.display());
//! ```
//!
//! # Environment Variables
//!
//! Any key can be overridden with `LOGTAIL__<section>__<key>`:
//! - `LOGTAIL__OUTPUT__PATH=/var/log/app.log`
//! - `LOGTAIL__OUTPUT__MAX_MEMORY=64KB`
//! - `LOGTAIL__LIMITS__LINES=500:1000`
//!
//! # Configuration File
//!
//! By default the file is `config/logtail.toml`; `LOGTAIL_CONFIG` or
//! `--config` point elsewhere. A missing file is not an error.

mod models;
pub mod range;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{Config, FormatConfig, LimitsConfig, OutputConfig};
pub use range::{Range, RangeError, RangeText};
pub use validation::ValidationError;

use crate::tail::TailSettings;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),
}

impl Config {
    /// Read configuration from `path` (or the default file) and the
    /// environment.
    ///
    /// Nothing is validated yet, so later overrides (command-line flags) can
    /// still fix invalid values. Call [`Config::tail_settings`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or a value has the wrong type.
    pub fn read(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Ok(sources::load(path)?)
    }

    /// Validated settings for [`crate::tail::LogTail`]
    pub fn tail_settings(&self) -> Result<TailSettings, ValidationError> {
        validation::resolve(self)
    }
}
