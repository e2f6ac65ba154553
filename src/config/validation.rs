use std::num::NonZeroUsize;

use super::models::Config;
use super::range::{Range, RangeError, RangeText};
use crate::format::LineFormat;
use crate::ledger::{Bounds, Watermark};
use crate::tail::TailSettings;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("byte range {text:?}: {source}")]
    ByteRange {
        text: String,
        #[source]
        source: RangeError,
    },

    #[error("line range {text:?}: {source}")]
    LineRange {
        text: String,
        #[source]
        source: RangeError,
    },

    #[error("{dimension} range: min {min} exceeds max {max}")]
    InvertedRange {
        dimension: &'static str,
        min: u64,
        max: u64,
    },

    #[error("max_memory must be positive (leave it unset for no limit)")]
    ZeroMemory,

    #[error("max_memory {0} exceeds the address space")]
    MemoryTooLarge(u64),

    #[error("Output path must not be empty")]
    EmptyPath,
}

/// Check the configuration and produce the settings the log tail runs with
pub fn resolve(config: &Config) -> Result<TailSettings, ValidationError> {
    validate_output(config)?;

    let bounds = Bounds {
        bytes: watermark("bytes", config.limits.bytes.as_ref(), Range::bytes, |text, source| {
            ValidationError::ByteRange { text, source }
        })?,
        lines: watermark("lines", config.limits.lines.as_ref(), Range::lines, |text, source| {
            ValidationError::LineRange { text, source }
        })?,
    };

    let max_memory = match config.output.max_memory {
        None => None,
        Some(size) => {
            let bytes = usize::try_from(size.as_u64())
                .map_err(|_| ValidationError::MemoryTooLarge(size.as_u64()))?;
            Some(NonZeroUsize::new(bytes).ok_or(ValidationError::ZeroMemory)?)
        }
    };

    Ok(TailSettings {
        bounds,
        max_memory,
        format: LineFormat::new(config.format.timestamp, config.format.prefix.clone()),
    })
}

fn validate_output(config: &Config) -> Result<(), ValidationError> {
    if config.output.path.as_os_str().is_empty() {
        return Err(ValidationError::EmptyPath);
    }
    Ok(())
}

/// Parse one range into a watermark; a range without a maximum is not enforced.
fn watermark(
    dimension: &'static str,
    text: Option<&RangeText>,
    parse: fn(&str) -> Result<Range, RangeError>,
    invalid: fn(String, RangeError) -> ValidationError,
) -> Result<Option<Watermark>, ValidationError> {
    let Some(text) = text else {
        return Ok(None);
    };
    let range = parse(text.as_str()).map_err(|err| invalid(text.to_string(), err))?;

    let Some(max) = range.max else {
        if let Some(min) = range.min {
            tracing::warn!(dimension, min, "Range has a minimum but no maximum; not enforced");
        }
        return Ok(None);
    };

    Watermark::new(range.min, max)
        .map(Some)
        .map_err(|_| ValidationError::InvertedRange {
            dimension,
            min: range.min.unwrap_or(max),
            max,
        })
}
