//! `[min:]max` range syntax for byte and line limits

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::humanize::ByteSize;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid min value: {0:?}")]
    InvalidMin(String),

    #[error("invalid max value: {0:?}")]
    InvalidMax(String),

    #[error("expected [min:]max, got {0:?}")]
    Malformed(String),
}

/// Parsed range; an empty side is unset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Range {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl Range {
    /// Line counts: plain integers only
    pub fn lines(text: &str) -> Result<Self, RangeError> {
        Self::parse(text, |side| side.parse::<u64>().ok())
    }

    /// Byte counts: integers or sizes such as `512KB`
    pub fn bytes(text: &str) -> Result<Self, RangeError> {
        Self::parse(text, |side| side.parse::<ByteSize>().ok().map(|size| size.as_u64()))
    }

    fn parse(text: &str, value: impl Fn(&str) -> Option<u64>) -> Result<Self, RangeError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }

        let side = |raw: &str, err: fn(String) -> RangeError| {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(None);
            }
            value(raw).map(Some).ok_or_else(|| err(raw.to_string()))
        };

        match text.split_once(':') {
            None => Ok(Self {
                min: None,
                max: side(text, RangeError::InvalidMax)?,
            }),
            Some((_, max)) if max.contains(':') => Err(RangeError::Malformed(text.to_string())),
            Some((min, max)) => Ok(Self {
                min: side(min, RangeError::InvalidMin)?,
                max: side(max, RangeError::InvalidMax)?,
            }),
        }
    }
}

/// Range text as written in the config file or on the command line.
///
/// Accepts a bare integer as well, since TOML and environment values like
/// `lines = 500` arrive as numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RangeText(pub String);

impl RangeText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RangeText {
    fn from(value: &str) -> Self {
        RangeText(value.to_string())
    }
}

impl fmt::Display for RangeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RangeText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct RangeVisitor;

        impl<'de> serde::de::Visitor<'de> for RangeVisitor {
            type Value = RangeText;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a range such as \"100:500\" or an integer maximum")
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(RangeText(v.to_string()))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(RangeText(v.to_string()))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(RangeText(v.to_string()))
            }
        }

        deserializer.deserialize_any(RangeVisitor)
    }
}
