//! Output line construction: `[timestamp][prefix]text\n`

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::warn;

/// Source of the timestamps written in front of each line
pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LineFormat {
    #[default]
    Plain,
    Prefix(String),
    /// RFC 3339 timestamp, then the prefix or a tab when there is none
    Timestamp(Option<String>),
}

impl LineFormat {
    pub fn new(timestamp: bool, prefix: Option<String>) -> Self {
        match (timestamp, prefix) {
            (true, prefix) => LineFormat::Timestamp(prefix),
            (false, Some(prefix)) => LineFormat::Prefix(prefix),
            (false, None) => LineFormat::Plain,
        }
    }

    /// Build the full output line, trailing newline included.
    ///
    /// `text` is copied as is; it need not be UTF-8.
    pub fn render(&self, text: &[u8], clock: &dyn Clock) -> Vec<u8> {
        let mut line = Vec::with_capacity(text.len() + 32);
        match self {
            LineFormat::Plain => {}
            LineFormat::Prefix(prefix) => line.extend_from_slice(prefix.as_bytes()),
            LineFormat::Timestamp(prefix) => {
                let now = clock.now();
                let stamp = now.replace_nanosecond(0).unwrap_or(now);
                // Fails for offsets with seconds and years outside 0..=9999.
                match stamp.format(&Rfc3339) {
                    Ok(formatted) => line.extend_from_slice(formatted.as_bytes()),
                    Err(err) => {
                        warn!(error = %err, %stamp, "Timestamp not representable, writing line without it")
                    }
                }
                line.extend_from_slice(prefix.as_deref().unwrap_or("\t").as_bytes());
            }
        }
        line.extend_from_slice(text);
        line.push(b'\n');
        line
    }
}
