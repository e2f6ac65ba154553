use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::range::RangeText;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub format: FormatConfig,
}

/// Target file and compaction memory
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Compaction buffer; unset copies the whole remaining tail in one read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_memory: Option<ByteSize>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            max_memory: None,
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("stdout.log")
}

/// `[min:]max` ranges; an absent range is never enforced
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LimitsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<RangeText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<RangeText>,
}

/// How each input line is decorated
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FormatConfig {
    /// RFC 3339 timestamp in front of every line
    #[serde(default)]
    pub timestamp: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.output.path, PathBuf::from("stdout.log"));
        assert!(config.output.max_memory.is_none());
        assert!(config.limits.bytes.is_none());
        assert!(config.limits.lines.is_none());
        assert!(!config.format.timestamp);
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
[output]
path = "/var/log/app/out.log"
max_memory = "64KB"

[limits]
bytes = "1MB:2MB"
lines = 1000

[format]
timestamp = true
prefix = " app: "
            "#,
        )
        .unwrap();

        assert_eq!(config.output.path, PathBuf::from("/var/log/app/out.log"));
        assert_eq!(config.output.max_memory, Some(ByteSize(64 * 1024)));
        assert_eq!(config.limits.bytes.as_ref().unwrap().as_str(), "1MB:2MB");
        assert_eq!(config.limits.lines.as_ref().unwrap().as_str(), "1000");
        assert!(config.format.timestamp);
        assert_eq!(config.format.prefix.as_deref(), Some(" app: "));
    }

    #[test]
    fn test_toml_round_trip_skips_unset() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(!text.contains("max_memory"));
        assert!(!text.contains("bytes"));

        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, Config::default());
    }

    #[test]
    fn test_memory_prints_with_units() {
        let mut config = Config::default();
        config.output.max_memory = Some(ByteSize(2 * 1024 * 1024));

        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains(r#"max_memory = "2MB""#));

        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
