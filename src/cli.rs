use clap::Parser;
use logtail::config::{ByteSize, Config, RangeText};
use std::path::PathBuf;

/// `-1` on the command line clears a limit set by the config file.
const NO_LIMIT: &str = "-1";

#[derive(Parser, Debug)]
#[command(name = "logtail")]
#[command(about = "Append stdin to a log file kept within byte and line limits", long_about = None)]
pub struct Cli {
    /// Log file to append to [default: stdout.log]
    pub file: Option<PathBuf>,

    /// Prefix every line with this string
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Compaction buffer size (e.g. 4096, 64KB); -1 for no limit
    #[arg(short = 'm', long, value_parser = parse_memory, allow_hyphen_values = true)]
    pub max_memory: Option<MemoryLimit>,

    /// Byte range [min:]max (e.g. 1MB:2MB); -1 for no limit
    #[arg(short = 'c', long, allow_hyphen_values = true)]
    pub bytes: Option<String>,

    /// Line range [min:]max (e.g. 500:1000); -1 for no limit
    #[arg(short = 'n', long, allow_hyphen_values = true)]
    pub lines: Option<String>,

    /// Print an RFC 3339 timestamp before each line (and its prefix)
    #[arg(short = 'd', long)]
    pub date: bool,

    /// Configuration file [default: $LOGTAIL_CONFIG or config/logtail.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryLimit {
    Unbounded,
    Bytes(ByteSize),
}

fn parse_memory(value: &str) -> Result<MemoryLimit, String> {
    if value.trim() == NO_LIMIT {
        return Ok(MemoryLimit::Unbounded);
    }
    value
        .parse::<ByteSize>()
        .map(MemoryLimit::Bytes)
        .map_err(|err| err.to_string())
}

fn range_override(value: &str) -> Option<RangeText> {
    (value.trim() != NO_LIMIT).then(|| RangeText::from(value))
}

impl Cli {
    /// Overlay the flags that were given on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(file) = &self.file {
            config.output.path = file.clone();
        }
        if let Some(limit) = self.max_memory {
            config.output.max_memory = match limit {
                MemoryLimit::Unbounded => None,
                MemoryLimit::Bytes(size) => Some(size),
            };
        }
        if let Some(bytes) = &self.bytes {
            config.limits.bytes = range_override(bytes);
        }
        if let Some(lines) = &self.lines {
            config.limits.lines = range_override(lines);
        }
        if let Some(prefix) = &self.prefix {
            config.format.prefix = Some(prefix.clone());
        }
        if self.date {
            config.format.timestamp = true;
        }
    }
}
