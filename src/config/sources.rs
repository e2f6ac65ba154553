use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "LOGTAIL_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/logtail.toml";
const ENV_PREFIX: &str = "LOGTAIL";
const ENV_SEPARATOR: &str = "__";

/// Load configuration with priority (lowest first):
/// 1. Defaults (embedded in structs)
/// 2. TOML file, if present
/// 3. Variables from a `.env` file (via dotenvy)
/// 4. Process environment
pub fn load(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let config_path = path.unwrap_or_else(|| {
        env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    });

    load_from_sources(config_path)
}

/// Load from a specific file plus environment overrides
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::debug!(
            "No configuration file at {}, using defaults and environment",
            config_path.display()
        );
    }

    // LOGTAIL__LIMITS__LINES -> limits.lines
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    builder.build()?.try_deserialize()
}
