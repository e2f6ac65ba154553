mod cli;

use std::error::Error;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use logtail::config::Config;
use logtail::tail::LogTail;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

type AnyError = Box<dyn Error + Send + Sync + 'static>;

fn main() -> ExitCode {
    // stdout stays free for --print-config; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AnyError> {
    let mut config = Config::read(cli.config.clone())?;
    cli.apply(&mut config);

    // Validate everything before touching the log file.
    let settings = config.tail_settings()?;

    if cli.print_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    info!(
        path = %config.output.path.display(),
        bounds = ?settings.bounds,
        max_memory = ?settings.max_memory,
        "Starting logtail"
    );

    let mut tail = LogTail::open(&config.output.path, settings)?;
    let ingested = tail.run(io::stdin().lock())?;

    let stats = tail.stats();
    info!(
        ingested,
        lines = stats.lines,
        bytes = stats.bytes,
        metrics = ?tail.metrics(),
        "Input closed"
    );

    Ok(())
}
