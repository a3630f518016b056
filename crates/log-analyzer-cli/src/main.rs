use anyhow::{Context, Result};
use clap::Parser;
use log_analyzer_cli::{commands, normalize_legacy_args};
use log_analyzer_core::Config;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Parser)]
#[command(name = "log-analyzer")]
#[command(author, version)]
#[command(
    about = "Render per-URL request time statistics from nginx access logs",
    long_about = "Finds the newest nginx-access-ui.log-YYYYMMDD[.gz] in the log directory, \
                  aggregates upstream response times per URL for successful requests, \
                  and writes report-YYYY.MM.DD.html into the report directory."
)]
struct Cli {
    /// JSON config file merged over the built-in defaults
    #[arg(short, long, visible_alias = "conf", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse_from(normalize_legacy_args(std::env::args_os()));

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize logging
    init_logging(cli.verbose, config.log_path.as_deref())?;

    commands::analyze::execute(&config)?;

    Ok(())
}

fn init_logging(verbose: bool, log_path: Option<&Path>) -> Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt::time::ChronoLocal;

    let filter = if verbose {
        EnvFilter::new("log_analyzer=debug,log_analyzer_cli=debug,log_analyzer_core=debug")
    } else {
        EnvFilter::new("log_analyzer=info,log_analyzer_cli=info,log_analyzer_core=info")
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y.%m.%d %H:%M:%S".to_string()));

    match log_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stdout).init(),
    }

    Ok(())
}
