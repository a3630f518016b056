use anyhow::Result;
use log_analyzer_core::pipeline;
use log_analyzer_core::{Config, RunOutcome};

/// Analyze the newest log and render its report
///
/// Prints `Done.` once the run completes, including when there was nothing
/// to do. Errors are logged before being handed back.
pub fn execute(config: &Config) -> Result<RunOutcome> {
    tracing::info!(
        "Analyzing logs in {} into {}",
        config.log_dir.display(),
        config.report_dir.display()
    );

    let outcome = match pipeline::run(config) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Analysis failed: {}", e);
            return Err(e.into());
        }
    };

    match &outcome {
        RunOutcome::NoLogFound => {
            tracing::info!("No log to analyze in {}", config.log_dir.display())
        }
        RunOutcome::AlreadyReported(path) => {
            tracing::info!("Report already exists: {}", path.display())
        }
        RunOutcome::Written { path, rows } => {
            tracing::info!("Report is done: {} ({} rows)", path.display(), rows)
        }
    }

    println!("Done.");
    Ok(outcome)
}
