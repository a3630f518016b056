use crate::analysis::{StatsComputer, UrlTimings, select_top};
use crate::log::{LineParser, LogLocator, LogReader};
use crate::report::{ReportWriter, report_path};
use crate::{Config, Result};
use std::path::PathBuf;

/// How a run ended when nothing went wrong
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The log directory holds no `nginx-access-ui.log-*` file
    NoLogFound,
    /// The report for the newest log exists already and was left untouched
    AlreadyReported(PathBuf),
    /// A new report was written
    Written { path: PathBuf, rows: usize },
}

/// Analyze the newest log in `config.log_dir` and render its report
///
/// Any failure aborts the run before the report file is created.
pub fn run(config: &Config) -> Result<RunOutcome> {
    let Some(log) = LogLocator::find_latest(&config.log_dir)? else {
        return Ok(RunOutcome::NoLogFound);
    };

    let path = report_path(&config.report_dir, &log.date);
    if path.exists() {
        tracing::info!("Report {} already exists, skipping", path.display());
        return Ok(RunOutcome::AlreadyReported(path));
    }

    let writer = ReportWriter::load(config.report_template.as_deref())?;

    let lines = LogReader::open(&log.path, log.compressed)?;
    let timings = UrlTimings::collect_from(LineParser::new(lines))?;
    let rows = select_top(StatsComputer::compute(timings)?, config.report_size);

    writer.to_file(&rows, &path)?;

    Ok(RunOutcome::Written {
        path,
        rows: rows.len(),
    })
}
