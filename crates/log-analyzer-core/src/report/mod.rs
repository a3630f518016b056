mod writer;

pub use writer::ReportWriter;

use crate::log::LogDate;
use std::path::{Path, PathBuf};

/// Location of the report for a given log date: `<dir>/report-YYYY.MM.DD.html`
pub fn report_path(report_dir: &Path, date: &LogDate) -> PathBuf {
    report_dir.join(format!("report-{date}.html"))
}
