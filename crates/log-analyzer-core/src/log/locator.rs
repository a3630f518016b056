use crate::Result;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const GZIP_SUFFIX: &str = ".gz";

lazy_static! {
    static ref LOG_NAME_PATTERN: Regex =
        Regex::new(r"^nginx-access-ui\.log-([0-9]{8})(\.gz)?$").unwrap();
}

/// Date embedded in a log file name, kept as the original digit groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDate {
    pub year: String,
    pub month: String,
    pub day: String,
}

impl LogDate {
    fn from_digits(digits: &str) -> Self {
        Self {
            year: digits[..4].to_string(),
            month: digits[4..6].to_string(),
            day: digits[6..8].to_string(),
        }
    }

    pub fn as_parts(&self) -> [&str; 3] {
        [&self.year, &self.month, &self.day]
    }

    /// Calendar interpretation of the date, `None` for things like `20201399`
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            self.year.parse().ok()?,
            self.month.parse().ok()?,
            self.day.parse().ok()?,
        )
    }
}

impl fmt::Display for LogDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.year, self.month, self.day)
    }
}

/// The log file selected for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub file_name: String,
    pub path: PathBuf,
    pub date: LogDate,
    pub compressed: bool,
}

pub struct LogLocator;

impl LogLocator {
    /// Find the log file with the greatest embedded date in `log_dir`
    ///
    /// Dates are compared as plain integers; `20201399` is a valid candidate.
    /// When two files carry the same date the one listed last wins.
    pub fn find_latest(log_dir: &Path) -> Result<Option<LogFile>> {
        tracing::debug!("Scanning log directory: {}", log_dir.display());

        let mut latest: Option<(u32, String, String)> = None;

        for entry in fs::read_dir(log_dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(captures) = LOG_NAME_PATTERN.captures(name) else {
                continue;
            };

            let digits = &captures[1];
            let Ok(date) = digits.parse::<u32>() else {
                continue;
            };

            if latest.as_ref().is_none_or(|(best, _, _)| date >= *best) {
                latest = Some((date, name.to_string(), digits.to_string()));
            }
        }

        let Some((_, file_name, digits)) = latest else {
            tracing::info!("No nginx-access-ui log found in {}", log_dir.display());
            return Ok(None);
        };

        let date = LogDate::from_digits(&digits);
        if date.to_naive_date().is_none() {
            tracing::warn!("Log {} carries a non-calendar date {}", file_name, date);
        }

        let log_file = LogFile {
            path: log_dir.join(&file_name),
            compressed: file_name.ends_with(GZIP_SUFFIX),
            date,
            file_name,
        };

        tracing::info!("Latest log: {}", log_file.path.display());

        Ok(Some(log_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn dir_with(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            File::create(dir.path().join(name)).unwrap();
        }
        dir
    }

    #[test]
    fn test_selects_newest_date() {
        let dir = dir_with(&["nginx-access-ui.log-20200101", "nginx-access-ui.log-20200630"]);

        let log = LogLocator::find_latest(dir.path()).unwrap().unwrap();
        assert_eq!(log.file_name, "nginx-access-ui.log-20200630");
        assert_eq!(log.date.as_parts(), ["2020", "06", "30"]);
        assert_eq!(log.path, dir.path().join("nginx-access-ui.log-20200630"));
        assert!(!log.compressed);
    }

    #[test]
    fn test_gzip_log_is_flagged_compressed() {
        let dir = dir_with(&["nginx-access-ui.log-20170630.gz", "nginx-access-ui.log-20170629"]);

        let log = LogLocator::find_latest(dir.path()).unwrap().unwrap();
        assert_eq!(log.file_name, "nginx-access-ui.log-20170630.gz");
        assert!(log.compressed);
        assert_eq!(log.date.to_string(), "2017.06.30");
    }

    #[test]
    fn test_ignores_non_matching_names() {
        let dir = dir_with(&[
            "nginx-access-ui.log-2020063",
            "nginx-access-ui.log-20200630.bz2",
            "nginx-access-api.log-20200630",
            "nginx-access-ui.log-20200630.gz.bak",
            "report-2020.06.30.html",
        ]);

        assert!(LogLocator::find_latest(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(LogLocator::find_latest(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_dates_compare_as_integers() {
        let dir = dir_with(&["nginx-access-ui.log-20201399", "nginx-access-ui.log-20201231"]);

        let log = LogLocator::find_latest(dir.path()).unwrap().unwrap();
        assert_eq!(log.date.as_parts(), ["2020", "13", "99"]);
        assert!(log.date.to_naive_date().is_none());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = LogLocator::find_latest(&dir.path().join("absent"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
