use crate::{Error, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

pub const DEFAULT_REPORT_SIZE: usize = 1000;
pub const DEFAULT_REPORT_DIR: &str = "./reports";
pub const DEFAULT_LOG_DIR: &str = "./fixtures/test_log";

/// Resolved analyzer configuration
///
/// Built once at startup from [`Config::default`] and an optional
/// [`ConfigOverrides`] file, then passed by reference through the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of rows in the rendered table
    pub report_size: usize,
    /// Directory that receives `report-YYYY.MM.DD.html` files
    pub report_dir: PathBuf,
    /// Directory scanned for `nginx-access-ui.log-YYYYMMDD[.gz]`
    pub log_dir: PathBuf,
    /// Write log output to this file instead of stdout
    pub log_path: Option<PathBuf>,
    /// Use this template instead of the built-in one
    pub report_template: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_size: DEFAULT_REPORT_SIZE,
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_path: None,
            report_template: None,
        }
    }
}

impl Config {
    /// Load the configuration, merging the file at `path` (if any) over the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let overrides = ConfigOverrides::from_file(path)?;
                Ok(Self::default().merge(overrides))
            }
            None => {
                tracing::debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Produce a new config with every field present in `overrides` replaced
    pub fn merge(&self, overrides: ConfigOverrides) -> Self {
        Self {
            report_size: overrides.report_size.unwrap_or(self.report_size),
            report_dir: overrides
                .report_dir
                .unwrap_or_else(|| self.report_dir.clone()),
            log_dir: overrides.log_dir.unwrap_or_else(|| self.log_dir.clone()),
            log_path: overrides.log_path.or_else(|| self.log_path.clone()),
            report_template: overrides
                .report_template
                .or_else(|| self.report_template.clone()),
        }
    }
}

/// Partial configuration as it appears in the JSON config file
///
/// Keys keep their upper-case spelling. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigOverrides {
    #[serde(rename = "REPORT_SIZE")]
    pub report_size: Option<usize>,
    #[serde(rename = "REPORT_DIR")]
    pub report_dir: Option<PathBuf>,
    #[serde(rename = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,
    #[serde(rename = "LOG_PATH")]
    pub log_path: Option<PathBuf>,
    #[serde(rename = "REPORT_TEMPLATE")]
    pub report_template: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Read and parse a JSON config file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading config file from: {}", path.display());

        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::ConfigNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::ConfigMalformed {
            path: path.to_path_buf(),
            source,
        })
    }
}
