use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Malformed config file {}: {source}", path.display())]
    ConfigMalformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Log is unparsable: {errors} bad lines against {parsed} parsed")]
    Unparsable { errors: usize, parsed: usize },

    #[error("Arithmetic overflow while computing {0}")]
    Overflow(String),

    #[error("Invalid report template: {0}")]
    Template(String),

    #[error("Failed to serialize report table: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
