//! Error taxonomy for the export pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Terminal failures for a single export run.
///
/// None of these are retried or recovered internally; the process reports
/// the error and exits non-zero. Failures before the publish step leave any
/// previously published file untouched.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("config file {0} not found")]
    ConfigMissing(PathBuf),

    #[error("config file {path} is not valid YAML: {source}")]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no api_key configured in {0}")]
    CredentialMissing(PathBuf),

    #[error("API request failed: {0}")]
    Transport(#[source] Box<ureq::Error>),

    #[error("API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("API returned errors: {payload}")]
    Api { payload: serde_json::Value },

    #[error("failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("account data is missing {0}")]
    MissingField(&'static str),

    #[error("failed to write {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ureq::Error> for ExportError {
    fn from(err: ureq::Error) -> Self {
        ExportError::Transport(Box::new(err))
    }
}
