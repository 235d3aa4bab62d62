//! Errors that can occur while reading, writing or interpreting configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::environment;

#[derive(Debug, Error)]
pub enum ParseConfigurationError {
    #[error("parse error on {file_path}:{line}:{column}: {message}")]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("{file_path}: unsupported configuration version {version}; only version 1 is known")]
    UnsupportedVersion { file_path: PathBuf, version: String },
    #[error("I/O error: {0}")]
    IoErrorButStringified(String),
}

#[derive(Debug, Error)]
pub enum WriteParsedConfigurationError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum MakeRuntimeConfigurationError {
    #[error("cannot resolve {field}: {source}")]
    MissingEnvironmentVariable {
        field: String,
        #[source]
        source: environment::Error,
    },
    #[error("invalid endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },
    #[error("flattening.maxRows must be at least 1")]
    InvalidMaxRows,
}
