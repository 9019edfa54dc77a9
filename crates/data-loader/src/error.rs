//! Error types for the data-loader crate.

use thiserror::Error;

/// Errors that can occur while loading, aggregating and indexing interactions
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// Header row lacks a required column
    #[error("Missing column {column} in {file}")]
    MissingColumn { file: String, column: String },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The same key was given two indices
    #[error("Duplicate key in id map: {0}")]
    DuplicateKey(String),

    /// The aggregated interactions were rejected by the matrix builder
    #[error("Matrix construction failed: {0}")]
    Matrix(#[from] als::AlsError),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
