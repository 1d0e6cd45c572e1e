use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce a movie table from a source file.
///
/// Fatal for the dashboard: nothing is rendered until a table loads.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: cannot read '{column}' value {value:?} as {expected}")]
    Coercion {
        row: usize,
        column: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("row {row}: {reason}")]
    InvalidValue { row: usize, reason: String },

    #[error("malformed source: {0}")]
    Malformed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

/// A sidebar selection that cannot be turned into a predicate.
/// The offending predicate is dropped, the rest still apply.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("invalid search pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid year selection {0:?}")]
    InvalidYear(String),

    #[error("invalid part filter {0:?} (expected All, Yes or No)")]
    InvalidPartFilter(String),

    #[error("invalid minimum rating {0}")]
    InvalidMinRating(f64),
}

/// Degenerate input to a chart builder. Replaced by a "no data" artifact.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("no titles to build a word cloud from")]
    NoTitles,

    #[error("titles contain no countable words")]
    NoWords,
}
