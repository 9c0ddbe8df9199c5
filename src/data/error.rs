use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems reading the dataset. Any of these aborts startup.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing delimited file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("parsing JSON file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON dataset must be a top-level array of records")]
    JsonNotArray,

    #[error("JSON row {row} is not an object")]
    JsonShape { row: usize },

    #[error("reading parquet file {}: {source}", path.display())]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("reading parquet record batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// A single cell that could not be interpreted. Never fatal: the loader and
/// preparer turn the field into a null and carry on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldParseError {
    #[error("'{value}' is not a DD-MM-YYYY date")]
    Date { value: String },

    #[error("'{value}' is not a valid {kind}")]
    Number { value: String, kind: &'static str },
}
