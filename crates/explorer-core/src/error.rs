use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by Bikeshare Explorer.
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// The configured data directory does not exist.
    #[error("Data directory not found: {0}")]
    DataDirNotFound(PathBuf),

    /// A city resolved to a dataset file that is not on disk.
    #[error("No dataset for {city} at {path}")]
    DatasetNotFound { city: String, path: PathBuf },

    /// A dataset file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV structure itself is broken (bad headers, ragged rows, ...).
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A start timestamp did not match any recognised format.
    /// `row` is the 1-based row number counting the header as row 1.
    #[error("Row {row}: invalid start time \"{value}\"")]
    TimestampParse { row: usize, value: String },

    /// A required field failed to parse. Same row numbering as above.
    #[error("Row {row}, column \"{column}\": cannot parse \"{value}\": {message}")]
    FieldParse {
        row: usize,
        column: String,
        value: String,
        message: String,
    },

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the explorer crates.
pub type Result<T> = std::result::Result<T, ExplorerError>;
