use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort an aggregation run.
///
/// Failures to read an individual source file are not represented here: those
/// are logged and written into the output as a placeholder instead.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// An argument could not be used as a path at all.
    #[error("invalid {name} path '{value}': {reason}")]
    InvalidPath {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("source path is not a directory or does not exist: {}", .0.display())]
    SourceNotDirectory(PathBuf),

    #[error("destination path exists but is not a directory: {}", .0.display())]
    DestinationNotDirectory(PathBuf),

    #[error("could not create destination directory {}", path.display())]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not open output file {}", path.display())]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed writing to output file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not walk source tree at {}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid ignore pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

pub type Result<T> = std::result::Result<T, AggregateError>;
