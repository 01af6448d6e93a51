//! Error types for loading and converting documents.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for sexpify operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sexpify.
#[derive(Error, Debug)]
pub enum Error {
    /// No input format was given and none could be inferred from the path.
    #[error("Unsupported format or missing format flag for {}", .0.display())]
    Format(PathBuf),

    /// Input could not be read or output could not be written.
    #[error("Error {action} {}: {source}", .path.display())]
    File {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed YAML/JSON, or a value the tree cannot represent.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Wrap an I/O error raised while reading `path`.
    pub fn reading(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::File {
            action: "reading",
            path: path.into(),
            source,
        }
    }

    /// Wrap an I/O error raised while writing `path`.
    pub fn writing(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::File {
            action: "writing",
            path: path.into(),
            source,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Parse(e.to_string())
    }
}
