use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by counting and merging.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Failed to read {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid line budget {value:?}: {reason}")]
    InvalidLineBudget { value: String, reason: &'static str },

    #[error("Failed to write output to {target}")]
    OutputWrite {
        target: String,
        #[source]
        source: io::Error,
    },
}

impl MergeError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MergeError::FileRead {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(target: impl Into<String>, source: io::Error) -> Self {
        MergeError::OutputWrite {
            target: target.into(),
            source,
        }
    }
}

pub type Result<T, E = MergeError> = std::result::Result<T, E>;
