use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnssError {
    #[error("Invalid magic: expected {expected:#010x}, got {got:#010x}")]
    InvalidMagic { expected: i32, got: i32 },

    #[error("Invalid version: {0}")]
    InvalidVersion(i32),

    #[error("File too small: expected at least {expected} bytes, got {actual}")]
    FileTooSmall { expected: usize, actual: usize },

    #[error("Read out of bounds: {requested} bytes at offset {offset} (buffer length: {len})")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        len: usize,
    },

    #[error("Truncated record at offset {offset}: declared {declared} bytes, {available} available")]
    TruncatedRecord {
        offset: usize,
        declared: usize,
        available: usize,
    },

    #[error("Empty record at offset {offset}: size does not cover the type code")]
    EmptyRecord { offset: usize },

    #[error("Invalid UTF-8 in {len}-byte string at offset {offset}")]
    InvalidUtf8 { offset: usize, len: usize },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SnssError>;

impl SnssError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Header errors reject the whole file; no records are produced.
    pub fn is_header_error(&self) -> bool {
        matches!(
            self,
            SnssError::InvalidMagic { .. }
                | SnssError::InvalidVersion(_)
                | SnssError::FileTooSmall { .. }
        )
    }

    /// Framing errors stop the stream but keep the records read so far.
    pub fn is_framing_error(&self) -> bool {
        matches!(
            self,
            SnssError::TruncatedRecord { .. } | SnssError::EmptyRecord { .. }
        )
    }
}
