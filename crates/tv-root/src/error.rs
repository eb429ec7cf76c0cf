//! Errors raised while decoding a ROOT file.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RootError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with `root` or is shorter than a header.
    #[error("not a ROOT file (bad magic)")]
    BadMagic,

    /// A read ran past the end of a record.
    #[error("truncated record: need {need} bytes at offset {offset}, {have} left")]
    BufferUnderflow { offset: usize, need: usize, have: usize },

    /// Carries the full object path that was asked for.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// The key exists but holds something other than a 1-D histogram.
    #[error("unsupported class: {0}")]
    UnsupportedClass(String),

    #[error("decompression error: {0}")]
    Decompression(String),

    /// Malformed streamer data.
    #[error("corrupt record: {0}")]
    Deserialization(String),
}

pub type Result<T> = std::result::Result<T, RootError>;

/// A missing key becomes [`tv_core::Error::MissingObject`] so the caller can
/// skip that histogram; any other decoding failure is an input error.
impl From<RootError> for tv_core::Error {
    fn from(e: RootError) -> Self {
        match e {
            RootError::KeyNotFound(path) => tv_core::Error::MissingObject(path),
            RootError::Io(io) => tv_core::Error::Io(io),
            other => tv_core::Error::Input(other.to_string()),
        }
    }
}
