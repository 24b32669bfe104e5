//! Error taxonomy for content operations
//!
//! Every variant is recoverable at the boundary of the user action that
//! triggered it. Operations that fail leave the document in its prior state.

use std::path::PathBuf;

/// Errors produced by the content engine
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Statistical charset detection was below the confidence threshold
    #[error("failed to detect charset (best confidence {confidence})")]
    DetectionFailed { confidence: u8 },

    /// One of the requested charsets is not in the supported set
    #[error("unsupported charsets: `{from}` -> `{to}`")]
    UnsupportedCharset { from: String, to: String },

    /// Transcoding hit a byte sequence or character the charset cannot express
    #[error("failed to convert encoding {charset}: {reason}")]
    Conversion { charset: String, reason: String },

    /// Hex text could not be decoded into bytes
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    /// A search or replace expression failed to compile
    #[error("invalid search query: {0}")]
    InvalidPattern(String),

    /// Reading or writing the backing store failed
    #[error("failed to access file `{}`: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document was opened without write permission
    #[error("file `{}` is read only", .0.display())]
    ReadOnly(PathBuf),

    /// Save requested for a document that has never been given a path
    #[error("document has no file name")]
    NoBackingFile,
}

impl ContentError {
    /// Wrap an I/O error together with the path it concerns
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ContentError::FileAccess {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ContentError>;
