//! Encoding module: charset set, detection and transcoding

mod charset;
pub mod convert;
pub mod detect;

pub use charset::{Charset, CharsetRegistry};
pub use convert::CharsetConverter;
pub use detect::{detect, MIN_CONFIDENCE};

use std::fmt;

/// Name of the sentinel encoding for non-textual documents
pub const BINARY: &str = "binary";

/// How a document's bytes are represented
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentEncoding {
    /// Raw bytes shown as a hex dump
    Binary,
    /// Text in a supported charset
    Text(Charset),
}

impl DocumentEncoding {
    /// Display name: the charset name, or `binary`
    pub fn name(self) -> &'static str {
        match self {
            DocumentEncoding::Binary => BINARY,
            DocumentEncoding::Text(charset) => charset.name(),
        }
    }

    /// Check if the document is edited in hex mode
    pub fn is_binary(self) -> bool {
        self == DocumentEncoding::Binary
    }

    /// Check if the document holds text
    pub fn is_text(self) -> bool {
        !self.is_binary()
    }

    /// The charset, if the document holds text
    pub fn charset(self) -> Option<Charset> {
        match self {
            DocumentEncoding::Binary => None,
            DocumentEncoding::Text(charset) => Some(charset),
        }
    }
}

impl Default for DocumentEncoding {
    fn default() -> Self {
        DocumentEncoding::Text(Charset::Utf8)
    }
}

impl fmt::Display for DocumentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
