//! Coarse content sniffing
//!
//! Decides whether raw bytes look like text or like a binary format before any
//! charset probing happens. Only the first [`SNIFF_LEN`] bytes are examined.

mod signatures;
pub mod traits;

pub use signatures::{match_signature, RiffSignature, MAGIC_SIGNATURES};
pub use traits::{BinarySignature, MagicSignature};

use crate::encoding::Charset;

/// Number of leading bytes examined by [`sniff`]
pub const SNIFF_LEN: usize = 512;

/// Coarse classification of a byte buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    /// Not textual; carries the recognised format name or a generic label
    Binary(&'static str),
    /// Textual; `charset` is set only when a byte order mark names one
    Text { charset: Option<Charset> },
}

impl ContentKind {
    /// Check if the content was classified as text
    pub fn is_text(self) -> bool {
        matches!(self, ContentKind::Text { .. })
    }
}

/// Charset named by a leading byte order mark, if any
pub fn bom_charset(data: &[u8]) -> Option<Charset> {
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        Some(Charset::Utf8)
    } else if data.starts_with(&[0xFE, 0xFF]) {
        Some(Charset::Utf16Be)
    } else if data.starts_with(&[0xFF, 0xFE]) {
        Some(Charset::Utf16Le)
    } else {
        None
    }
}

/// Bytes that never appear in plain text
fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

/// Classify data as text or binary
pub fn sniff(data: &[u8]) -> ContentKind {
    let head = &data[..data.len().min(SNIFF_LEN)];

    // A BOM wins over everything else: UTF-16 text is full of NUL bytes
    if let Some(charset) = bom_charset(head) {
        return ContentKind::Text {
            charset: Some(charset),
        };
    }

    if let Some(name) = match_signature(head) {
        return ContentKind::Binary(name);
    }

    if head.iter().any(|&b| is_binary_byte(b)) {
        return ContentKind::Binary("binary data");
    }

    ContentKind::Text { charset: None }
}
