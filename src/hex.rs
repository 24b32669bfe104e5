//! Hex dump codec for binary documents
//!
//! Binary content is held as text: lowercase two-digit hex pairs separated by
//! single spaces, `group_size` bytes per line, lines joined with `\n`.

use crate::error::{ContentError, Result};
use std::fmt::Write;

/// Default number of bytes per hex dump line
pub const DEFAULT_GROUP_SIZE: usize = 16;

/// Render bytes as a hex dump with `group_size` bytes per line
///
/// A `group_size` of zero is treated as one byte per line.
pub fn encode(data: &[u8], group_size: usize) -> String {
    let group_size = group_size.max(1);
    // "xx " per byte, the last separator on each line becomes the newline
    let mut out = String::with_capacity(data.len() * 3);

    for (line_no, line) in data.chunks(group_size).enumerate() {
        if line_no > 0 {
            out.push('\n');
        }
        for (i, byte) in line.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            // Writing to a String cannot fail
            let _ = write!(out, "{:02x}", byte);
        }
    }

    out
}

/// Check for the separators allowed between hex pairs
pub fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\r' | '\n')
}

/// Parse hex text back into bytes
///
/// Spaces and line breaks are ignored wherever they appear. Anything else
/// must be hex digits (either case) forming complete pairs.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(text.len() / 3 + 1);
    let mut high: Option<u32> = None;

    for (pos, c) in text.char_indices() {
        if is_separator(c) {
            continue;
        }

        let digit = c
            .to_digit(16)
            .ok_or_else(|| ContentError::InvalidHex(format!("invalid hex digit {:?} at offset {}", c, pos)))?;

        match high.take() {
            None => high = Some(digit),
            Some(h) => bytes.push(((h << 4) | digit) as u8),
        }
    }

    if high.is_some() {
        return Err(ContentError::InvalidHex(
            "odd number of hex digits".to_string(),
        ));
    }

    Ok(bytes)
}
