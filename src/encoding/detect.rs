//! Encoding detection for raw file contents
//!
//! Detection runs in two stages. A coarse sniff decides text versus binary
//! and may name a charset through a byte order mark. Text without a trusted
//! charset is then validated as UTF-8 and, failing that, handed to
//! statistical detection whose guess is accepted only above
//! [`MIN_CONFIDENCE`].

use super::charset::Charset;
use super::convert;
use super::DocumentEncoding;
use crate::error::{ContentError, Result};
use crate::formats::{sniff, ContentKind};

/// Minimum confidence (0-100) for a statistical guess to be accepted
pub const MIN_CONFIDENCE: u8 = 30;

/// Detect the encoding of a whole file
///
/// Returns [`DocumentEncoding::Binary`] when sniffing finds non-textual data,
/// and [`ContentError::DetectionFailed`] when the content looks like text but
/// no charset reaches the confidence threshold. Callers treat the latter as
/// binary too.
pub fn detect(data: &[u8]) -> Result<DocumentEncoding> {
    if data.is_empty() {
        return Ok(DocumentEncoding::Text(Charset::Utf8));
    }

    match sniff(data) {
        ContentKind::Binary(format) => {
            log::debug!("Sniffed binary content: {}", format);
            Ok(DocumentEncoding::Binary)
        }
        ContentKind::Text {
            charset: Some(Charset::Utf8),
        }
        | ContentKind::Text { charset: None } => {
            if std::str::from_utf8(data).is_ok() {
                Ok(DocumentEncoding::Text(Charset::Utf8))
            } else {
                detect_statistical(data).map(DocumentEncoding::Text)
            }
        }
        ContentKind::Text {
            charset: Some(charset),
        } => Ok(DocumentEncoding::Text(charset)),
    }
}

/// Guess a charset from byte distribution
pub fn detect_statistical(data: &[u8]) -> Result<Charset> {
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(data, true);
    // UTF-8 was already ruled out by strict validation
    let codec = detector.guess(None, false);

    let Some(charset) = Charset::from_codec(codec) else {
        log::warn!("Detected charset {} is not supported", codec.name());
        return Err(ContentError::DetectionFailed { confidence: 0 });
    };

    let confidence = confidence(data, charset);
    log::debug!("Statistical guess {} (confidence {})", charset, confidence);
    if confidence < MIN_CONFIDENCE {
        return Err(ContentError::DetectionFailed { confidence });
    }
    Ok(charset)
}

/// Score how plausible `data` is as text in `charset`, on a 0-100 scale
///
/// Data that fails strict decoding scores zero. Otherwise the score is the
/// share of decoded characters that are printable or ordinary whitespace.
pub fn confidence(data: &[u8], charset: Charset) -> u8 {
    let Ok(text) = convert::decode(data, charset) else {
        return 0;
    };

    let mut total = 0usize;
    let mut plausible = 0usize;
    for c in text.chars() {
        total += 1;
        if !c.is_control() || matches!(c, '\n' | '\r' | '\t' | '\x0c') {
            plausible += 1;
        }
    }

    if total == 0 {
        return 0;
    }
    (plausible * 100 / total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_utf8() {
        assert_eq!(detect(b"").unwrap(), DocumentEncoding::Text(Charset::Utf8));
    }

    #[test]
    fn test_png_header_is_binary() {
        let data = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\x00\x00\x00\x01\x00\x00\x00\x01";
        assert_eq!(detect(data).unwrap(), DocumentEncoding::Binary);
    }

    #[test]
    fn test_ascii_is_utf8() {
        let data = b"#!/bin/sh\necho hello\n";
        assert_eq!(detect(data).unwrap(), DocumentEncoding::Text(Charset::Utf8));
    }

    #[test]
    fn test_utf8_multibyte_is_utf8() {
        let data = "Grüße aus Köln, привет".as_bytes();
        assert_eq!(detect(data).unwrap(), DocumentEncoding::Text(Charset::Utf8));
    }

    #[test]
    fn test_bom_charset_is_trusted() {
        let data = [0xFE, 0xFF, 0x00, b'o', 0x00, b'k'];
        assert_eq!(
            detect(&data).unwrap(),
            DocumentEncoding::Text(Charset::Utf16Be)
        );
    }

    #[test]
    fn test_utf8_bom_with_invalid_body_falls_back() {
        let mut data = vec![0xEF, 0xBB, 0xBF];
        data.extend_from_slice(b"Le caf\xe9 est tr\xe8s bon \xe0 Paris, o\xf9 l'\xe9t\xe9 est chaud.");
        let encoding = detect(&data).unwrap();
        assert_ne!(encoding, DocumentEncoding::Text(Charset::Utf8));
        assert!(encoding.is_text());
    }

    #[test]
    fn test_latin1_text_is_detected_statistically() {
        let data = b"Le caf\xe9 est tr\xe8s bon \xe0 Paris, o\xf9 l'\xe9t\xe9 est chaud et la cr\xe8me br\xfbl\xe9e d\xe9licieuse.";
        let encoding = detect(data).unwrap();
        let DocumentEncoding::Text(charset) = encoding else {
            panic!("Expected text encoding, got {:?}", encoding);
        };
        assert!(!charset.is_unicode());
        assert!(confidence(data, charset) >= MIN_CONFIDENCE);
    }

    #[test]
    fn test_confidence_zero_on_malformed() {
        assert_eq!(confidence(b"\x93", Charset::ShiftJis), 0);
    }

    #[test]
    fn test_confidence_counts_control_characters() {
        assert_eq!(confidence(b"abcd", Charset::Windows1252), 100);
        assert_eq!(confidence(b"ab\x81\x81", Charset::Windows1252), 50);
    }
}
