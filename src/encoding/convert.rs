//! Transcoding between a document charset and canonical UTF-8

use super::charset::{Charset, CharsetRegistry};
use crate::error::{ContentError, Result};

/// Label used for the canonical side in error messages
const CANONICAL: &str = "UTF-8";

/// Converts bytes in a supported charset to canonical text and back
///
/// Conversions are strict in both directions: a malformed input sequence or an
/// unrepresentable character fails the whole call and no partial output is
/// returned.
#[derive(Clone, Debug, Default)]
pub struct CharsetConverter {
    registry: CharsetRegistry,
}

impl CharsetConverter {
    /// Create a converter over the given charset registry
    pub fn new(registry: CharsetRegistry) -> Self {
        Self { registry }
    }

    /// The registry this converter resolves labels against
    pub fn registry(&self) -> &CharsetRegistry {
        &self.registry
    }

    /// Decode `data` from the charset named `from` into canonical text
    pub fn to_canonical(&self, data: &[u8], from: &str) -> Result<String> {
        let charset = self
            .registry
            .lookup(from)
            .ok_or_else(|| ContentError::UnsupportedCharset {
                from: from.to_string(),
                to: CANONICAL.to_string(),
            })?;
        decode(data, charset)
    }

    /// Encode canonical `text` into the charset named `to`
    pub fn from_canonical(&self, text: &str, to: &str) -> Result<Vec<u8>> {
        let charset = self
            .registry
            .lookup(to)
            .ok_or_else(|| ContentError::UnsupportedCharset {
                from: CANONICAL.to_string(),
                to: to.to_string(),
            })?;
        encode(text, charset)
    }
}

/// Strictly decode bytes in `charset`
pub fn decode(data: &[u8], charset: Charset) -> Result<String> {
    if charset == Charset::Iso8859_1 {
        return Ok(data.iter().map(|&b| char::from(b)).collect());
    }

    let codec = charset.codec().ok_or_else(|| unsupported(charset))?;
    let text = codec
        .decode_without_bom_handling_and_without_replacement(data)
        .map(|text| text.into_owned())
        .ok_or_else(|| ContentError::Conversion {
            charset: charset.name().to_string(),
            reason: "malformed byte sequence".to_string(),
        })?;

    if charset == Charset::Utf8 {
        return Ok(text);
    }

    // Duplicate code points (e.g. NEC/IBM rows in Shift_JIS) decode fine but
    // encode to different bytes; saving such text would rewrite the file.
    match encode(&text, charset) {
        Ok(bytes) if bytes == data => Ok(text),
        _ => Err(ContentError::Conversion {
            charset: charset.name().to_string(),
            reason: "byte sequence does not round-trip".to_string(),
        }),
    }
}

/// Strictly encode text into `charset`
pub fn encode(text: &str, charset: Charset) -> Result<Vec<u8>> {
    match charset {
        Charset::Utf8 => Ok(text.as_bytes().to_vec()),
        Charset::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
        Charset::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
        Charset::Iso8859_1 => text
            .chars()
            .map(|c| u8::try_from(u32::from(c)).map_err(|_| unrepresentable(charset, c)))
            .collect(),
        _ => {
            let codec = charset.codec().ok_or_else(|| unsupported(charset))?;
            let (bytes, _, had_errors) = codec.encode(text);
            if had_errors {
                // Find the offending character for the message
                let reason = text
                    .chars()
                    .find(|c| codec.encode(c.encode_utf8(&mut [0; 4])).2)
                    .map(|c| unrepresentable(charset, c))
                    .unwrap_or_else(|| ContentError::Conversion {
                        charset: charset.name().to_string(),
                        reason: "unrepresentable character".to_string(),
                    });
                return Err(reason);
            }
            Ok(bytes.into_owned())
        }
    }
}

fn unrepresentable(charset: Charset, c: char) -> ContentError {
    ContentError::Conversion {
        charset: charset.name().to_string(),
        reason: format!("character {:?} (U+{:04X}) cannot be represented", c, u32::from(c)),
    }
}

fn unsupported(charset: Charset) -> ContentError {
    ContentError::UnsupportedCharset {
        from: charset.name().to_string(),
        to: CANONICAL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(bytes: &[u8], label: &str) {
        let converter = CharsetConverter::default();
        let text = converter.to_canonical(bytes, label).unwrap();
        let back = converter.from_canonical(&text, label).unwrap();
        assert_eq!(back, bytes, "round trip through {}", label);
    }

    #[test]
    fn test_latin1_cafe() {
        let converter = CharsetConverter::default();
        let text = converter.to_canonical(b"caf\xe9", "ISO-8859-1").unwrap();
        assert_eq!(text, "café");
        assert_eq!(
            converter.from_canonical("café", "ISO-8859-1").unwrap(),
            b"caf\xe9"
        );
    }

    #[test]
    fn test_latin1_covers_every_byte() {
        let all: Vec<u8> = (0..=255).collect();
        round_trip(&all, "ISO-8859-1");
    }

    #[test]
    fn test_round_trip_single_byte_charsets() {
        round_trip(b"\xcf\xf0\xe8\xe2\xe5\xf2", "windows-1251");
        round_trip(b"\xf0\xd2\xc9\xd7\xc5\xd4", "KOI8-R");
        round_trip(b"\xc1\xe8\xe1\xeb\xdf\xef", "ISO-8859-7");
        round_trip(b"\xa4 euro", "ISO-8859-15");
        round_trip(b"za\xbf\xf3\xb3\xe6", "ISO-8859-2");
        round_trip(b"\xca\xc7\xca\xb4\xd5", "TIS-620");
        round_trip(b"G\xfczel \xfeey", "ISO-8859-9");
        round_trip(b"\x80 price", "windows-1252");
    }

    #[test]
    fn test_round_trip_multi_byte_charsets() {
        // "日本語"
        round_trip(b"\x93\xfa\x96\x7b\x8c\xea", "Shift_JIS");
        // "한국어"
        round_trip(b"\xc7\xd1\xb1\xb9\xbe\xee", "EUC-KR");
        // "中文"
        round_trip(b"\xd6\xd0\xce\xc4", "GB18030");
        // "中文"
        round_trip(b"\xa4\xa4\xa4\xe5", "Big5");
    }

    #[test]
    fn test_duplicate_mappings_are_rejected() {
        let converter = CharsetConverter::default();
        // NEC row 13 and NEC-selected IBM extensions re-encode as other bytes
        for bytes in [&b"\x87\x90"[..], b"\xed\x40", b"abc\x87\x90\xed\x40\n"] {
            let err = converter.to_canonical(bytes, "Shift_JIS").unwrap_err();
            assert!(matches!(err, ContentError::Conversion { .. }), "{:02x?}", bytes);
        }
        // Single-byte euro in GB18030 encodes as a2 e3
        assert!(converter.to_canonical(b"\x80", "GB18030").is_err());
        // HKSCS characters decode but cannot be encoded back
        assert!(converter.to_canonical(b"\x87\x40", "Big5").is_err());
    }

    #[test]
    fn test_round_trip_utf16() {
        let le = [0xFF, 0xFE, b'h', 0x00, b'i', 0x00];
        round_trip(&le, "UTF-16LE");
        let be = [0xFE, 0xFF, 0x00, b'h', 0x00, b'i'];
        round_trip(&be, "UTF-16BE");
    }

    #[test]
    fn test_unsupported_charset_names_both_sides() {
        let converter = CharsetConverter::default();
        match converter.to_canonical(b"abc", "klingon") {
            Err(ContentError::UnsupportedCharset { from, to }) => {
                assert_eq!(from, "klingon");
                assert_eq!(to, "UTF-8");
            }
            other => panic!("Expected UnsupportedCharset, got {:?}", other),
        }
        match converter.from_canonical("abc", "klingon") {
            Err(ContentError::UnsupportedCharset { from, to }) => {
                assert_eq!(from, "UTF-8");
                assert_eq!(to, "klingon");
            }
            other => panic!("Expected UnsupportedCharset, got {:?}", other),
        }
    }

    #[test]
    fn test_registry_limits_converter() {
        let converter = CharsetConverter::new(CharsetRegistry::new(vec![Charset::Utf8]));
        assert!(matches!(
            converter.to_canonical(b"abc", "KOI8-R"),
            Err(ContentError::UnsupportedCharset { .. })
        ));
    }

    #[test]
    fn test_malformed_input_fails_whole_conversion() {
        let converter = CharsetConverter::default();
        // Truncated Shift_JIS lead byte
        let err = converter.to_canonical(b"abc\x93", "Shift_JIS").unwrap_err();
        assert!(matches!(err, ContentError::Conversion { .. }));
    }

    #[test]
    fn test_unrepresentable_character_fails() {
        let converter = CharsetConverter::default();
        let err = converter.from_canonical("snow ☃", "KOI8-R").unwrap_err();
        match err {
            ContentError::Conversion { charset, reason } => {
                assert_eq!(charset, "KOI8-R");
                assert!(reason.contains("U+2603"));
            }
            other => panic!("Expected Conversion, got {:?}", other),
        }

        assert!(converter.from_canonical("ā", "ISO-8859-1").is_err());
    }
}
