//! Known magic numbers of common binary formats
//!
//! Formats whose first bytes happen to be printable (PDF, PNG after the first
//! byte, GIF) would pass the control-byte heuristic, so they are listed here
//! explicitly. Short prefixes that plain text can start with (such as "BM")
//! are left to the control-byte heuristic.

use super::traits::{BinarySignature, MagicSignature};

/// Fixed-offset magic numbers
pub const MAGIC_SIGNATURES: &[MagicSignature] = &[
    MagicSignature::new("PNG image", b"\x89PNG\r\n\x1a\n"),
    MagicSignature::new("JPEG image", b"\xff\xd8\xff"),
    MagicSignature::new("GIF image", b"GIF87a"),
    MagicSignature::new("GIF image", b"GIF89a"),
    MagicSignature::new("ICO image", b"\x00\x00\x01\x00"),
    MagicSignature::new("PDF document", b"%PDF-"),
    MagicSignature::new("PostScript document", b"%!PS-Adobe-"),
    MagicSignature::new("ZIP archive", b"PK\x03\x04"),
    MagicSignature::new("GZIP archive", b"\x1f\x8b\x08"),
    MagicSignature::new("RAR archive", b"Rar!\x1a\x07"),
    MagicSignature::new("7z archive", b"7z\xbc\xaf\x27\x1c"),
    MagicSignature::new("ELF executable", b"\x7fELF"),
    MagicSignature::new("WebAssembly module", b"\x00asm"),
    MagicSignature::new("Ogg stream", b"OggS"),
    MagicSignature::at("MP4 video", 4, b"ftyp"),
];

/// RIFF containers (WAVE, AVI, WebP) share a prefix and name their kind at offset 8
pub struct RiffSignature;

impl BinarySignature for RiffSignature {
    fn name(&self) -> &'static str {
        "RIFF container"
    }

    fn can_parse(&self, data: &[u8]) -> bool {
        data.len() >= 12 && &data[0..4] == b"RIFF"
    }
}

/// Find the first signature matching the data
pub fn match_signature(data: &[u8]) -> Option<&'static str> {
    if RiffSignature.can_parse(data) {
        return Some(RiffSignature.name());
    }

    MAGIC_SIGNATURES
        .iter()
        .find(|sig| sig.can_parse(data))
        .map(|sig| sig.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_signature() {
        let data = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
        assert_eq!(match_signature(data), Some("PNG image"));
    }

    #[test]
    fn test_offset_signature() {
        let data = b"\x00\x00\x00\x18ftypmp42";
        assert_eq!(match_signature(data), Some("MP4 video"));
    }

    #[test]
    fn test_short_data_does_not_match() {
        assert_eq!(match_signature(b"\x89PN"), None);
        assert_eq!(match_signature(b""), None);
    }

    #[test]
    fn test_riff_signature() {
        let data = b"RIFF\x24\x00\x00\x00WEBPVP8 ";
        assert_eq!(match_signature(data), Some("RIFF container"));
    }

    #[test]
    fn test_plain_text_has_no_signature() {
        assert_eq!(match_signature(b"hello world\n"), None);
    }
}
