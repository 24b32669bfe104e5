//! Content pipeline shared by all documents
//!
//! Raw bytes -> detection -> transcoding (or hex dump) -> language tag on load,
//! and the inverse on save.

use crate::encoding::{self, Charset, CharsetConverter, CharsetRegistry, DocumentEncoding};
use crate::error::{ContentError, Result};
use crate::hex;
use crate::language::{self, BuiltinLanguages, LanguageRegistry, HEX_TAG};
use crate::settings::Config;

/// Content decoded from a file, ready to populate a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedContent {
    pub encoding: DocumentEncoding,
    pub language: String,
    pub text: String,
}

/// Registries, converter and limits used by document operations
pub struct ContentEngine {
    languages: Box<dyn LanguageRegistry>,
    converter: CharsetConverter,
    max_matches: usize,
    hex_group_size: usize,
}

impl ContentEngine {
    /// Create an engine with injected registries and configured limits
    pub fn new(languages: Box<dyn LanguageRegistry>, charsets: CharsetRegistry, config: &Config) -> Self {
        Self {
            languages,
            converter: CharsetConverter::new(charsets),
            max_matches: config.search.max_items.max(1),
            hex_group_size: config.hex.bytes_in_line.max(1),
        }
    }

    /// Engine with the built-in registries
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Box::new(BuiltinLanguages::new()),
            CharsetRegistry::default(),
            config,
        )
    }

    pub fn languages(&self) -> &dyn LanguageRegistry {
        self.languages.as_ref()
    }

    pub fn converter(&self) -> &CharsetConverter {
        &self.converter
    }

    /// Maximum number of matches a search reports
    pub fn max_matches(&self) -> usize {
        self.max_matches
    }

    /// Bytes per hex dump line
    pub fn hex_group_size(&self) -> usize {
        self.hex_group_size
    }

    /// Classify content into a language tag
    pub fn classify(&self, filename: &str, sample: &[u8]) -> String {
        language::classify(self.languages(), filename, sample)
    }

    /// Turn raw file bytes into canonical content
    ///
    /// Never fails: content that cannot be detected or transcoded is shown as
    /// a hex dump instead.
    pub fn load(&self, filename: &str, data: &[u8]) -> LoadedContent {
        let encoding = match encoding::detect(data) {
            Ok(encoding) => encoding,
            Err(e) => {
                log::warn!("{}: {}, opening as binary", filename, e);
                DocumentEncoding::Binary
            }
        };

        if let DocumentEncoding::Text(charset) = encoding {
            match self.decode_text(data, charset) {
                Ok(text) => {
                    let language = self.classify(filename, text.as_bytes());
                    log::info!("{}: {} text, language {}", filename, charset, language);
                    return LoadedContent {
                        encoding,
                        language,
                        text,
                    };
                }
                Err(e) => {
                    log::warn!("{}: {}, opening as binary", filename, e);
                }
            }
        }

        LoadedContent {
            encoding: DocumentEncoding::Binary,
            language: HEX_TAG.to_string(),
            text: hex::encode(data, self.hex_group_size),
        }
    }

    fn decode_text(&self, data: &[u8], charset: Charset) -> Result<String> {
        if charset == Charset::Utf8 {
            return encoding::convert::decode(data, charset);
        }
        self.converter.to_canonical(data, charset.name())
    }

    /// Turn canonical content back into raw file bytes
    pub fn render(&self, text: &str, encoding: DocumentEncoding) -> Result<Vec<u8>> {
        match encoding {
            DocumentEncoding::Binary => hex::decode(text),
            DocumentEncoding::Text(Charset::Utf8) => Ok(text.as_bytes().to_vec()),
            DocumentEncoding::Text(charset) => self.converter.from_canonical(text, charset.name()),
        }
    }

    /// Check that `text` can be saved in `charset`
    pub fn check_representable(&self, text: &str, charset: Charset) -> Result<()> {
        if !self.converter.registry().supports(charset) {
            return Err(ContentError::UnsupportedCharset {
                from: "UTF-8".to_string(),
                to: charset.name().to_string(),
            });
        }
        self.render(text, DocumentEncoding::Text(charset)).map(|_| ())
    }
}

impl Default for ContentEngine {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
