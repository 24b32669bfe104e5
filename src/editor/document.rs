//! A single open document
//!
//! The document holds only canonical text. Binary files are kept as their hex
//! dump, so there is never a second raw-byte copy to keep in sync; the bytes
//! are rebuilt from the text on save.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use super::replace;
use super::search::{Navigation, SearchMessage, SearchOptions, SearchState};
use crate::encoding::{Charset, DocumentEncoding, BINARY};
use crate::engine::ContentEngine;
use crate::error::{ContentError, Result};

/// Shown when a regex replace was asked to replace a single occurrence
const PROMOTED_NOTICE: &str = "Regular expressions always replace all occurrences";

/// Editor document: content, its on-disk representation and search state
#[derive(Debug)]
pub struct Document {
    /// Backing file, `None` for an unsaved buffer
    path: Option<PathBuf>,

    /// Tab title
    title: String,

    /// Charset (or binary) used to read and write the backing file
    encoding: DocumentEncoding,

    /// Highlighting language tag, empty when unknown
    language: String,

    /// Backing file could not be opened for writing
    read_only: bool,

    /// Canonical content; a hex dump when `encoding` is binary
    text: String,

    /// Content changed since open/save
    modified: bool,

    search: SearchState,
}

impl Document {
    /// Create an empty UTF-8 document with no backing file
    pub fn new_untitled(title: impl Into<String>) -> Self {
        Self {
            path: None,
            title: title.into(),
            encoding: DocumentEncoding::default(),
            language: String::new(),
            read_only: false,
            text: String::new(),
            modified: false,
            search: SearchState::default(),
        }
    }

    /// Read a file and build a document from it
    pub fn open(path: impl AsRef<Path>, engine: &ContentEngine) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| ContentError::file_access(path, e))?;
        let loaded = engine.load(&path.to_string_lossy(), &data);
        let read_only = !is_writable(path);

        log::info!(
            "Opened {} ({} bytes, {}{})",
            path.display(),
            data.len(),
            loaded.encoding,
            if read_only { ", read-only" } else { "" }
        );

        Ok(Self {
            path: Some(path.to_path_buf()),
            title: title_for(path),
            encoding: loaded.encoding,
            language: loaded.language,
            read_only,
            text: loaded.text,
            modified: false,
            search: SearchState::default(),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn encoding(&self) -> DocumentEncoding {
        self.encoding
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Binary documents are edited and searched as hex dumps
    pub fn is_hex_mode(&self) -> bool {
        self.encoding.is_binary()
    }

    /// Untitled, empty and never edited
    pub fn is_untouched(&self) -> bool {
        self.path.is_none() && !self.modified && self.text.is_empty()
    }

    /// The current content
    pub fn canonical_text(&self) -> &str {
        &self.text
    }

    /// Replace the content wholesale (an edit reported by the editing widget)
    ///
    /// Matches are dropped; call [`Document::refresh_search`] to re-run the
    /// last query.
    pub fn set_canonical_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.modified = true;
        self.search.invalidate();
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    /// Re-run the last query over the current content
    pub fn refresh_search(&mut self, engine: &ContentEngine) {
        if self.search.pattern().is_empty() {
            self.search.invalidate();
            return;
        }
        // Failures are kept in the search message
        let _ = self
            .search
            .refresh(&self.text, self.is_hex_mode(), engine.max_matches());
    }

    /// Write the content back to the backing file
    pub fn save(&mut self, engine: &ContentEngine) -> Result<()> {
        let path = self.path.clone().ok_or(ContentError::NoBackingFile)?;
        if self.read_only {
            return Err(ContentError::ReadOnly(path));
        }
        self.write_to(&path, engine)?;
        self.modified = false;
        Ok(())
    }

    /// Write the content to `path` and make it the backing file
    pub fn save_as(&mut self, path: impl AsRef<Path>, engine: &ContentEngine) -> Result<()> {
        let path = path.as_ref();
        self.write_to(path, engine)?;
        self.path = Some(path.to_path_buf());
        self.title = title_for(path);
        self.read_only = false;
        self.modified = false;
        Ok(())
    }

    /// Render then write; nothing touches the disk if rendering fails
    fn write_to(&self, path: &Path, engine: &ContentEngine) -> Result<()> {
        let bytes = engine.render(&self.text, self.encoding)?;
        fs::write(path, &bytes).map_err(|e| ContentError::file_access(path, e))?;
        log::info!(
            "Saved {} ({} bytes, {})",
            path.display(),
            bytes.len(),
            self.encoding
        );
        Ok(())
    }

    /// Reload from the backing file, discarding edits
    pub fn revert(&mut self, engine: &ContentEngine) -> Result<()> {
        let path = self.path.clone().ok_or(ContentError::NoBackingFile)?;
        let reloaded = Self::open(&path, engine)?;
        let search = std::mem::take(&mut self.search);
        *self = Self { search, ..reloaded };
        self.refresh_search(engine);
        Ok(())
    }

    /// Change the charset used for the next save
    ///
    /// Fails, leaving the document unchanged, when the content cannot be
    /// represented in `charset`. Binary documents keep their encoding.
    pub fn set_encoding(&mut self, charset: Charset, engine: &ContentEngine) -> Result<()> {
        let current = match self.encoding {
            DocumentEncoding::Binary => {
                return Err(ContentError::UnsupportedCharset {
                    from: BINARY.to_string(),
                    to: charset.name().to_string(),
                })
            }
            DocumentEncoding::Text(current) => current,
        };
        if current == charset {
            return Ok(());
        }

        engine.check_representable(&self.text, charset)?;
        log::info!("{}: encoding {} -> {}", self.title, current, charset);
        self.encoding = DocumentEncoding::Text(charset);
        self.modified = true;
        Ok(())
    }

    /// Override the highlighting language; returns false for unknown tags
    pub fn set_language(&mut self, tag: &str, engine: &ContentEngine) -> bool {
        if self.is_hex_mode() || !engine.languages().is_known(tag) {
            return false;
        }
        self.language = tag.to_string();
        true
    }

    /// Search the content, making the first match current
    pub fn find(
        &mut self,
        pattern: &str,
        options: SearchOptions,
        engine: &ContentEngine,
    ) -> Result<usize> {
        self.search.execute(
            &self.text,
            pattern,
            options,
            self.is_hex_mode(),
            engine.max_matches(),
        )
    }

    /// Step to the next or previous match
    pub fn find_next(&mut self, forward: bool) -> Option<Navigation> {
        self.search.find_next(forward)
    }

    /// Jump to the nearest match relative to a cursor offset
    pub fn find_from(&mut self, cursor: usize, forward: bool) -> Option<Navigation> {
        self.search.find_from(cursor, forward)
    }

    /// Replace occurrences of `pattern` and re-run the search
    ///
    /// Returns the number of substitutions. On error the content and the
    /// previous matches are untouched and the error is kept as the search
    /// message.
    pub fn replace(
        &mut self,
        pattern: &str,
        replacement: &str,
        options: SearchOptions,
        all: bool,
        engine: &ContentEngine,
    ) -> Result<usize> {
        let outcome = match replace::replace(
            &self.text,
            pattern,
            replacement,
            options,
            all,
            self.is_hex_mode(),
            engine.hex_group_size(),
        ) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("Replace failed: {}", e);
                self.search.message = Some(SearchMessage::Error(e.to_string()));
                return Err(e);
            }
        };

        if outcome.replaced > 0 {
            self.set_canonical_text(outcome.text);
        }
        self.find(pattern, options, engine)?;

        if outcome.promoted_to_all {
            self.search.message = Some(SearchMessage::Info(PROMOTED_NOTICE.to_string()));
        }
        Ok(outcome.replaced)
    }
}

fn is_writable(path: &Path) -> bool {
    OpenOptions::new().write(true).open(path).is_ok()
}

fn title_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRENCH: &str = "Le café était très chaud, déjà prêt à Noël. \
        Où est la pâtisserie près de l'hôtel ? Voilà une idée géniale.\n";

    fn write_file(dir: &tempfile::TempDir, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_untitled_defaults() {
        let doc = Document::new_untitled("new1");
        assert_eq!(doc.title(), "new1");
        assert_eq!(doc.path(), None);
        assert_eq!(doc.encoding(), DocumentEncoding::Text(Charset::Utf8));
        assert!(doc.is_untouched());
        assert!(!doc.is_hex_mode());
    }

    #[test]
    fn test_open_utf8_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "main.rs", b"fn main() {}\n");
        let doc = Document::open(&path, &ContentEngine::default()).unwrap();

        assert_eq!(doc.title(), "main.rs");
        assert_eq!(doc.canonical_text(), "fn main() {}\n");
        assert_eq!(doc.language(), "rust");
        assert!(!doc.is_read_only());
        assert!(!doc.is_modified());
        assert!(!doc.is_untouched());
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::open(dir.path().join("nope"), &ContentEngine::default()).unwrap_err();
        assert!(matches!(err, ContentError::FileAccess { .. }));
    }

    #[test]
    fn test_latin1_round_trip() {
        let engine = ContentEngine::default();
        let original = encoding_rs::WINDOWS_1252.encode(FRENCH).0.into_owned();
        assert!(std::str::from_utf8(&original).is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "notes.txt", &original);
        let mut doc = Document::open(&path, &engine).unwrap();

        assert!(doc.encoding().is_text());
        assert_eq!(doc.canonical_text(), FRENCH);

        let copy = dir.path().join("copy.txt");
        doc.save_as(&copy, &engine).unwrap();
        assert_eq!(fs::read(&copy).unwrap(), original);
    }

    #[test]
    fn test_short_latin_file_saves_exact_bytes() {
        let engine = ContentEngine::default();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "cafe.txt", b"caf\xe9");
        let mut doc = Document::open(&path, &engine).unwrap();

        assert!(matches!(
            doc.encoding(),
            DocumentEncoding::Text(Charset::Windows1252 | Charset::Iso8859_1 | Charset::Iso8859_15)
        ));
        assert_eq!(doc.canonical_text(), "café");

        doc.save(&engine).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"caf\xe9");
    }

    #[test]
    fn test_binary_document_edit_and_save() {
        let engine = ContentEngine::default();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "blob.bin", &[0x00, 0x01, 0xde, 0xad, 0xbe, 0xef]);
        let mut doc = Document::open(&path, &engine).unwrap();

        assert!(doc.is_hex_mode());
        assert_eq!(doc.language(), "hex");
        assert_eq!(doc.canonical_text(), "00 01 de ad be ef");

        assert_eq!(doc.find("DE AD", SearchOptions::default(), &engine).unwrap(), 1);
        assert_eq!(
            doc.replace("dead", "0000", SearchOptions::default(), true, &engine).unwrap(),
            1
        );
        assert_eq!(doc.canonical_text(), "00 01 00 00 be ef");
        assert!(doc.search().matches().is_empty());

        doc.save(&engine).unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![0x00, 0x01, 0x00, 0x00, 0xbe, 0xef]);
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_invalid_hex_save_writes_nothing() {
        let engine = ContentEngine::default();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "blob.bin", &[0x00, 0xff]);
        let mut doc = Document::open(&path, &engine).unwrap();

        doc.set_canonical_text("00 f");
        assert!(matches!(doc.save(&engine), Err(ContentError::InvalidHex(_))));
        assert_eq!(fs::read(&path).unwrap(), vec![0x00, 0xff]);
        assert!(doc.is_modified());
    }

    #[test]
    fn test_save_without_path() {
        let mut doc = Document::new_untitled("new1");
        assert!(matches!(
            doc.save(&ContentEngine::default()),
            Err(ContentError::NoBackingFile)
        ));
    }

    #[test]
    fn test_read_only_save_refused() {
        let engine = ContentEngine::default();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "locked.txt", b"hello\n");
        let mut doc = Document::open(&path, &engine).unwrap();
        doc.read_only = true;

        doc.set_canonical_text("changed\n");
        assert!(matches!(doc.save(&engine), Err(ContentError::ReadOnly(_))));
        assert_eq!(fs::read(&path).unwrap(), b"hello\n");

        let other = dir.path().join("other.txt");
        doc.save_as(&other, &engine).unwrap();
        assert!(!doc.is_read_only());
        assert_eq!(doc.title(), "other.txt");
        assert_eq!(fs::read(&other).unwrap(), b"changed\n");
    }

    #[test]
    fn test_set_encoding() {
        let engine = ContentEngine::default();
        let dir = tempfile::tempdir().unwrap();
        let mut doc = Document::new_untitled("new1");
        doc.set_canonical_text("café");

        assert!(doc.set_encoding(Charset::Koi8R, &engine).is_err());
        assert_eq!(doc.encoding(), DocumentEncoding::Text(Charset::Utf8));

        doc.set_encoding(Charset::Iso8859_1, &engine).unwrap();
        let path = dir.path().join("out.txt");
        doc.save_as(&path, &engine).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"caf\xe9");
    }

    #[test]
    fn test_set_encoding_on_binary() {
        let engine = ContentEngine::default();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "blob.bin", &[0x00, 0x01]);
        let mut doc = Document::open(&path, &engine).unwrap();

        let err = doc.set_encoding(Charset::Utf8, &engine).unwrap_err();
        assert!(matches!(err, ContentError::UnsupportedCharset { .. }));
        assert!(doc.is_hex_mode());
    }

    #[test]
    fn test_set_language() {
        let engine = ContentEngine::default();
        let mut doc = Document::new_untitled("new1");
        assert!(doc.set_language("python3", &engine));
        assert_eq!(doc.language(), "python3");
        assert!(!doc.set_language("klingon", &engine));
        assert_eq!(doc.language(), "python3");
    }

    #[test]
    fn test_edit_invalidates_matches() {
        let engine = ContentEngine::default();
        let mut doc = Document::new_untitled("new1");
        doc.set_canonical_text("one two one");
        assert_eq!(doc.find("one", SearchOptions::plain(true), &engine).unwrap(), 2);

        doc.set_canonical_text("one two one one");
        assert!(doc.search().matches().is_empty());
        assert!(doc.is_modified());

        doc.refresh_search(&engine);
        assert_eq!(doc.search().matches().len(), 3);
        assert_eq!(doc.search().current_index(), Some(0));
    }

    #[test]
    fn test_navigation() {
        let engine = ContentEngine::default();
        let mut doc = Document::new_untitled("new1");
        doc.set_canonical_text("ab ab ab");
        doc.find("ab", SearchOptions::plain(true), &engine).unwrap();

        let nav = doc.find_from(4, true).unwrap();
        assert_eq!(nav.current, 2);
        let nav = doc.find_next(true).unwrap();
        assert_eq!(nav.current, 0);
        assert!(nav.wrapped);
    }

    #[test]
    fn test_regex_replace_reports_promotion() {
        let engine = ContentEngine::default();
        let mut doc = Document::new_untitled("new1");
        doc.set_canonical_text("cat bat rat");

        let replaced = doc
            .replace("[cb]at", "dog", SearchOptions::regex(true), false, &engine)
            .unwrap();
        assert_eq!(replaced, 2);
        assert_eq!(doc.canonical_text(), "dog dog rat");
        assert!(matches!(doc.search().message, Some(SearchMessage::Info(_))));
    }

    #[test]
    fn test_replace_error_keeps_state() {
        let engine = ContentEngine::default();
        let mut doc = Document::new_untitled("new1");
        doc.set_canonical_text("abc abc");
        doc.find("abc", SearchOptions::plain(true), &engine).unwrap();

        let err = doc
            .replace("(", "x", SearchOptions::regex(true), true, &engine)
            .unwrap_err();
        assert!(matches!(err, ContentError::InvalidPattern(_)));
        assert_eq!(doc.canonical_text(), "abc abc");
        assert_eq!(doc.search().matches().len(), 2);
        assert!(matches!(doc.search().message, Some(SearchMessage::Error(_))));
    }

    #[test]
    fn test_revert() {
        let engine = ContentEngine::default();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", b"alpha beta alpha\n");
        let mut doc = Document::open(&path, &engine).unwrap();
        doc.find("alpha", SearchOptions::plain(true), &engine).unwrap();

        doc.set_canonical_text("gone");
        doc.revert(&engine).unwrap();

        assert_eq!(doc.canonical_text(), "alpha beta alpha\n");
        assert!(!doc.is_modified());
        assert_eq!(doc.search().matches().len(), 2);
    }
}
