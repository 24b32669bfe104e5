//! Headless tab set
//!
//! Each open document is owned by exactly one tab.

use std::path::{Path, PathBuf};

use super::document::Document;
use crate::engine::ContentEngine;
use crate::error::Result;

/// Open documents plus the engine they are loaded and saved with
pub struct Workspace {
    engine: ContentEngine,
    documents: Vec<Document>,
    current: Option<usize>,
    untitled_counter: usize,
}

impl Workspace {
    pub fn new(engine: ContentEngine) -> Self {
        Self {
            engine,
            documents: Vec::new(),
            current: None,
            untitled_counter: 0,
        }
    }

    pub fn engine(&self) -> &ContentEngine {
        &self.engine
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    /// A document together with the engine, for operations that need both
    pub fn get_mut(&mut self, index: usize) -> Option<(&mut Document, &ContentEngine)> {
        let engine = &self.engine;
        self.documents.get_mut(index).map(|doc| (doc, engine))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Document> {
        self.current.and_then(|i| self.documents.get(i))
    }

    pub fn current_mut(&mut self) -> Option<(&mut Document, &ContentEngine)> {
        let index = self.current?;
        self.get_mut(index)
    }

    /// Focus a tab; returns false if `index` is out of range
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.documents.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    /// Add an empty `new{n}` document and focus it
    pub fn new_document(&mut self) -> usize {
        self.untitled_counter += 1;
        let title = format!("new{}", self.untitled_counter);
        self.documents.push(Document::new_untitled(title));
        let index = self.documents.len() - 1;
        self.current = Some(index);
        index
    }

    /// Open a file and focus its tab
    ///
    /// An already open file is focused instead of loaded twice. An untouched
    /// untitled current tab is replaced by the new document.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if let Some(index) = self.lookup(path) {
            self.current = Some(index);
            return Ok(index);
        }

        let document = Document::open(path, &self.engine)?;

        let reusable = self
            .current
            .filter(|&i| self.documents.get(i).is_some_and(Document::is_untouched));
        let index = match reusable {
            Some(index) => {
                self.documents[index] = document;
                index
            }
            None => {
                self.documents.push(document);
                self.documents.len() - 1
            }
        };
        self.current = Some(index);
        Ok(index)
    }

    /// Index of the tab backed by `path`
    pub fn lookup(&self, path: impl AsRef<Path>) -> Option<usize> {
        let wanted = normalize(path.as_ref());
        self.documents
            .iter()
            .position(|doc| doc.path().is_some_and(|p| normalize(p) == wanted))
    }

    /// Close a tab, returning its document
    ///
    /// Focus stays on the same document when possible, otherwise moves to the
    /// tab that took the closed one's place.
    pub fn close(&mut self, index: usize) -> Option<Document> {
        if index >= self.documents.len() {
            return None;
        }
        let document = self.documents.remove(index);

        self.current = match self.current {
            _ if self.documents.is_empty() => None,
            Some(current) if current > index => Some(current - 1),
            Some(current) if current == index => Some(index.min(self.documents.len() - 1)),
            other => other,
        };
        Some(document)
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
