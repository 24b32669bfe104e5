//! goatee: content engine of a tabbed text/hex editor
//!
//! Detects how a file is encoded, converts it to canonical UTF-8 text (or a
//! hex dump for binary data), classifies it for syntax highlighting, and runs
//! find/replace over the result.

pub mod editor;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod formats;
pub mod hex;
pub mod language;
pub mod settings;

pub use editor::{Document, SearchOptions, Workspace};
pub use encoding::{Charset, DocumentEncoding};
pub use engine::ContentEngine;
pub use error::{ContentError, Result};
pub use settings::Config;
