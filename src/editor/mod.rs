//! Editor module: documents, tabs, and find/replace

pub mod document;
pub mod replace;
pub mod search;
pub mod workspace;

pub use document::Document;
pub use replace::ReplaceOutcome;
pub use search::{Match, Navigation, SearchMessage, SearchOptions, SearchState};
pub use workspace::Workspace;
