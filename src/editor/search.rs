//! Search functionality for text and hex documents
//!
//! Plain and regex searches share one code path: plain queries are escaped
//! and compiled like any other expression. In hex mode the query is rewritten
//! so that byte pairs match across the spaces and line breaks of the dump.

use crate::error::{ContentError, Result};
use regex::{Regex, RegexBuilder};

/// Default cap on the number of reported matches
pub const DEFAULT_MAX_MATCHES: usize = 1024;

/// Separator class allowed between hex pairs in the target text
const HEX_GAP: &str = "[ \r\n]*";

/// User-selected search options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    /// Interpret the query as a regular expression
    pub use_regex: bool,
    /// Match letter case exactly
    pub case_sensitive: bool,
}

impl SearchOptions {
    /// Plain-text search options
    pub fn plain(case_sensitive: bool) -> Self {
        Self {
            use_regex: false,
            case_sensitive,
        }
    }

    /// Regular expression search options
    pub fn regex(case_sensitive: bool) -> Self {
        Self {
            use_regex: true,
            case_sensitive,
        }
    }
}

/// A match as a half-open `[start, end)` range
///
/// Offsets count characters in text mode and bytes of the dump in hex mode
/// (the dump is ASCII, so both coincide there).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

impl Match {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of characters covered
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if an offset lies inside this match
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// A message from a search/replace operation, either an error or informational
#[derive(Debug, Clone, PartialEq)]
pub enum SearchMessage {
    /// The query could not be used
    Error(String),
    /// Something the user should know about (e.g. a promoted replace-all)
    Info(String),
}

/// Result of moving the current-match pointer
///
/// `previous` and `current` index into the match list so the caller can
/// re-highlight both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub previous: Option<usize>,
    pub current: usize,
    pub wrapped: bool,
}

/// Rewrite a hex query so each byte pair tolerates separators in the dump
///
/// Whitespace is dropped from the query, then every run of two alphanumeric
/// characters becomes a pair followed by an optional separator class. The
/// separator after the final pair is removed so matches end on a digit.
pub fn hex_query(pattern: &str) -> String {
    let compact: String = pattern.chars().filter(|c| !c.is_whitespace()).collect();
    let mut out = String::with_capacity(compact.len() * 6);
    let mut chars = compact.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_alphanumeric() {
            if let Some(next) = chars.next_if(|n| n.is_ascii_alphanumeric()) {
                out.push(c);
                out.push(next);
                out.push_str(HEX_GAP);
                continue;
            }
        }
        out.push(c);
    }

    if out.ends_with(HEX_GAP) {
        out.truncate(out.len() - HEX_GAP.len());
    }
    out
}

/// Compile a user query into a regex
pub fn compile(pattern: &str, options: SearchOptions, hex_mode: bool) -> Result<Regex> {
    let mut expr = if options.use_regex {
        pattern.to_string()
    } else {
        regex::escape(pattern)
    };

    if hex_mode {
        expr = hex_query(&expr);
    }

    log::debug!("Compiled search expression: {}", expr);

    RegexBuilder::new(&expr)
        .multi_line(true)
        .dot_matches_new_line(true)
        // Hex digits have no meaningful case
        .case_insensitive(hex_mode || !options.case_sensitive)
        .build()
        .map_err(|e| ContentError::InvalidPattern(e.to_string()))
}

/// Find all matches of `pattern` in `text`, up to `max_matches`
///
/// An empty pattern yields no matches. Text-mode offsets are converted from
/// bytes to characters.
pub fn search(
    text: &str,
    pattern: &str,
    options: SearchOptions,
    hex_mode: bool,
    max_matches: usize,
) -> Result<Vec<Match>> {
    // Hex queries lose their whitespace when rewritten
    if pattern.is_empty() || (hex_mode && pattern.chars().all(char::is_whitespace)) {
        return Ok(Vec::new());
    }

    let re = compile(pattern, options, hex_mode)?;
    let found = re.find_iter(text).take(max_matches);

    if hex_mode {
        return Ok(found.map(|m| Match::new(m.start(), m.end())).collect());
    }

    // Matches are ordered, so character counts accumulate from the previous end
    let mut matches = Vec::new();
    let mut chars_before = 0;
    let mut byte_pos = 0;
    for m in found {
        chars_before += text[byte_pos..m.start()].chars().count();
        let start = chars_before;
        let end = start + m.as_str().chars().count();
        matches.push(Match::new(start, end));
        chars_before = end;
        byte_pos = m.end();
    }

    Ok(matches)
}

/// Search state and results for one document
#[derive(Debug, Default)]
pub struct SearchState {
    /// Query that produced the current matches
    pattern: String,
    /// Options that produced the current matches
    options: SearchOptions,
    /// All matches, left to right, non-overlapping
    matches: Vec<Match>,
    /// Index of the highlighted match
    current: Option<usize>,
    /// Whether the last navigation went past either end
    wrapped: bool,
    /// Last search/replace message (error or informational)
    pub message: Option<SearchMessage>,
}

impl SearchState {
    /// Query that produced the current matches
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Options that produced the current matches
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// All matches of the last successful search
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Index of the highlighted match, `None` when there are no matches
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The highlighted match
    pub fn current_match(&self) -> Option<Match> {
        self.current.and_then(|i| self.matches.get(i).copied())
    }

    /// Whether the last navigation wrapped around
    pub fn wrapped(&self) -> bool {
        self.wrapped
    }

    /// Check if the query/options differ from the ones that produced the matches
    pub fn query_changed(&self, pattern: &str, options: SearchOptions) -> bool {
        self.pattern != pattern || self.options != options
    }

    /// Check if an offset is within any match
    pub fn is_within_match(&self, offset: usize) -> bool {
        let idx = self.matches.partition_point(|m| m.end <= offset);
        self.matches.get(idx).is_some_and(|m| m.contains(offset))
    }

    /// Run a search and make its results current
    ///
    /// On an invalid query the previous results and query are kept, the error
    /// is stored in [`SearchState::message`] and returned.
    pub fn execute(
        &mut self,
        text: &str,
        pattern: &str,
        options: SearchOptions,
        hex_mode: bool,
        max_matches: usize,
    ) -> Result<usize> {
        let matches = match search(text, pattern, options, hex_mode, max_matches) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("Search failed: {}", e);
                self.message = Some(SearchMessage::Error(e.to_string()));
                return Err(e);
            }
        };

        self.pattern = pattern.to_string();
        self.options = options;
        self.matches = matches;
        self.current = if self.matches.is_empty() { None } else { Some(0) };
        self.wrapped = false;
        self.message = None;

        Ok(self.matches.len())
    }

    /// Re-run the last query over new content
    pub fn refresh(&mut self, text: &str, hex_mode: bool, max_matches: usize) -> Result<usize> {
        let pattern = std::mem::take(&mut self.pattern);
        let options = self.options;
        let result = self.execute(text, &pattern, options, hex_mode, max_matches);
        if result.is_err() {
            self.pattern = pattern;
            self.invalidate();
        }
        result
    }

    /// Drop matches after the content changed
    pub fn invalidate(&mut self) {
        self.matches.clear();
        self.current = None;
        self.wrapped = false;
    }

    /// Clear the query, results and message
    pub fn clear(&mut self) {
        self.invalidate();
        self.pattern.clear();
        self.message = None;
    }

    /// Move to the next (or previous) match, wrapping at either end
    pub fn find_next(&mut self, forward: bool) -> Option<Navigation> {
        let len = self.matches.len();
        if len == 0 {
            self.current = None;
            return None;
        }

        let previous = self.current;
        let (current, wrapped) = match (previous, forward) {
            (None, true) => (0, false),
            (None, false) => (len - 1, false),
            (Some(i), true) if i + 1 >= len => (0, true),
            (Some(i), true) => (i + 1, false),
            (Some(0), false) => (len - 1, true),
            (Some(i), false) => (i - 1, false),
        };

        Some(self.move_to(previous, current, wrapped))
    }

    /// Move to the nearest match from a cursor position
    ///
    /// Forward picks the first match starting at or after `cursor`; backward
    /// picks the last match starting before it. Matches already passed in the
    /// search direction are skipped, and the search wraps when none remain.
    pub fn find_from(&mut self, cursor: usize, forward: bool) -> Option<Navigation> {
        let len = self.matches.len();
        if len == 0 {
            self.current = None;
            return None;
        }

        let previous = self.current;
        let idx = self.matches.partition_point(|m| m.start < cursor);
        let (current, wrapped) = if forward {
            if idx < len {
                (idx, false)
            } else {
                (0, true)
            }
        } else if idx > 0 {
            (idx - 1, false)
        } else {
            (len - 1, true)
        };

        Some(self.move_to(previous, current, wrapped))
    }

    fn move_to(&mut self, previous: Option<usize>, current: usize, wrapped: bool) -> Navigation {
        self.current = Some(current);
        self.wrapped = wrapped;
        Navigation {
            previous,
            current,
            wrapped,
        }
    }
}
