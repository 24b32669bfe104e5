//! Replace functionality for text and hex documents
//!
//! Regular-expression replacement always substitutes every occurrence, even
//! when a single replacement was requested. The outcome reports when that
//! happened so the caller can tell the user.

use super::search::{self, SearchOptions};
use crate::error::{ContentError, Result};
use crate::hex;
use regex::{NoExpand, RegexBuilder};

/// Result of a replace operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// The full new content
    pub text: String,
    /// Number of substitutions made
    pub replaced: usize,
    /// A single replacement was requested but every occurrence was replaced
    pub promoted_to_all: bool,
}

impl ReplaceOutcome {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            replaced: 0,
            promoted_to_all: false,
        }
    }
}

/// Replace occurrences of `pattern` in `text`
///
/// In hex mode `text`, `pattern` and `replacement` are all hex dumps; the
/// result is re-rendered with `group_size` bytes per line. Any failure leaves
/// the caller's content untouched since the new text is only returned on
/// success.
pub fn replace(
    text: &str,
    pattern: &str,
    replacement: &str,
    options: SearchOptions,
    all: bool,
    hex_mode: bool,
    group_size: usize,
) -> Result<ReplaceOutcome> {
    if hex_mode {
        replace_hex(text, pattern, replacement, all, group_size)
    } else if options.use_regex {
        replace_regex(text, pattern, replacement, options, all)
    } else {
        replace_literal(text, pattern, replacement, options, all)
    }
}

/// Literal substring replacement; case folding applies to matching only
fn replace_literal(
    text: &str,
    pattern: &str,
    replacement: &str,
    options: SearchOptions,
    all: bool,
) -> Result<ReplaceOutcome> {
    if pattern.is_empty() {
        return Ok(ReplaceOutcome::unchanged(text));
    }

    let re = RegexBuilder::new(&regex::escape(pattern))
        .case_insensitive(!options.case_sensitive)
        .build()
        .map_err(|e| ContentError::InvalidPattern(e.to_string()))?;

    let limit = if all { 0 } else { 1 };
    let replaced = re.find_iter(text).take(if all { usize::MAX } else { 1 }).count();
    let new_text = re.replacen(text, limit, NoExpand(replacement)).into_owned();

    Ok(ReplaceOutcome {
        text: new_text,
        replaced,
        promoted_to_all: false,
    })
}

/// Regex replacement: always every occurrence, `$n` groups expanded
fn replace_regex(
    text: &str,
    pattern: &str,
    replacement: &str,
    options: SearchOptions,
    all: bool,
) -> Result<ReplaceOutcome> {
    if pattern.is_empty() {
        return Ok(ReplaceOutcome::unchanged(text));
    }

    let re = search::compile(pattern, options, false)?;
    let replaced = re.find_iter(text).count();
    if !all {
        log::info!("Regular expressions always replace all occurrences");
    }

    Ok(ReplaceOutcome {
        text: re.replace_all(text, replacement).into_owned(),
        replaced,
        promoted_to_all: !all && replaced > 0,
    })
}

/// Byte-sequence replacement over a hex dump
fn replace_hex(
    text: &str,
    pattern: &str,
    replacement: &str,
    all: bool,
    group_size: usize,
) -> Result<ReplaceOutcome> {
    let needle = hex::decode(pattern)?;
    let with = hex::decode(replacement)?;
    let data = hex::decode(text)?;

    if needle.is_empty() {
        return Ok(ReplaceOutcome::unchanged(text));
    }

    let (data, replaced) = replace_bytes(&data, &needle, &with, if all { None } else { Some(1) });

    Ok(ReplaceOutcome {
        text: hex::encode(&data, group_size),
        replaced,
        promoted_to_all: false,
    })
}

/// Replace non-overlapping occurrences of `needle`, left to right
///
/// `limit` caps the number of substitutions; `None` replaces all.
pub fn replace_bytes(
    data: &[u8],
    needle: &[u8],
    with: &[u8],
    limit: Option<usize>,
) -> (Vec<u8>, usize) {
    if needle.is_empty() {
        return (data.to_vec(), 0);
    }

    let mut out = Vec::with_capacity(data.len());
    let mut count = 0;
    let mut i = 0;

    while i < data.len() {
        let may_replace = limit.map_or(true, |l| count < l);
        if may_replace && data[i..].starts_with(needle) {
            out.extend_from_slice(with);
            i += needle.len();
            count += 1;
        } else {
            out.push(data[i]);
            i += 1;
        }
    }

    (out, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_replace_first() {
        let out = replace("a.b a.b a.b", "a.b", "X", SearchOptions::plain(true), false, false, 16).unwrap();
        assert_eq!(out.text, "X a.b a.b");
        assert_eq!(out.replaced, 1);
        assert!(!out.promoted_to_all);
    }

    #[test]
    fn test_literal_replace_all() {
        let out = replace("a.b axb a.b", "a.b", "X", SearchOptions::plain(true), true, false, 16).unwrap();
        assert_eq!(out.text, "X axb X");
        assert_eq!(out.replaced, 2);
    }

    #[test]
    fn test_literal_case_insensitive_keeps_replacement_case() {
        let out = replace("Foo foo FOO", "foo", "Bar", SearchOptions::plain(false), true, false, 16).unwrap();
        assert_eq!(out.text, "Bar Bar Bar");

        let out = replace("Foo foo FOO", "foo", "Bar", SearchOptions::plain(true), true, false, 16).unwrap();
        assert_eq!(out.text, "Foo Bar FOO");
    }

    #[test]
    fn test_literal_replacement_is_not_expanded() {
        let out = replace("cost", "cost", "$1 each", SearchOptions::plain(true), false, false, 16).unwrap();
        assert_eq!(out.text, "$1 each");
    }

    #[test]
    fn test_regex_single_replace_promotes_to_all() {
        let out = replace("cat bat rat", "[cbr]at", "dog", SearchOptions::regex(true), false, false, 16).unwrap();
        assert_eq!(out.text, "dog dog dog");
        assert_eq!(out.replaced, 3);
        assert!(out.promoted_to_all);
    }

    #[test]
    fn test_regex_expands_groups() {
        let out = replace("john smith", r"(\w+) (\w+)", "$2 $1", SearchOptions::regex(true), true, false, 16).unwrap();
        assert_eq!(out.text, "smith john");
        assert!(!out.promoted_to_all);
    }

    #[test]
    fn test_regex_invalid_pattern() {
        let err = replace("abc", "(", "x", SearchOptions::regex(true), true, false, 16).unwrap_err();
        assert!(matches!(err, ContentError::InvalidPattern(_)));
    }

    #[test]
    fn test_hex_replace_first_and_all() {
        let text = "de ad de\nad 00";
        let out = replace(text, "dead", "beef", SearchOptions::default(), false, true, 3).unwrap();
        assert_eq!(out.text, "be ef de\nad 00");
        assert_eq!(out.replaced, 1);

        let out = replace(text, "de ad", "ff", SearchOptions::default(), true, true, 3).unwrap();
        assert_eq!(out.text, "ff ff 00");
        assert_eq!(out.replaced, 2);
    }

    #[test]
    fn test_hex_replace_rejects_invalid_hex() {
        let text = "de ad";
        for (pattern, replacement) in [("zz", "00"), ("de", "0"), ("de", "xx")] {
            let err = replace(text, pattern, replacement, SearchOptions::default(), true, true, 16).unwrap_err();
            assert!(matches!(err, ContentError::InvalidHex(_)));
        }
    }

    #[test]
    fn test_empty_pattern_is_noop() {
        let out = replace("abc", "", "x", SearchOptions::plain(true), true, false, 16).unwrap();
        assert_eq!(out, ReplaceOutcome::unchanged("abc"));
    }

    #[test]
    fn test_replace_bytes() {
        let (out, n) = replace_bytes(b"aaaa", b"aa", b"b", None);
        assert_eq!(out, b"bb");
        assert_eq!(n, 2);

        let (out, n) = replace_bytes(b"abcabc", b"bc", b"", Some(1));
        assert_eq!(out, b"aabc");
        assert_eq!(n, 1);
    }
}
