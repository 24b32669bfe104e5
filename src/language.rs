//! Syntax language classification
//!
//! Maps a file name and a content sample to a highlighting language tag. The
//! set of known tags belongs to the highlighting registry, which is injected
//! through [`LanguageRegistry`].

use std::collections::BTreeSet;
use std::path::Path;

/// Tag used when nothing else matches, and for `rc` files
pub const SHELL_TAG: &str = "sh";

/// Tag for documents shown as a hex dump
pub const HEX_TAG: &str = "hex";

/// Number of leading sample bytes searched for the first line
pub const FIRST_LINE_LEN: usize = 64;

/// Preference order for files with `#` comment lines
const HASH_COMMENT_FAMILY: [&str; 3] = ["toml", "yaml", SHELL_TAG];

/// Preference order for files with `;` comments or `[section]` headers
const INI_FAMILY: [&str; 2] = ["ini", "toml"];

/// Extensions conventionally used for ini-style configuration
const INI_EXTENSIONS: [&str; 2] = ["conf", "cfg"];

/// The highlighting registry as seen by the classifier
pub trait LanguageRegistry {
    /// Check if `tag` names a registered language
    fn is_known(&self, tag: &str) -> bool;

    /// Best guess for a file name alone, if the registry has one
    fn guess_by_filename(&self, filename: &str) -> Option<String>;
}

/// Classify a file into a language tag
///
/// Never fails: falls back to [`SHELL_TAG`] when no heuristic matches.
pub fn classify(registry: &dyn LanguageRegistry, filename: &str, sample: &[u8]) -> String {
    let path = Path::new(filename);
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    let basename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if !ext.is_empty() && registry.is_known(&ext) {
        return ext;
    }

    if basename.ends_with("rc") {
        return SHELL_TAG.to_string();
    }

    if let Some(tag) = classify_first_line(registry, sample) {
        return tag;
    }

    if let Some(tag) = classify_lines(registry, sample) {
        return tag;
    }

    if INI_EXTENSIONS.contains(&ext.as_str()) && registry.is_known("ini") {
        return "ini".to_string();
    }

    if let Some(tag) = registry
        .guess_by_filename(filename)
        .map(|t| t.to_lowercase())
        .filter(|t| !t.is_empty())
    {
        return tag;
    }

    SHELL_TAG.to_string()
}

/// Interpreter hints on the first line (`#!/usr/bin/env X`, `#!/bin/X`, `<?xml`)
fn classify_first_line(registry: &dyn LanguageRegistry, sample: &[u8]) -> Option<String> {
    let head = &sample[..sample.len().min(FIRST_LINE_LEN)];
    let line = head.split(|&b| b == b'\n').next().unwrap_or_default();
    let line = String::from_utf8_lossy(line);
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let first = *tokens.first()?;
    let last = *tokens.last()?;

    if registry.is_known(last) {
        return Some(last.to_string());
    }

    let interpreter = first.rsplit('/').next().unwrap_or(first);
    if registry.is_known(interpreter) {
        return Some(interpreter.to_string());
    }

    let stripped = first.trim_matches(|c| matches!(c, '<' | '?' | '#'));
    if registry.is_known(stripped) {
        return Some(stripped.to_string());
    }

    None
}

/// Comment and section syntax anywhere in the sample
fn classify_lines(registry: &dyn LanguageRegistry, sample: &[u8]) -> Option<String> {
    for line in sample.split(|&b| b == b'\n') {
        let family: &[&str] = match line.first() {
            Some(b'#') => &HASH_COMMENT_FAMILY,
            Some(b';') | Some(b'[') => &INI_FAMILY,
            _ => continue,
        };

        if let Some(tag) = family.iter().find(|tag| registry.is_known(tag)) {
            return Some(tag.to_string());
        }
    }
    None
}

/// Language ids shipped with the default registry
const BUILTIN_LANGUAGES: &[&str] = &[
    "awk", "c", "changelog", "cmake", "cpp", "csharp", "css", "desktop", "diff", "dockerfile",
    "dtd", "go", "haskell", "hex", "html", "ini", "java", "js", "json", "latex", "lua",
    "makefile", "markdown", "meson", "nix", "perl", "php", "python", "python3", "ruby", "rust",
    "scss", "sh", "sql", "toml", "typescript", "xml", "yaml",
];

/// File name patterns for the fallback guess: `*.ext` or an exact base name
const BUILTIN_GLOBS: &[(&str, &str)] = &[
    ("*.awk", "awk"),
    ("*.h", "c"),
    ("*.cc", "cpp"),
    ("*.cxx", "cpp"),
    ("*.hpp", "cpp"),
    ("*.cs", "csharp"),
    ("*.patch", "diff"),
    ("Dockerfile", "dockerfile"),
    ("*.hs", "haskell"),
    ("*.htm", "html"),
    ("*.mjs", "js"),
    ("*.tex", "latex"),
    ("Makefile", "makefile"),
    ("GNUmakefile", "makefile"),
    ("*.mk", "makefile"),
    ("*.md", "markdown"),
    ("meson.build", "meson"),
    ("CMakeLists.txt", "cmake"),
    ("*.pl", "perl"),
    ("*.pm", "perl"),
    ("*.py", "python3"),
    ("*.rb", "ruby"),
    ("Gemfile", "ruby"),
    ("*.rs", "rust"),
    ("*.bash", "sh"),
    ("*.zsh", "sh"),
    ("*.ts", "typescript"),
    ("*.svg", "xml"),
    ("*.xsl", "xml"),
    ("*.yml", "yaml"),
    ("ChangeLog", "changelog"),
];

/// Default registry: a fixed set of gtksourceview-style language ids
#[derive(Clone, Debug)]
pub struct BuiltinLanguages {
    languages: BTreeSet<String>,
    globs: Vec<(String, String)>,
}

impl BuiltinLanguages {
    /// Registry with the built-in language set and file name table
    pub fn new() -> Self {
        Self {
            languages: BUILTIN_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            globs: BUILTIN_GLOBS
                .iter()
                .map(|(glob, tag)| (glob.to_string(), tag.to_string()))
                .collect(),
        }
    }

    /// Registry with a custom language set and no file name table
    pub fn with_languages<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
            globs: Vec::new(),
        }
    }

    /// Add a file name pattern (`*.ext` or exact base name) for the fallback guess
    pub fn with_glob(mut self, glob: impl Into<String>, tag: impl Into<String>) -> Self {
        self.globs.push((glob.into(), tag.into()));
        self
    }

    /// All registered language ids, sorted
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(String::as_str)
    }
}

impl Default for BuiltinLanguages {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageRegistry for BuiltinLanguages {
    fn is_known(&self, tag: &str) -> bool {
        self.languages.contains(tag)
    }

    fn guess_by_filename(&self, filename: &str) -> Option<String> {
        let basename = Path::new(filename).file_name()?.to_string_lossy();
        self.globs
            .iter()
            .find(|(glob, _)| match glob.strip_prefix("*.") {
                Some(ext) => basename
                    .rsplit_once('.')
                    .is_some_and(|(_, e)| e.eq_ignore_ascii_case(ext)),
                None => basename == glob.as_str(),
            })
            .map(|(_, tag)| tag.clone())
            .filter(|tag| self.is_known(tag))
    }
}
