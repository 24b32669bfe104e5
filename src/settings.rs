//! Editor configuration persistence
//!
//! Configuration is stored as JSON. The first readable file among these wins:
//! - the platform config location (`~/.config/goatee/config.json` on Linux,
//!   `~/Library/Application Support/goatee/config.json` on macOS,
//!   `%APPDATA%/goatee/config.json` on Windows)
//! - `goatee.json` in the working directory

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::editor::search::DEFAULT_MAX_MATCHES;
use crate::hex::DEFAULT_GROUP_SIZE;

/// Text view settings consumed by the editing widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TextViewConfig {
    /// Tab width in columns
    pub indent_width: u32,
    /// Insert spaces instead of tabs
    pub indent_space: bool,
    /// Wrap long lines
    pub word_wrap: bool,
}

impl Default for TextViewConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            indent_space: false,
            word_wrap: true,
        }
    }
}

/// Search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchConfig {
    /// Maximum number of matches reported by one search
    pub max_items: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_MATCHES,
        }
    }
}

/// Hex dump settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HexConfig {
    /// Bytes per hex dump line
    pub bytes_in_line: usize,
}

impl Default for HexConfig {
    fn default() -> Self {
        Self {
            bytes_in_line: DEFAULT_GROUP_SIZE,
        }
    }
}

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub text_view: TextViewConfig,
    pub search: SearchConfig,
    pub hex: HexConfig,

    /// File this configuration was loaded from, and is saved back to
    #[serde(skip)]
    path: Option<PathBuf>,
}

/// Kind and constraints of a configurable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int { min: i64, max: i64 },
}

/// Current value of a configurable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
}

/// Describes one configurable field for a preferences view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Section key, as in the config file
    pub section: &'static str,
    /// Field key, as in the config file
    pub key: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    const fn new(section: &'static str, key: &'static str, kind: FieldKind) -> Self {
        Self { section, key, kind }
    }

    /// Human-readable label for the field
    pub fn label(&self) -> String {
        format_label(self.key)
    }

    /// Human-readable label for the section
    pub fn section_label(&self) -> String {
        format_label(self.section)
    }
}

/// Every configurable field, in display order
const DESCRIPTORS: &[FieldDescriptor] = &[
    FieldDescriptor::new("text-view", "indent-width", FieldKind::Int { min: 1, max: 16 }),
    FieldDescriptor::new("text-view", "indent-space", FieldKind::Bool),
    FieldDescriptor::new("text-view", "word-wrap", FieldKind::Bool),
    FieldDescriptor::new("search", "max-items", FieldKind::Int { min: 1, max: 100_000 }),
    FieldDescriptor::new("hex", "bytes-in-line", FieldKind::Int { min: 1, max: 1024 }),
];

/// Turn a config key into a label: "bytes-in-line" or "bytesInLine" -> "Bytes In Line"
pub fn format_label(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c == '-' || c == '_' {
            spaced.push(' ');
        } else {
            if c.is_uppercase() {
                spaced.push(' ');
            }
            spaced.push(c);
        }
    }

    spaced
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Config {
    /// Candidate config files, in priority order
    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(mut path) = dirs::config_dir() {
            path.push("goatee");
            path.push("config.json");
            paths.push(path);
        }
        paths.push(PathBuf::from("goatee.json"));
        paths
    }

    /// Load configuration from the first readable candidate, or return defaults
    pub fn load() -> Self {
        let candidates = Self::candidate_paths();

        for path in &candidates {
            if let Some(config) = Self::load_from(path) {
                return config;
            }
        }

        let mut config = Self::default();
        config.path = candidates.into_iter().next();
        config
    }

    /// Load configuration from a specific file
    ///
    /// Returns `None` (after logging) if the file is missing or malformed.
    pub fn load_from(path: &Path) -> Option<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Config>(&contents) {
                Ok(mut config) => {
                    log::info!("Loaded config from {}", path.display());
                    config.validate();
                    config.path = Some(path.to_path_buf());
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Failed to read config file {}: {}", path.display(), e);
                }
                None
            }
        }
    }

    /// The file this configuration is saved to
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Save configuration back to the file it was loaded from
    pub fn save(&self) {
        let Some(path) = &self.path else {
            log::warn!("Could not determine config directory, config not saved");
            return;
        };
        self.save_to(path);
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) {
        // Ensure the config directory exists
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("Failed to create config directory: {}", e);
                return;
            }
        }

        match serde_json::to_string_pretty(self) {
            Ok(contents) => {
                if let Err(e) = std::fs::write(path, contents) {
                    log::warn!("Failed to write config file: {}", e);
                } else {
                    log::info!("Saved config to {}", path.display());
                }
            }
            Err(e) => {
                log::warn!("Failed to serialize config: {}", e);
            }
        }
    }

    /// Descriptors of every configurable field
    pub fn descriptors() -> &'static [FieldDescriptor] {
        DESCRIPTORS
    }

    /// Read a field by section and key
    pub fn get(&self, section: &str, key: &str) -> Option<FieldValue> {
        let value = match (section, key) {
            ("text-view", "indent-width") => FieldValue::Int(i64::from(self.text_view.indent_width)),
            ("text-view", "indent-space") => FieldValue::Bool(self.text_view.indent_space),
            ("text-view", "word-wrap") => FieldValue::Bool(self.text_view.word_wrap),
            ("search", "max-items") => FieldValue::Int(self.search.max_items as i64),
            ("hex", "bytes-in-line") => FieldValue::Int(self.hex.bytes_in_line as i64),
            _ => return None,
        };
        Some(value)
    }

    /// Write a field by section and key, enforcing its descriptor constraints
    pub fn set(&mut self, section: &str, key: &str, value: FieldValue) -> Result<(), String> {
        let descriptor = DESCRIPTORS
            .iter()
            .find(|d| d.section == section && d.key == key)
            .ok_or_else(|| format!("Unknown setting {}.{}", section, key))?;

        match (descriptor.kind, value) {
            (FieldKind::Bool, FieldValue::Bool(b)) => {
                match key {
                    "indent-space" => self.text_view.indent_space = b,
                    "word-wrap" => self.text_view.word_wrap = b,
                    _ => return Err(format!("Unknown setting {}.{}", section, key)),
                }
                Ok(())
            }
            (FieldKind::Int { min, max }, FieldValue::Int(n)) => {
                if n < min || n > max {
                    return Err(format!(
                        "{} must be between {} and {}",
                        descriptor.label(),
                        min,
                        max
                    ));
                }
                match key {
                    "indent-width" => self.text_view.indent_width = n as u32,
                    "max-items" => self.search.max_items = n as usize,
                    "bytes-in-line" => self.hex.bytes_in_line = n as usize,
                    _ => return Err(format!("Unknown setting {}.{}", section, key)),
                }
                Ok(())
            }
            _ => Err(format!("Wrong value type for {}", descriptor.label())),
        }
    }

    /// Clamp every integer field into its allowed range
    pub fn validate(&mut self) {
        for descriptor in DESCRIPTORS {
            let FieldKind::Int { min, max } = descriptor.kind else {
                continue;
            };
            if let Some(FieldValue::Int(n)) = self.get(descriptor.section, descriptor.key) {
                let clamped = n.clamp(min, max);
                if clamped != n {
                    log::warn!(
                        "{} out of range ({}), using {}",
                        descriptor.label(),
                        n,
                        clamped
                    );
                    // In range by construction
                    let _ = self.set(descriptor.section, descriptor.key, FieldValue::Int(clamped));
                }
            }
        }
    }
}
