//! Parser options, optionally loaded from a TOML file.
//!
//! Every key is optional. A missing file yields `ParseOptions::default()`;
//! unknown keys are accepted but logged as a warning because they are
//! usually typos.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::source::DEFAULT_MAX_DEPTH;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read options file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in options file: {0}")]
    Parse(#[from] toml::de::Error),

    /// SEC-014: Options file exceeds maximum allowed size.
    #[error("Options file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Options
// ============================================================================

/// Which event source a parser feeds its builder from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// `quick-xml` only. Input that is not well-formed fails the parse.
    Strict,
    /// Regex tokenizer only. Never fails.
    TagSoup,
    /// `quick-xml` first, re-parsing with the tokenizer if it gives up.
    #[default]
    StrictThenTagSoup,
}

/// Options shared by the RSS and Atom parsers.
///
/// ```toml
/// mode = "strict"
/// max_depth = 64
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub mode: ParseMode,

    /// SEC-003: Deepest element nesting the strict reader accepts.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            mode: ParseMode::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// SEC-014: Maximum options file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 2] = ["mode", "max_depth"];

    /// Load options from a TOML file.
    ///
    /// - Missing file → `Ok(ParseOptions::default())`
    /// - Empty file → `Ok(ParseOptions::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // SEC-014: Check file size before reading
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Options file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No options file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Options file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Blank text gives the defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in options file, ignoring");
                }
            }
        }

        let options: ParseOptions = toml::from_str(content)?;
        tracing::debug!(
            mode = ?options.mode,
            max_depth = options.max_depth,
            "Loaded parse options"
        );
        Ok(options)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.mode, ParseMode::StrictThenTagSoup);
        assert_eq!(options.max_depth, 256);
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/syndication_test_nonexistent_options.toml");
        let options = ParseOptions::load(path).unwrap();
        assert_eq!(options, ParseOptions::default());
    }

    #[test]
    fn test_empty_file_returns_default() {
        let dir = std::env::temp_dir().join("syndication_options_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("options.toml");
        std::fs::write(&path, "  \n ").unwrap();

        let options = ParseOptions::load(&path).unwrap();
        assert_eq!(options, ParseOptions::default());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_options_use_defaults_for_missing() {
        let options = ParseOptions::from_toml("mode = \"tag_soup\"\n").unwrap();
        assert_eq!(options.mode, ParseMode::TagSoup);
        assert_eq!(options.max_depth, 256);
    }

    #[test]
    fn test_full_options_from_file() {
        let dir = std::env::temp_dir().join("syndication_options_test_full");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("options.toml");
        std::fs::write(&path, "mode = \"strict\"\nmax_depth = 32\n").unwrap();

        let options = ParseOptions::load(&path).unwrap();
        assert_eq!(options.mode, ParseMode::Strict);
        assert_eq!(options.max_depth, 32);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let err = ParseOptions::from_toml("this is not [valid toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn test_unknown_mode_returns_error() {
        let err = ParseOptions::from_toml("mode = \"lenient\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let options = ParseOptions::from_toml("max_depth = 10\nmax_dpeth = 20\n").unwrap();
        assert_eq!(options.max_depth, 10);
    }

    // SEC-014: File size limit
    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("syndication_options_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("options.toml");
        std::fs::write(&path, "#".repeat(1_048_577)).unwrap();

        let err = ParseOptions::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
