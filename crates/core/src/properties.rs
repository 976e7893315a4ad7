//! Java-style properties file parsing
//!
//! The Android build reads two properties files: `key.properties` (release signing
//! credentials) and `local.properties` (SDK locations and Flutter build values).
//! Both are plain `key=value` text parsed by `java.util.Properties` on the Gradle
//! side; this module parses the same format so the tools agree with the build.
//!
//! Parsing is deliberately tolerant: comments and blank lines are ignored, a
//! malformed line is skipped with a warning instead of failing the load, and a
//! file that does not exist loads as an empty mapping. An absent `key.properties`
//! is the normal state of a debug-only checkout, not an error.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Why a line was skipped during parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningReason {
    /// The line has no `=` or `:` separator
    MissingSeparator,
    /// The line has a separator but nothing before it
    EmptyKey,
}

impl fmt::Display for WarningReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningReason::MissingSeparator => write!(f, "no '=' separator"),
            WarningReason::EmptyKey => write!(f, "empty key"),
        }
    }
}

/// A non-fatal problem found on one line of a properties file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line number
    pub line: usize,
    /// The offending line, as written
    pub text: String,
    /// Why the line was skipped
    pub reason: WarningReason,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {:?}", self.line, self.reason, self.text)
    }
}

/// A parsed properties file
///
/// Lookup semantics match what the Gradle script sees: duplicate keys keep the
/// last occurrence, values keep everything after the separator (leading
/// whitespace stripped), and a key that was never written is simply absent.
#[derive(Debug, Clone, Default)]
pub struct PropertiesFile {
    entries: HashMap<String, String>,
    warnings: Vec<ParseWarning>,
    path: Option<PathBuf>,
}

impl PropertiesFile {
    /// Load a properties file from disk
    ///
    /// A file that does not exist yields an empty mapping, never an error; any
    /// other read failure is a [`crate::error::ErrorCode::PropertiesError`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "properties file absent, using empty mapping");
                return Ok(Self {
                    path: Some(path.to_path_buf()),
                    ..Self::default()
                });
            }
            Err(e) => {
                return Err(
                    Error::properties(format!("Failed to read {}", path.display())).with_source(e),
                );
            }
        };

        let mut parsed = Self::parse(&text);
        parsed.path = Some(path.to_path_buf());
        for warning in &parsed.warnings {
            tracing::warn!(path = %path.display(), %warning, "skipping malformed properties line");
        }
        Ok(parsed)
    }

    /// Parse properties text
    ///
    /// Rules, matching `java.util.Properties` for the subset the build uses:
    /// - blank lines and lines whose first non-blank character is `#` or `!`
    ///   are ignored
    /// - the first `=` or `:` on a line separates key from value
    /// - keys are trimmed; values lose leading whitespace only
    /// - duplicate keys: the last occurrence wins
    /// - a non-comment line without a separator is recorded as a warning and
    ///   skipped
    ///
    /// Escape sequences and line continuations are not processed; none of the
    /// app's properties files use them.
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        let mut warnings = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let Some(sep) = line.find(['=', ':']) else {
                warnings.push(ParseWarning {
                    line: idx + 1,
                    text: line.to_string(),
                    reason: WarningReason::MissingSeparator,
                });
                continue;
            };

            let key = line[..sep].trim();
            if key.is_empty() {
                warnings.push(ParseWarning {
                    line: idx + 1,
                    text: line.to_string(),
                    reason: WarningReason::EmptyKey,
                });
                continue;
            }

            let value = line[sep + 1..].trim_start();
            entries.insert(key.to_string(), value.to_string());
        }

        Self {
            entries,
            warnings,
            path: None,
        }
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether the key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys, sorted for stable display
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Warnings collected while parsing
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// The path this file was loaded from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_basic_pairs() {
        let props = PropertiesFile::parse("keyAlias=upload\nstorePassword=secret\n");
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.get("storePassword"), Some("secret"));
        assert_eq!(props.get("keyPassword"), None);
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let props = PropertiesFile::parse("keyAlias=a\nkeyAlias=b\n");
        assert_eq!(props.get("keyAlias"), Some("b"));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let text = "# release credentials\n\n! generated\nkeyAlias=upload\n   \n";
        let props = PropertiesFile::parse(text);
        assert_eq!(props.len(), 1);
        assert!(props.warnings().is_empty());
    }

    #[test]
    fn test_colon_separator_accepted() {
        let props = PropertiesFile::parse("storeFile:../upload-keystore.jks");
        assert_eq!(props.get("storeFile"), Some("../upload-keystore.jks"));
    }

    #[test]
    fn test_first_separator_splits() {
        // '=' in the value is data, not a second separator
        let props = PropertiesFile::parse("storePassword=a=b:c");
        assert_eq!(props.get("storePassword"), Some("a=b:c"));
    }

    #[test]
    fn test_key_trimmed_value_keeps_tail() {
        let props = PropertiesFile::parse("  keyAlias  =   upload ");
        assert_eq!(props.get("keyAlias"), Some("upload "));
    }

    #[test]
    fn test_inline_hash_is_part_of_value() {
        let props = PropertiesFile::parse("storeFile=keys/app.jks # prod");
        assert_eq!(props.get("storeFile"), Some("keys/app.jks # prod"));
    }

    #[test]
    fn test_malformed_line_warns_and_continues() {
        let props = PropertiesFile::parse("keyAlias=upload\njust a stray line\nkeyPassword=pw\n");
        assert_eq!(props.len(), 2);
        assert_eq!(props.warnings().len(), 1);
        assert_eq!(props.warnings()[0].line, 2);
        assert_eq!(props.warnings()[0].reason, WarningReason::MissingSeparator);
    }

    #[test]
    fn test_empty_key_warns() {
        let props = PropertiesFile::parse("=orphan");
        assert!(props.is_empty());
        assert_eq!(props.warnings()[0].reason, WarningReason::EmptyKey);
    }

    #[test]
    fn test_crlf_input() {
        let props = PropertiesFile::parse("keyAlias=upload\r\nstorePassword=secret\r\n");
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.get("storePassword"), Some("secret"));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let props = PropertiesFile::load(&dir.path().join("key.properties")).unwrap();
        assert!(props.is_empty());
        assert!(props.warnings().is_empty());
        assert!(props.path().is_some());
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.properties");
        std::fs::write(&path, "keyAlias=upload\nstoreFile=../upload-keystore.jks\n").unwrap();

        let props = PropertiesFile::load(&path).unwrap();
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.keys(), vec!["keyAlias", "storeFile"]);
    }

    proptest! {
        // For any well-formed key=value file, looking up a written key
        // returns the written value.
        #[test]
        fn prop_written_pairs_survive_load(
            entries in proptest::collection::hash_map(
                "[a-zA-Z][a-zA-Z0-9_.]{0,15}",
                "[!-~][ -~]{0,30}",
                0..8,
            )
        ) {
            let text: String = entries
                .iter()
                .map(|(k, v)| format!("{}={}\n", k, v))
                .collect();
            let props = PropertiesFile::parse(&text);

            prop_assert_eq!(props.len(), entries.len());
            for (k, v) in &entries {
                prop_assert_eq!(props.get(k), Some(v.as_str()));
            }
        }
    }
}
