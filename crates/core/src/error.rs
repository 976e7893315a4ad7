//! Error handling for the toolkit
//!
//! One structured error type carries a numeric code, optional context, and a
//! recovery suggestion, so a failed preflight tells the user what to fix and
//! not just what broke. Reports serialize for `--json` consumers.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable numeric codes, grouped by thousands per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    Unknown = 1000,
    Internal = 1001,

    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,
    InvalidPath = 2003,

    // Tool configuration errors (3xxx)
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    InvalidConfigValue = 3003,

    // Properties file errors (4xxx)
    PropertiesError = 4000,

    // Signing errors (5xxx)
    SigningError = 5000,
    MissingSigningCredential = 5001,
    KeystoreNotFound = 5002,
    KeystoreRejected = 5003,

    // Process errors (6xxx)
    ProcessError = 6000,
    CommandNotFound = 6001,
    CommandFailed = 6002,

    // Gradle project errors (7xxx)
    GradleError = 7000,
    ProjectNotFound = 7001,

    // Validation errors (8xxx)
    ValidationError = 8000,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Category name, used for report grouping
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            4 => "Properties",
            5 => "Signing",
            6 => "Process",
            7 => "Gradle",
            8 => "Validation",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Toolkit error: code, message, optional context and suggestion
#[derive(Error, Debug)]
pub struct Error {
    /// Stable code identifying the failure class
    pub code: ErrorCode,
    /// What went wrong, in one line
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Attach operation context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attach a suggested fix
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Flatten into a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    // Constructors for the failure classes the toolkit raises

    /// Generic IO failure
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IoError, message)
    }

    /// A file that was expected to exist does not
    pub fn file_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::FileNotFound,
            format!("File not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Check that the file exists and you have read permissions")
    }

    /// Generic tool configuration failure
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Properties file could not be read
    pub fn properties(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PropertiesError, message)
    }

    /// One or more required signing credentials are absent or empty
    pub fn missing_signing_credential(keys: &[&str]) -> Self {
        Self::new(
            ErrorCode::MissingSigningCredential,
            format!("Missing signing credential(s): {}", keys.join(", ")),
        )
        .with_suggestion(
            "Add the missing keys to key.properties, or run 'barbergo-android signing init' \
             to generate a template",
        )
    }

    /// The configured keystore file does not exist
    pub fn keystore_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::KeystoreNotFound,
            format!("Keystore not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Check the storeFile entry in key.properties")
    }

    /// keytool could not open the keystore with the configured credentials
    pub fn keystore_rejected(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::KeystoreRejected, "Keystore verification failed")
            .with_context(detail)
            .with_suggestion("Check storePassword and keyAlias in key.properties")
    }

    /// Process execution failure
    pub fn process(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProcessError, message)
    }

    /// A required external command is not installed
    pub fn command_not_found(cmd: &str) -> Self {
        Self::new(
            ErrorCode::CommandNotFound,
            format!("Command not found: {}", cmd),
        )
        .with_suggestion(format!("Install {} and ensure it's in your PATH", cmd))
    }

    /// No Android Gradle project could be located
    pub fn project_not_found(start: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ProjectNotFound,
            format!(
                "No Android project found from {}",
                start.as_ref().display()
            ),
        )
        .with_suggestion("Run this command inside a Flutter project or its android/ directory")
    }

    /// Gradle invocation failure
    pub fn gradle(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GradleError, message)
    }

    /// Validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }
}

/// Serializable error report for logging and JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error code
    pub code: ErrorCode,
    /// Formatted code (`EXXXX`)
    pub code_str: String,
    /// Code category
    pub category: String,
    /// Error message
    pub message: String,
    /// Additional context, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Recovery suggestion, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Source error, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes for the CLI
pub mod exit_codes {
    /// Command completed successfully
    pub const SUCCESS: i32 = 0;
    /// Generic failure
    pub const FAILURE: i32 = 1;
    /// Build configuration failed validation
    pub const VALIDATION_ERROR: i32 = 2;
    /// Tool configuration problem
    pub const CONFIG_ERROR: i32 = 3;
    /// Signing configuration could not be resolved
    pub const SIGNING_ERROR: i32 = 4;
    /// A required external command is missing
    pub const COMMAND_NOT_FOUND: i32 = 127;
}

// Conversions from lower-level errors

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(
            ErrorCode::ConfigParseError,
            format!("TOML parse error: {}", err),
        )
        .with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(
            ErrorCode::Internal,
            format!("JSON serialization error: {}", err),
        )
        .with_source(err)
    }
}

/// Context and suggestion chaining on `Result`
pub trait ResultExt<T> {
    /// Attach context to the error, if any
    fn context(self, context: impl Into<String>) -> Result<T>;
    /// Attach a recovery suggestion to the error, if any
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::MissingSigningCredential.to_string(), "E5001");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::MissingSigningCredential.category(), "Signing");
        assert_eq!(ErrorCode::ProjectNotFound.category(), "Gradle");
    }

    #[test]
    fn test_missing_credential_names_keys() {
        let err = Error::missing_signing_credential(&["keyPassword", "storeFile"]);

        assert_eq!(err.code, ErrorCode::MissingSigningCredential);
        assert!(err.message.contains("keyPassword"));
        assert!(err.message.contains("storeFile"));
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::file_not_found("/path/to/build.gradle.kts")
            .with_context("While inspecting the app module");

        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert!(err.context.is_some());
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_error_report_serialization() {
        let err = Error::missing_signing_credential(&["keyAlias"])
            .with_context("While resolving release signing");

        let report = err.to_report();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("E5001"));
        assert!(json.contains("Signing"));
    }

    #[test]
    fn test_io_error_kind_mapping() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::from(io);
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }
}
