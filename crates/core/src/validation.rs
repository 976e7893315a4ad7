//! Validation framework
//!
//! Collects problems instead of failing on the first one, so a build script
//! audit can report every issue in a single pass. Errors block, warnings
//! do not.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single validation finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// What is wrong with it
    pub message: String,
    /// Stable code for filtering (`REQUIRED`, `PATTERN`, ...)
    pub code: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of a validation pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// True when no blocking errors were recorded
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors collected so far
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Warnings collected so far
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Record a blocking error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Record a non-blocking warning
    pub fn add_warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    /// Convert into a `Result`, flattening all errors into one message
    pub fn to_result(&self) -> crate::error::Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        let combined = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(crate::error::Error::validation(combined))
    }
}

/// Fluent checker that accumulates findings
///
/// ```
/// use barbergo_core::validation::Validator;
///
/// let result = Validator::new()
///     .required("applicationId", "sn.barbergo.app")
///     .range("compileSdk", 35u32, 21, 40)
///     .validate();
/// assert!(result.is_valid());
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    result: ValidationResult,
}

impl Validator {
    /// Start an empty validation pass
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(mut self, field: &str, code: &str, message: String) -> Self {
        self.result.add_error(ValidationError {
            field: field.to_string(),
            message,
            code: code.to_string(),
        });
        self
    }

    /// Require a non-blank value
    pub fn required(self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.fail(field, "REQUIRED", "a value is required".to_string())
        } else {
            self
        }
    }

    /// Require the value to match a regex pattern
    pub fn pattern(self, field: &str, value: &str, pattern: &str, description: &str) -> Self {
        match Regex::new(pattern) {
            Ok(re) if re.is_match(value) => self,
            Ok(_) => self.fail(field, "PATTERN", format!("{:?} is not a {}", value, description)),
            Err(_) => self.fail(field, "INTERNAL", format!("unusable check pattern {:?}", pattern)),
        }
    }

    /// Require a value inside an inclusive range
    pub fn range<T>(self, field: &str, value: T, min: T, max: T) -> Self
    where
        T: PartialOrd + std::fmt::Display,
    {
        if value < min || value > max {
            self.fail(field, "RANGE", format!("{} is outside {}..={}", value, min, max))
        } else {
            self
        }
    }

    /// Run a check that reports its own message on failure
    pub fn custom<F>(self, field: &str, check: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        match check() {
            Some(message) => self.fail(field, "CUSTOM", message),
            None => self,
        }
    }

    /// Record a non-blocking warning when the condition holds
    pub fn warn_if(mut self, field: &str, condition: bool, message: &str) -> Self {
        if condition {
            self.result.add_warning(ValidationError {
                field: field.to_string(),
                message: message.to_string(),
                code: "WARNING".to_string(),
            });
        }
        self
    }

    /// Finish and hand back everything collected
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        let result = Validator::new().required("keyAlias", "   ").validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "REQUIRED");
        assert_eq!(result.errors()[0].field, "keyAlias");
    }

    #[test]
    fn test_required_accepts_value() {
        let result = Validator::new().required("keyAlias", "upload").validate();
        assert!(result.is_valid());
    }

    #[test]
    fn test_pattern_mismatch() {
        let result = Validator::new()
            .pattern(
                "applicationId",
                "Not An Id",
                r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)+$",
                "dotted package name",
            )
            .validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "PATTERN");
        assert!(result.errors()[0].message.contains("dotted package name"));
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let result = Validator::new()
            .range("minSdk", 21u32, 21, 35)
            .range("targetSdk", 35u32, 21, 35)
            .validate();
        assert!(result.is_valid());
    }

    #[test]
    fn test_range_rejects_outside() {
        let result = Validator::new().range("versionCode", 0u64, 1, 2_100_000_000).validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "RANGE");
    }

    #[test]
    fn test_custom_check() {
        let result = Validator::new()
            .custom("storeFile", || Some("path escapes the project".to_string()))
            .validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "CUSTOM");
    }

    #[test]
    fn test_warn_if_does_not_block() {
        let result = Validator::new()
            .warn_if("signingConfig", true, "release falls back to debug signing")
            .validate();
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
        assert_eq!(result.warnings()[0].code, "WARNING");
    }

    #[test]
    fn test_to_result_collects_messages() {
        let result = Validator::new()
            .required("versionName", "")
            .range("versionCode", 0u64, 1, 2_100_000_000)
            .validate();
        let err = result.to_result().unwrap_err();
        assert!(err.message.contains("versionName"));
        assert!(err.message.contains("versionCode"));
    }
}
