//! Core utilities for BarberGo release tooling
//!
//! This crate provides the shared functionality used by the Android-facing
//! tools:
//!
//! - **Error handling**: structured errors with codes, context, and recovery suggestions
//! - **Properties parsing**: the java-style `key=value` format used by `key.properties`
//!   and `local.properties`
//! - **Process execution**: captured command execution for Gradle and keytool
//! - **Configuration**: optional TOML tool configuration with defaults
//! - **Validation**: fluent checks over what the build script declares
//!
//! # Example
//!
//! ```rust
//! use barbergo_core::properties::PropertiesFile;
//!
//! let props = PropertiesFile::parse("keyAlias=upload\nstorePassword=secret");
//! assert_eq!(props.get("keyAlias"), Some("upload"));
//! assert_eq!(props.get("keyPassword"), None);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod process;
pub mod properties;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::properties::{ParseWarning, PropertiesFile};
    pub use crate::validation::{ValidationResult, Validator};
}
