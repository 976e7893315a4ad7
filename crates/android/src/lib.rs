//! Android build tooling for the BarberGo app
//!
//! This crate understands the app's `android/` Gradle project:
//! - Project discovery and layout
//! - Release signing credentials (`key.properties`)
//! - Build script inspection and validation
//! - Gradle wrapper invocation
//! - Keystore verification

#![warn(missing_docs)]

pub mod gradle;
pub mod gradle_file;
pub mod keystore;
pub mod project;
pub mod sdk;
pub mod signing;
