//! Flutter-forwarded SDK versions
//!
//! The app's Gradle script pins some values (`versionCode = 3`) and forwards
//! others to the Flutter Gradle plugin (`compileSdk = flutter.compileSdkVersion`).
//! A forwarded value has no literal in the build file; resolving it needs the
//! defaults the pinned Flutter release ships.

use barbergo_core::config::FlutterConfig;
use std::fmt;

/// How the build script supplies an SDK value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkBinding<T> {
    /// A literal value written in the build script
    Pinned(T),
    /// Forwarded to the Flutter Gradle plugin (`flutter.*Version`)
    Flutter,
}

impl<T: Clone> SdkBinding<T> {
    /// Resolve to a concrete value, substituting the Flutter default when forwarded
    pub fn resolve(&self, flutter_default: &T) -> T {
        match self {
            SdkBinding::Pinned(value) => value.clone(),
            SdkBinding::Flutter => flutter_default.clone(),
        }
    }
}

impl<T> SdkBinding<T> {
    /// Whether the value is forwarded to the Flutter plugin
    pub fn is_forwarded(&self) -> bool {
        matches!(self, SdkBinding::Flutter)
    }
}

impl<T: fmt::Display> SdkBinding<T> {
    /// Render for display, showing where a forwarded value comes from
    pub fn describe(&self, flutter_default: &T) -> String {
        match self {
            SdkBinding::Pinned(value) => value.to_string(),
            SdkBinding::Flutter => format!("{} (from Flutter)", flutter_default),
        }
    }
}

/// SDK versions supplied by the pinned Flutter release
///
/// These are what `flutter.compileSdkVersion` and friends evaluate to when the
/// Gradle plugin runs. Override via the `[flutter]` section of the tool config
/// when the toolchain moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlutterSdkDefaults {
    /// Compile SDK API level
    pub compile_sdk: u32,
    /// Minimum supported API level
    pub min_sdk: u32,
    /// Target API level
    pub target_sdk: u32,
    /// NDK version string
    pub ndk_version: String,
}

impl Default for FlutterSdkDefaults {
    fn default() -> Self {
        Self {
            compile_sdk: 35,
            min_sdk: 21,
            target_sdk: 35,
            ndk_version: "26.3.11579264".to_string(),
        }
    }
}

impl FlutterSdkDefaults {
    /// Build from the tool configuration
    pub fn from_config(config: &FlutterConfig) -> Self {
        Self {
            compile_sdk: config.compile_sdk,
            min_sdk: config.min_sdk,
            target_sdk: config.target_sdk,
            ndk_version: config.ndk_version.clone(),
        }
    }
}
