//! Configuration schema definitions
//!
//! Tool-level settings; the Android build itself is configured by Gradle, not here.

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Project layout settings
    #[serde(default)]
    pub project: ProjectConfig,

    /// Flutter plugin defaults used to resolve forwarded SDK versions
    #[serde(default)]
    pub flutter: FlutterConfig,
}

/// Project layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Android project directory, relative to the repo root
    #[serde(default = "default_android_dir")]
    pub android_dir: String,

    /// Name of the signing credentials file inside the android directory
    #[serde(default = "default_signing_properties")]
    pub signing_properties: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            android_dir: default_android_dir(),
            signing_properties: default_signing_properties(),
        }
    }
}

fn default_android_dir() -> String {
    "android".to_string()
}

fn default_signing_properties() -> String {
    "key.properties".to_string()
}

/// Flutter-provided SDK defaults
///
/// The app's Gradle script forwards `compileSdk`, `minSdk`, `targetSdk` and
/// `ndkVersion` from the Flutter Gradle plugin. These are the values the pinned
/// Flutter release supplies; override them here when the toolchain moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlutterConfig {
    /// `flutter.compileSdkVersion`
    #[serde(default = "default_compile_sdk")]
    pub compile_sdk: u32,

    /// `flutter.minSdkVersion`
    #[serde(default = "default_min_sdk")]
    pub min_sdk: u32,

    /// `flutter.targetSdkVersion`
    #[serde(default = "default_target_sdk")]
    pub target_sdk: u32,

    /// `flutter.ndkVersion`
    #[serde(default = "default_ndk_version")]
    pub ndk_version: String,
}

impl Default for FlutterConfig {
    fn default() -> Self {
        Self {
            compile_sdk: default_compile_sdk(),
            min_sdk: default_min_sdk(),
            target_sdk: default_target_sdk(),
            ndk_version: default_ndk_version(),
        }
    }
}

fn default_compile_sdk() -> u32 {
    35
}

fn default_min_sdk() -> u32 {
    21
}

fn default_target_sdk() -> u32 {
    35
}

fn default_ndk_version() -> String {
    "26.3.11579264".to_string()
}
