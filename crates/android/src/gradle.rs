//! Gradle build system integration
//!
//! Wraps the project's Gradle wrapper for the tasks the release pipeline
//! uses. Everything runs through the wrapper, never a system Gradle, so the
//! build sees the exact Gradle version the repo pins.

use barbergo_core::error::Result;
use barbergo_core::process::{run_command_in_dir, CommandResult};
use std::path::{Path, PathBuf};

/// Name of the wrapper script for the current platform
pub fn wrapper_program() -> &'static str {
    if cfg!(windows) {
        "gradlew.bat"
    } else {
        "./gradlew"
    }
}

/// Run a Gradle task through the wrapper
pub fn run_task(project_dir: &Path, task: &str) -> Result<CommandResult> {
    run_command_in_dir(wrapper_program(), &[task], project_dir)
}

/// Build the debug APK
pub fn assemble_debug(project_dir: &Path) -> Result<CommandResult> {
    run_task(project_dir, "assembleDebug")
}

/// Build the release APK
pub fn assemble_release(project_dir: &Path) -> Result<CommandResult> {
    run_task(project_dir, "assembleRelease")
}

/// Build the debug app bundle
pub fn bundle_debug(project_dir: &Path) -> Result<CommandResult> {
    run_task(project_dir, "bundleDebug")
}

/// Build the release app bundle
pub fn bundle_release(project_dir: &Path) -> Result<CommandResult> {
    run_task(project_dir, "bundleRelease")
}

/// Clean build outputs
pub fn clean(project_dir: &Path) -> Result<CommandResult> {
    run_task(project_dir, "clean")
}

/// Print the signing report for all variants
pub fn signing_report(project_dir: &Path) -> Result<CommandResult> {
    run_task(project_dir, "signingReport")
}

/// Where a build's artifact lands under the Gradle root
///
/// `configuration` is the lowercase build type name (`debug`, `release`).
pub fn artifact_path(android_dir: &Path, configuration: &str, bundle: bool) -> PathBuf {
    let (kind, ext) = if bundle { ("bundle", "aab") } else { ("apk", "apk") };
    android_dir
        .join("app")
        .join("build")
        .join("outputs")
        .join(kind)
        .join(configuration)
        .join(format!("app-{}.{}", configuration, ext))
}
