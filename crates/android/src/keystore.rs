//! Keystore checks and credential file scaffolding
//!
//! `SigningConfig` resolution deliberately stops at the credentials; whether
//! the keystore file exists and accepts them is answered here, by `keytool`,
//! so `signing check --strict` and the doctor can report it.

use crate::signing::SigningConfig;
use barbergo_core::error::{Error, Result};
use barbergo_core::process::{command_exists, CommandResult};
use std::path::Path;
use std::process::{Command, Stdio};

/// Whether `keytool` (from the JDK) is on PATH
pub fn has_keytool() -> bool {
    command_exists("keytool")
}

/// Whether the configured keystore file exists
pub fn exists(config: &SigningConfig) -> bool {
    config.store_file.is_file()
}

/// Check that the keystore exists and accepts the configured credentials
///
/// Runs `keytool -list` against the store. The command is built directly
/// instead of through `run_command` so the store password never reaches the
/// debug log.
pub fn verify(config: &SigningConfig) -> Result<()> {
    if !exists(config) {
        return Err(Error::keystore_not_found(&config.store_file));
    }
    if !has_keytool() {
        return Err(Error::command_not_found("keytool"));
    }

    tracing::debug!(keystore = %config.store_file.display(), alias = %config.key_alias, "verifying keystore");
    let output = Command::new("keytool")
        .arg("-list")
        .arg("-keystore")
        .arg(&config.store_file)
        .arg("-alias")
        .arg(&config.key_alias)
        .arg("-storepass")
        .arg(config.store_password())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| Error::process(format!("Failed to execute keytool: {}", e)))?;

    let result = CommandResult::from_output(output);
    if result.success {
        Ok(())
    } else {
        Err(Error::keystore_rejected(snippet(
            &result.combined_output(),
            400,
        )))
    }
}

/// A starter `key.properties` with the project's conventional layout
pub fn properties_template() -> String {
    "\
# Release signing credentials for the Android build.
# Lives at android/key.properties; never commit it.
#
# storeFile is resolved relative to the app module (android/app).
storePassword=
keyPassword=
keyAlias=upload
storeFile=../upload-keystore.jks
"
    .to_string()
}

/// Write the starter credentials file
///
/// Refuses to overwrite; a populated `key.properties` holds real passwords.
pub fn write_template(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(
            Error::io(format!("Refusing to overwrite {}", path.display()))
                .with_suggestion("Move the existing file aside first"),
        );
    }
    std::fs::write(path, properties_template())?;
    Ok(())
}

/// Whether `android/.gitignore` covers the given file name
///
/// Understands the patterns the stock Flutter gitignore uses: plain names,
/// leading `/` or `**/`, and `*.ext` suffixes. Anything fancier reports false.
pub fn is_gitignored(android_dir: &Path, file_name: &str) -> bool {
    let Ok(content) = std::fs::read_to_string(android_dir.join(".gitignore")) else {
        return false;
    };
    content
        .lines()
        .any(|line| pattern_covers(line.trim(), file_name))
}

fn pattern_covers(pattern: &str, file_name: &str) -> bool {
    if pattern.is_empty() || pattern.starts_with('#') {
        return false;
    }
    let pattern = pattern.strip_prefix("**/").unwrap_or(pattern);
    let pattern = pattern.strip_prefix('/').unwrap_or(pattern);
    if pattern == file_name {
        return true;
    }
    if let Some(suffix) = pattern.strip_prefix('*') {
        return !suffix.contains('*') && file_name.ends_with(suffix);
    }
    false
}

fn snippet(text: &str, max: usize) -> String {
    let trimmed = text.trim();
    if trimmed.len() <= max {
        trimmed.to_string()
    } else {
        let mut end = max;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barbergo_core::properties::PropertiesFile;

    #[test]
    fn test_template_is_parseable() {
        let props = PropertiesFile::parse(&properties_template());
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.get("storeFile"), Some("../upload-keystore.jks"));
    }

    #[test]
    fn test_template_leaves_passwords_missing() {
        let props = PropertiesFile::parse(&properties_template());
        let missing = crate::signing::missing_keys(&props);
        assert_eq!(missing, vec!["keyPassword", "storePassword"]);
    }

    #[test]
    fn test_write_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.properties");

        write_template(&path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_write_template_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.properties");
        std::fs::write(&path, "storePassword=real-secret\n").unwrap();

        assert!(write_template(&path).is_err());
        let kept = std::fs::read_to_string(&path).unwrap();
        assert!(kept.contains("real-secret"));
    }

    #[test]
    fn test_verify_missing_keystore() {
        let dir = tempfile::tempdir().unwrap();
        let props = PropertiesFile::parse(
            "storePassword=s\nkeyPassword=k\nkeyAlias=upload\nstoreFile=absent.jks\n",
        );
        let config = SigningConfig::from_properties(&props, dir.path()).unwrap();

        assert!(!exists(&config));
        let err = verify(&config).unwrap_err();
        assert_eq!(err.code, barbergo_core::error::ErrorCode::KeystoreNotFound);
    }

    #[test]
    fn test_gitignore_plain_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".gitignore"), "key.properties\n").unwrap();
        assert!(is_gitignored(dir.path(), "key.properties"));
        assert!(!is_gitignored(dir.path(), "local.properties"));
    }

    #[test]
    fn test_gitignore_glob_patterns() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".gitignore"),
            "# secrets\n/key.properties\n**/*.jks\n",
        )
        .unwrap();
        assert!(is_gitignored(dir.path(), "key.properties"));
        assert!(is_gitignored(dir.path(), "upload-keystore.jks"));
        assert!(!is_gitignored(dir.path(), "build.gradle.kts"));
    }

    #[test]
    fn test_gitignore_absent_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_gitignored(dir.path(), "key.properties"));
    }

    #[test]
    fn test_snippet_truncates() {
        let long = "x".repeat(500);
        let cut = snippet(&long, 400);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.len(), 403);
    }
}
