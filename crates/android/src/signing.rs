//! Release signing configuration
//!
//! The Gradle script builds its release signing config from four entries in
//! `key.properties`: `keyAlias`, `keyPassword`, `storeFile`, `storePassword`.
//! This module resolves the same entries ahead of the build so a missing
//! credential fails fast with a named key instead of a Gradle stack trace.
//!
//! Debug builds never consult this file; an absent or incomplete
//! `key.properties` only matters when release signing is actually requested.

use barbergo_core::error::{Error, Result};
use barbergo_core::properties::PropertiesFile;
use std::fmt;
use std::path::{Path, PathBuf};

/// Properties key for the key alias
pub const KEY_ALIAS: &str = "keyAlias";
/// Properties key for the key password
pub const KEY_PASSWORD: &str = "keyPassword";
/// Properties key for the keystore path
pub const STORE_FILE: &str = "storeFile";
/// Properties key for the keystore password
pub const STORE_PASSWORD: &str = "storePassword";

/// The four entries release signing requires
pub const REQUIRED_KEYS: [&str; 4] = [KEY_ALIAS, KEY_PASSWORD, STORE_FILE, STORE_PASSWORD];

/// Required keys that are absent or blank, in declaration order
///
/// A key whose value is only whitespace counts as missing; the Gradle script
/// would accept it and then fail deep inside the signing task.
pub fn missing_keys(props: &PropertiesFile) -> Vec<&'static str> {
    REQUIRED_KEYS
        .iter()
        .filter(|key| match props.get(key) {
            Some(value) => value.trim().is_empty(),
            None => true,
        })
        .copied()
        .collect()
}

/// Resolved release signing credentials
///
/// Passwords are kept private and masked in debug output; use the accessors
/// where the raw value is genuinely needed (keytool invocation).
#[derive(Clone, PartialEq, Eq)]
pub struct SigningConfig {
    /// Alias of the signing key inside the keystore
    pub key_alias: String,
    key_password: String,
    /// Keystore path, resolved against the app module directory
    pub store_file: PathBuf,
    store_password: String,
}

impl SigningConfig {
    /// Resolve signing credentials from a parsed properties file
    ///
    /// Fails with one error naming every missing key, so a developer fixes the
    /// file in a single round trip. `module_dir` is the directory relative
    /// `storeFile` entries resolve against, matching Gradle's `file()` in the
    /// app module.
    pub fn from_properties(props: &PropertiesFile, module_dir: &Path) -> Result<Self> {
        let missing = missing_keys(props);
        if !missing.is_empty() {
            let mut err = Error::missing_signing_credential(&missing);
            if let Some(path) = props.path() {
                err = err.with_context(format!("While reading {}", path.display()));
            }
            return Err(err);
        }

        // missing_keys() checked presence, so these lookups cannot fail
        let key_alias = props.get(KEY_ALIAS).unwrap_or_default().to_string();
        let key_password = props.get(KEY_PASSWORD).unwrap_or_default().to_string();
        let store_file = resolve_store_file(props.get(STORE_FILE).unwrap_or_default(), module_dir);
        let store_password = props.get(STORE_PASSWORD).unwrap_or_default().to_string();

        Ok(Self {
            key_alias,
            key_password,
            store_file,
            store_password,
        })
    }

    /// Password protecting the signing key
    pub fn key_password(&self) -> &str {
        &self.key_password
    }

    /// Password protecting the keystore
    pub fn store_password(&self) -> &str {
        &self.store_password
    }
}

impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field("key_alias", &self.key_alias)
            .field("key_password", &"********")
            .field("store_file", &self.store_file)
            .field("store_password", &"********")
            .finish()
    }
}

/// Resolve a `storeFile` entry to a concrete path
///
/// Tilde expands, then relative paths resolve against the app module directory
/// the way Gradle's `file()` does. Whether the file exists is not checked here;
/// `keystore::verify` and the doctor report on that.
fn resolve_store_file(raw: &str, module_dir: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(raw);
    let path = PathBuf::from(expanded.as_ref());
    if path.is_absolute() {
        path
    } else {
        module_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_props() -> PropertiesFile {
        PropertiesFile::parse(
            "storePassword=store-secret\n\
             keyPassword=key-secret\n\
             keyAlias=upload\n\
             storeFile=../upload-keystore.jks\n",
        )
    }

    #[test]
    fn test_complete_properties_resolve() {
        let config =
            SigningConfig::from_properties(&complete_props(), Path::new("/repo/android/app"))
                .unwrap();

        assert_eq!(config.key_alias, "upload");
        assert_eq!(config.key_password(), "key-secret");
        assert_eq!(config.store_password(), "store-secret");
        assert_eq!(
            config.store_file,
            Path::new("/repo/android/app/../upload-keystore.jks")
        );
    }

    #[test]
    fn test_empty_mapping_reports_all_keys() {
        let props = PropertiesFile::parse("");
        let err = SigningConfig::from_properties(&props, Path::new("/repo/android/app"))
            .unwrap_err();

        for key in REQUIRED_KEYS {
            assert!(err.message.contains(key), "missing {} in: {}", key, err.message);
        }
    }

    #[test]
    fn test_one_absent_key_named() {
        let props = PropertiesFile::parse(
            "storePassword=s\nkeyAlias=upload\nstoreFile=k.jks\n",
        );
        let err = SigningConfig::from_properties(&props, Path::new("/app")).unwrap_err();

        assert!(err.message.contains("keyPassword"));
        assert!(!err.message.contains("keyAlias"));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let props = PropertiesFile::parse(
            "storePassword=s\nkeyPassword=   \nkeyAlias=upload\nstoreFile=k.jks\n",
        );
        assert_eq!(missing_keys(&props), vec![KEY_PASSWORD]);
    }

    #[test]
    fn test_missing_keys_in_declaration_order() {
        let props = PropertiesFile::parse("keyAlias=upload\n");
        assert_eq!(
            missing_keys(&props),
            vec![KEY_PASSWORD, STORE_FILE, STORE_PASSWORD]
        );
    }

    #[test]
    fn test_absolute_store_file_kept() {
        let props = PropertiesFile::parse(
            "storePassword=s\nkeyPassword=k\nkeyAlias=upload\nstoreFile=/keys/app.jks\n",
        );
        let config = SigningConfig::from_properties(&props, Path::new("/repo/android/app")).unwrap();
        assert_eq!(config.store_file, Path::new("/keys/app.jks"));
    }

    #[test]
    fn test_debug_output_masks_passwords() {
        let config =
            SigningConfig::from_properties(&complete_props(), Path::new("/app")).unwrap();
        let debug = format!("{:?}", config);

        assert!(debug.contains("upload"));
        assert!(!debug.contains("key-secret"));
        assert!(!debug.contains("store-secret"));
        assert!(debug.contains("********"));
    }

    #[test]
    fn test_error_context_names_source_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.properties");
        std::fs::write(&path, "keyAlias=upload\n").unwrap();

        let props = PropertiesFile::load(&path).unwrap();
        let err = SigningConfig::from_properties(&props, dir.path()).unwrap_err();

        assert!(err.context.as_deref().unwrap_or("").contains("key.properties"));
    }
}
