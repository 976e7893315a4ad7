//! Android project discovery and layout
//!
//! Locates the `android/` Gradle project of a Flutter checkout and answers
//! where its well-known files live: the signing credentials file at the Gradle
//! root, `local.properties`, the app module's build script, the wrapper.

use barbergo_core::error::{Error, Result};
use barbergo_core::properties::PropertiesFile;
use std::path::{Path, PathBuf};

/// An Android Gradle project rooted at `android/`
#[derive(Debug, Clone)]
pub struct AndroidProject {
    root: PathBuf,
}

impl AndroidProject {
    /// Open a project at a known root
    pub fn open(root: &Path) -> Result<Self> {
        if !looks_like_gradle_root(root) {
            return Err(Error::project_not_found(root)
                .with_context("No settings.gradle(.kts) or gradlew here"));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Find the project from a starting directory
    ///
    /// Walks up from `start`, accepting either a Gradle root itself or a
    /// directory containing one under `android/`. Works from the repo root,
    /// from `android/`, and from anywhere inside either.
    pub fn discover(start: &Path) -> Result<Self> {
        for dir in start.ancestors() {
            if looks_like_gradle_root(dir) {
                tracing::debug!(root = %dir.display(), "found Android project");
                return Ok(Self {
                    root: dir.to_path_buf(),
                });
            }
            let nested = dir.join("android");
            if looks_like_gradle_root(&nested) {
                tracing::debug!(root = %nested.display(), "found Android project");
                return Ok(Self { root: nested });
            }
        }
        Err(Error::project_not_found(start))
    }

    /// The Gradle project root (the `android/` directory)
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The app module directory
    pub fn app_dir(&self) -> PathBuf {
        self.root.join("app")
    }

    /// Path of the signing credentials file
    ///
    /// The Gradle script loads it via `rootProject.file(..)`, so it lives at
    /// the Gradle root, not in the app module.
    pub fn signing_properties_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Path of `key.properties` under its default name
    pub fn key_properties_path(&self) -> PathBuf {
        self.signing_properties_path("key.properties")
    }

    /// Path of `local.properties`
    pub fn local_properties_path(&self) -> PathBuf {
        self.root.join("local.properties")
    }

    /// The app module's build script
    ///
    /// Prefers `build.gradle.kts`, falls back to `build.gradle`.
    pub fn app_build_file(&self) -> Result<PathBuf> {
        let kts = self.app_dir().join("build.gradle.kts");
        if kts.is_file() {
            return Ok(kts);
        }
        let groovy = self.app_dir().join("build.gradle");
        if groovy.is_file() {
            return Ok(groovy);
        }
        Err(Error::file_not_found(&kts).with_context("App module has no Gradle build script"))
    }

    /// Path of the Gradle wrapper script
    pub fn gradle_wrapper(&self) -> PathBuf {
        if cfg!(windows) {
            self.root.join("gradlew.bat")
        } else {
            self.root.join("gradlew")
        }
    }

    /// Whether the wrapper script is present
    pub fn has_wrapper(&self) -> bool {
        self.gradle_wrapper().is_file()
    }

    /// Load the signing credentials file
    ///
    /// Absent file loads as an empty mapping; that is the normal state of a
    /// debug-only checkout.
    pub fn signing_properties(&self, file_name: &str) -> Result<PropertiesFile> {
        PropertiesFile::load(&self.signing_properties_path(file_name))
    }

    /// Load `local.properties`
    pub fn local_properties(&self) -> Result<PropertiesFile> {
        PropertiesFile::load(&self.local_properties_path())
    }
}

fn looks_like_gradle_root(dir: &Path) -> bool {
    dir.join("settings.gradle.kts").is_file()
        || dir.join("settings.gradle").is_file()
        || dir.join("gradlew").is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_flutter_checkout(root: &Path) {
        let android = root.join("android");
        fs::create_dir_all(android.join("app")).unwrap();
        fs::write(android.join("settings.gradle.kts"), "// settings\n").unwrap();
        fs::write(
            android.join("app").join("build.gradle.kts"),
            "android {\n}\n",
        )
        .unwrap();
    }

    #[test]
    fn test_discover_from_repo_root() {
        let dir = tempfile::tempdir().unwrap();
        make_flutter_checkout(dir.path());

        let project = AndroidProject::discover(dir.path()).unwrap();
        assert_eq!(project.root(), dir.path().join("android"));
    }

    #[test]
    fn test_discover_from_inside_app_module() {
        let dir = tempfile::tempdir().unwrap();
        make_flutter_checkout(dir.path());

        let start = dir.path().join("android").join("app");
        let project = AndroidProject::discover(&start).unwrap();
        assert_eq!(project.root(), dir.path().join("android"));
    }

    #[test]
    fn test_discover_fails_outside_project() {
        let dir = tempfile::tempdir().unwrap();
        let err = AndroidProject::discover(dir.path()).unwrap_err();
        assert_eq!(
            err.code,
            barbergo_core::error::ErrorCode::ProjectNotFound
        );
    }

    #[test]
    fn test_open_rejects_plain_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AndroidProject::open(dir.path()).is_err());
    }

    #[test]
    fn test_layout_paths() {
        let dir = tempfile::tempdir().unwrap();
        make_flutter_checkout(dir.path());

        let project = AndroidProject::discover(dir.path()).unwrap();
        let root = dir.path().join("android");

        assert_eq!(project.key_properties_path(), root.join("key.properties"));
        assert_eq!(
            project.signing_properties_path("release.properties"),
            root.join("release.properties")
        );
        assert_eq!(project.local_properties_path(), root.join("local.properties"));
        assert_eq!(project.app_dir(), root.join("app"));
        assert_eq!(project.app_build_file().unwrap(), root.join("app").join("build.gradle.kts"));
    }

    #[test]
    fn test_app_build_file_prefers_kts() {
        let dir = tempfile::tempdir().unwrap();
        make_flutter_checkout(dir.path());
        let app = dir.path().join("android").join("app");
        fs::write(app.join("build.gradle"), "android {\n}\n").unwrap();

        let project = AndroidProject::discover(dir.path()).unwrap();
        assert!(project
            .app_build_file()
            .unwrap()
            .ends_with("build.gradle.kts"));
    }

    #[test]
    fn test_app_build_file_groovy_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let android = dir.path().join("android");
        fs::create_dir_all(android.join("app")).unwrap();
        fs::write(android.join("settings.gradle"), "// settings\n").unwrap();
        fs::write(android.join("app").join("build.gradle"), "android {\n}\n").unwrap();

        let project = AndroidProject::discover(dir.path()).unwrap();
        assert!(project.app_build_file().unwrap().ends_with("build.gradle"));
    }

    #[test]
    fn test_signing_properties_absent_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        make_flutter_checkout(dir.path());

        let project = AndroidProject::discover(dir.path()).unwrap();
        let props = project.signing_properties("key.properties").unwrap();
        assert!(props.is_empty());
    }
}
