//! Gradle build script inspection
//!
//! Reads the app module's `build.gradle.kts` (or legacy `build.gradle`) and
//! extracts what the release pipeline cares about: identity, version fields,
//! SDK pins vs Flutter forwards, desugaring, and how release signing is wired.
//!
//! This is regex extraction, not a Groovy/Kotlin parser. The patterns accept
//! both DSL dialects (`versionCode = 3` and `versionCode 3`) and ignore what
//! they do not recognize.

use crate::sdk::SdkBinding;
use barbergo_core::error::{Error, Result};
use barbergo_core::validation::{ValidationResult, Validator};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static NAMESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*namespace\s*=?\s*["']([^"']+)["']"#).unwrap());

static APPLICATION_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*applicationId\s*=?\s*["']([^"']+)["']"#).unwrap());

static VERSION_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*versionCode\s*=?\s*(\d+)").unwrap());

static VERSION_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*versionName\s*=?\s*["']([^"']+)["']"#).unwrap());

static COMPILE_SDK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*compileSdk(?:Version)?\s*=?\s*(\d+|flutter\.compileSdkVersion)").unwrap()
});

static MIN_SDK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*minSdk(?:Version)?\s*=?\s*(\d+|flutter\.minSdkVersion)").unwrap()
});

static TARGET_SDK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*targetSdk(?:Version)?\s*=?\s*(\d+|flutter\.targetSdkVersion)").unwrap()
});

static NDK_VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*ndkVersion\s*=?\s*(?:["']([^"']+)["']|(flutter\.ndkVersion))"#).unwrap()
});

static JVM_TARGET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*jvmTarget\s*=?\s*["']([^"']+)["']"#).unwrap());

static DESUGARING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:isCoreLibraryDesugaringEnabled|coreLibraryDesugaringEnabled)\s*=?\s*(true|false)")
        .unwrap()
});

static DESUGAR_DEP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"coreLibraryDesugaring\s*\(?\s*["']com\.android\.tools:desugar_jdk_libs:([^"']+)["']"#)
        .unwrap()
});

static MINIFY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:isMinifyEnabled|minifyEnabled)\s*=?\s*(true|false)").unwrap()
});

static SHRINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:isShrinkResources|shrinkResources)\s*=?\s*(true|false)").unwrap()
});

static PLUGIN_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*id\s*\(?\s*["']([^"']+)["']"#).unwrap());

static KEY_PROPERTIES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["']key\.properties["']"#).unwrap());

static SIGNING_CONFIGS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"signingConfigs\s*\{").unwrap());

static RELEASE_CONFIG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"create\s*\(\s*["']release["']|release\s*\{"#).unwrap());

static BUILD_TYPES_RELEASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)buildTypes\s*\{.*?release\s*\{").unwrap());

static RELEASE_SIGNING_USE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"signingConfig\s*=?\s*signingConfigs\.(?:getByName\s*\(\s*["']release["']\s*\)|release\b)"#)
        .unwrap()
});

/// The Flutter Gradle plugin id
pub const FLUTTER_PLUGIN_ID: &str = "dev.flutter.flutter-gradle-plugin";

/// Minimum desugar_jdk_libs the app's dependencies require
const MIN_DESUGAR_VERSION: (u64, u64, u64) = (2, 1, 4);

/// What the app module's build script declares
#[derive(Debug, Clone)]
pub struct GradleBuildFile {
    /// Path the script was read from
    pub path: PathBuf,
    /// `namespace`
    pub namespace: Option<String>,
    /// `applicationId`
    pub application_id: Option<String>,
    /// `versionCode`
    pub version_code: Option<u32>,
    /// `versionName`
    pub version_name: Option<String>,
    /// `compileSdk`, pinned or forwarded
    pub compile_sdk: Option<SdkBinding<u32>>,
    /// `minSdk`, pinned or forwarded
    pub min_sdk: Option<SdkBinding<u32>>,
    /// `targetSdk`, pinned or forwarded
    pub target_sdk: Option<SdkBinding<u32>>,
    /// `ndkVersion`, pinned or forwarded
    pub ndk_version: Option<SdkBinding<String>>,
    /// Kotlin `jvmTarget`
    pub jvm_target: Option<String>,
    /// `isCoreLibraryDesugaringEnabled`
    pub desugaring_enabled: Option<bool>,
    /// Version of the `desugar_jdk_libs` dependency
    pub desugar_jdk_libs: Option<String>,
    /// `isMinifyEnabled` in the release build type
    pub minify_enabled: Option<bool>,
    /// `isShrinkResources` in the release build type
    pub shrink_resources: Option<bool>,
    /// Applied plugin ids
    pub plugins: Vec<String>,
    /// Whether the script loads `key.properties`
    pub loads_key_properties: bool,
    /// Whether a `release` build type block is present
    pub has_release_build_type: bool,
    /// Whether a `release` signing config is declared
    pub declares_release_signing: bool,
    /// Whether the release build type uses the release signing config
    pub release_signed_by_release_config: bool,
}

impl GradleBuildFile {
    /// Read and parse a build script
    ///
    /// Unlike the properties loader, a missing build script is an error; a
    /// project without one is not inspectable.
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::file_not_found(path)
            } else {
                Error::from(e)
            }
        })?;
        Ok(Self::parse(path, &content))
    }

    /// Parse build script text
    pub fn parse(path: &Path, content: &str) -> Self {
        let plugins = PLUGIN_ID_RE
            .captures_iter(content)
            .map(|cap| cap[1].to_string())
            .collect();

        Self {
            path: path.to_path_buf(),
            namespace: capture_string(&NAMESPACE_RE, content),
            application_id: capture_string(&APPLICATION_ID_RE, content),
            version_code: capture_u32(&VERSION_CODE_RE, content),
            version_name: capture_string(&VERSION_NAME_RE, content),
            compile_sdk: capture_sdk(&COMPILE_SDK_RE, content),
            min_sdk: capture_sdk(&MIN_SDK_RE, content),
            target_sdk: capture_sdk(&TARGET_SDK_RE, content),
            ndk_version: capture_ndk(content),
            jvm_target: capture_string(&JVM_TARGET_RE, content),
            desugaring_enabled: capture_bool(&DESUGARING_RE, content),
            desugar_jdk_libs: capture_string(&DESUGAR_DEP_RE, content),
            minify_enabled: capture_bool(&MINIFY_RE, content),
            shrink_resources: capture_bool(&SHRINK_RE, content),
            plugins,
            loads_key_properties: KEY_PROPERTIES_RE.is_match(content),
            has_release_build_type: BUILD_TYPES_RELEASE_RE.is_match(content),
            declares_release_signing: declares_release_signing(content),
            release_signed_by_release_config: release_signed_by_release_config(content),
        }
    }

    /// Whether the script is Kotlin DSL
    pub fn is_kotlin_dsl(&self) -> bool {
        self.path.extension().is_some_and(|ext| ext == "kts")
    }

    /// Whether the Flutter Gradle plugin is applied
    pub fn uses_flutter_plugin(&self) -> bool {
        self.plugins.iter().any(|p| p == FLUTTER_PLUGIN_ID)
    }

    /// Validate what the script declares
    ///
    /// Errors are things that break the release build or the Play upload;
    /// warnings are drift from the project's conventions.
    pub fn validate(&self) -> ValidationResult {
        let mut v = Validator::new()
            .required(
                "applicationId",
                self.application_id.as_deref().unwrap_or(""),
            );

        if let Some(app_id) = &self.application_id {
            v = v.pattern(
                "applicationId",
                app_id,
                r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)+$",
                "reverse-DNS application id",
            );
        }

        if let Some(code) = self.version_code {
            // Play Console rejects anything above 2100000000
            v = v.range("versionCode", code, 1, 2_100_000_000);
        }

        if let Some(name) = &self.version_name {
            v = v.pattern(
                "versionName",
                name,
                r"^\d+\.\d+\.\d+$",
                "MAJOR.MINOR.PATCH version",
            );
        }

        v = v.custom("desugar_jdk_libs", || {
            let raw = self.desugar_jdk_libs.as_deref()?;
            let (maj, min, patch) = MIN_DESUGAR_VERSION;
            let floor = semver::Version::new(maj, min, patch);
            match semver::Version::parse(raw) {
                Ok(version) if version >= floor => None,
                Ok(version) => Some(format!(
                    "desugar_jdk_libs {} is older than the required {}",
                    version, floor
                )),
                Err(_) => Some(format!("Unparseable desugar_jdk_libs version: {}", raw)),
            }
        });

        v = v.custom("coreLibraryDesugaring", || {
            if self.desugaring_enabled == Some(true) && self.desugar_jdk_libs.is_none() {
                Some("Desugaring is enabled but the desugar_jdk_libs dependency is missing".into())
            } else {
                None
            }
        });

        v = v.custom("buildTypes.release", || {
            if self.release_signed_by_release_config && !self.declares_release_signing {
                Some("Release build type uses a signing config that is never declared".into())
            } else {
                None
            }
        });

        v = v.custom("buildTypes.release", || {
            if self.has_release_build_type
                && !self.declares_release_signing
                && !self.release_signed_by_release_config
            {
                Some("Release build type never references a release signing config".into())
            } else {
                None
            }
        });

        v = v
            .warn_if(
                "signingConfigs",
                self.declares_release_signing && !self.loads_key_properties,
                "Release signing config is declared but key.properties is never loaded",
            )
            .warn_if(
                "buildTypes.release",
                self.declares_release_signing && !self.release_signed_by_release_config,
                "Release signing config is declared but the release build type does not use it",
            )
            .warn_if(
                "jvmTarget",
                self.jvm_target.as_deref().is_some_and(|t| t != "17"),
                "jvmTarget differs from the project standard (17)",
            )
            .warn_if(
                "shrinkResources",
                self.shrink_resources == Some(true) && self.minify_enabled == Some(false),
                "shrinkResources without minifyEnabled fails at configuration time",
            );

        v.validate()
    }
}

fn capture_string(re: &Regex, content: &str) -> Option<String> {
    re.captures(content).map(|cap| cap[1].to_string())
}

fn capture_u32(re: &Regex, content: &str) -> Option<u32> {
    re.captures(content).and_then(|cap| cap[1].parse().ok())
}

fn capture_bool(re: &Regex, content: &str) -> Option<bool> {
    re.captures(content).map(|cap| &cap[1] == "true")
}

fn capture_sdk(re: &Regex, content: &str) -> Option<SdkBinding<u32>> {
    let cap = re.captures(content)?;
    let value = &cap[1];
    if value.starts_with("flutter.") {
        Some(SdkBinding::Flutter)
    } else {
        value.parse().ok().map(SdkBinding::Pinned)
    }
}

fn capture_ndk(content: &str) -> Option<SdkBinding<String>> {
    let cap = NDK_VERSION_RE.captures(content)?;
    match cap.get(1) {
        Some(pinned) => Some(SdkBinding::Pinned(pinned.as_str().to_string())),
        None => Some(SdkBinding::Flutter),
    }
}

// The declaration checks mirror each other: anchor on the enclosing block,
// then search a bounded window so a match in some later block does not count.

fn declares_release_signing(content: &str) -> bool {
    let Some(m) = SIGNING_CONFIGS_RE.find(content) else {
        return false;
    };
    let window_end = (m.end() + 600).min(content.len());
    RELEASE_CONFIG_RE.is_match(&content[m.end()..window_end])
}

fn release_signed_by_release_config(content: &str) -> bool {
    let Some(m) = BUILD_TYPES_RELEASE_RE.find(content) else {
        return false;
    };
    let window_end = (m.end() + 400).min(content.len());
    RELEASE_SIGNING_USE_RE.is_match(&content[m.end()..window_end])
}
