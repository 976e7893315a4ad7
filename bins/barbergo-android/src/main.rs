//! BarberGo Android CLI
//!
//! Release signing preflight and build tools for the BarberGo Android app.

use anyhow::Result;
use barbergo_android::gradle;
use barbergo_android::gradle_file::GradleBuildFile;
use barbergo_android::keystore;
use barbergo_android::project::AndroidProject;
use barbergo_android::sdk::{FlutterSdkDefaults, SdkBinding};
use barbergo_android::signing::SigningConfig;
use barbergo_cli::output::{format_count, format_duration, format_size, key_value, Status};
use barbergo_cli::progress;
use barbergo_core::config::Config;
use barbergo_core::error::exit_codes;
use barbergo_core::process::command_exists;
use barbergo_telemetry::TelemetryConfig;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "barbergo-android")]
#[command(about = "Release signing preflight and build tools for BarberGo Android")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Android project root (default: discovered from the working directory)
    #[arg(short = 'C', long, global = true)]
    project_dir: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage release signing credentials
    Signing {
        #[command(subcommand)]
        action: SigningAction,
    },

    /// Inspect what the app module's build script declares
    Inspect,

    /// Diagnose the build environment
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the app through the Gradle wrapper
    Build {
        /// Build configuration: debug, release
        #[arg(long, default_value = "debug")]
        configuration: String,
        /// Clean before building
        #[arg(long)]
        clean: bool,
        /// Build an app bundle (AAB) instead of an APK
        #[arg(long)]
        bundle: bool,
    },

    /// Clean build outputs
    Clean,
}

#[derive(Subcommand)]
enum SigningAction {
    /// Check that release signing resolves
    Check {
        /// Also verify the keystore accepts the credentials
        #[arg(long)]
        strict: bool,

        /// Emit the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved signing configuration
    Show {
        /// Print passwords instead of masking them
        #[arg(long)]
        reveal: bool,
    },

    /// Write a starter credentials file
    Init,

    /// Print Gradle's signing report for all variants
    Report,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    barbergo_telemetry::init_with_config(TelemetryConfig::from_verbosity(cli.quiet, cli.verbose))?;

    let config = Config::load(cli.config.as_deref().map(|p| p.to_str().unwrap()))?;
    let project_dir = cli.project_dir.as_deref();

    let exit_code = match cli.command {
        Commands::Signing { action } => match action {
            SigningAction::Check { strict, json } => {
                run_signing_check(project_dir, &config, strict, json)
            }
            SigningAction::Show { reveal } => run_signing_show(project_dir, &config, reveal),
            SigningAction::Init => run_signing_init(project_dir, &config),
            SigningAction::Report => run_signing_report(project_dir, &config),
        },
        Commands::Inspect => run_inspect(project_dir, &config),
        Commands::Doctor { json } => run_doctor(project_dir, &config, json),
        Commands::Build {
            configuration,
            clean,
            bundle,
        } => run_build(project_dir, &config, &configuration, clean, bundle),
        Commands::Clean => run_clean(project_dir, &config),
    };

    std::process::exit(exit_code);
}

/// Locate the Android project: explicit flag, configured layout, then discovery
fn resolve_project(
    explicit: Option<&Path>,
    config: &Config,
) -> barbergo_core::error::Result<AndroidProject> {
    if let Some(dir) = explicit {
        return AndroidProject::open(dir);
    }
    let cwd = std::env::current_dir()?;
    let configured = cwd.join(&config.schema.project.android_dir);
    if let Ok(project) = AndroidProject::open(&configured) {
        return Ok(project);
    }
    AndroidProject::discover(&cwd)
}

fn load_project(explicit: Option<&Path>, config: &Config) -> Option<AndroidProject> {
    match resolve_project(explicit, config) {
        Ok(project) => Some(project),
        Err(e) => {
            Status::error(&e.to_string());
            None
        }
    }
}

fn run_signing_check(project_dir: Option<&Path>, config: &Config, strict: bool, json: bool) -> i32 {
    let Some(project) = load_project(project_dir, config) else {
        return exit_codes::FAILURE;
    };
    let file_name = &config.schema.project.signing_properties;

    let props = match project.signing_properties(file_name) {
        Ok(props) => props,
        Err(e) => {
            Status::error(&e.to_string());
            return exit_codes::FAILURE;
        }
    };
    for warning in props.warnings() {
        Status::warning(&format!("{}: {}", file_name, warning));
    }

    let signing = match SigningConfig::from_properties(&props, &project.app_dir()) {
        Ok(signing) => signing,
        Err(e) => {
            if json {
                print_error_report(&e);
            } else {
                Status::error(&e.to_string());
            }
            return exit_codes::SIGNING_ERROR;
        }
    };

    let verified = if strict {
        Some(keystore::verify(&signing))
    } else {
        None
    };

    if json {
        if let Some(Err(e)) = &verified {
            print_error_report(e);
            return exit_codes::SIGNING_ERROR;
        }
        let payload = serde_json::json!({
            "ok": true,
            "source": project.signing_properties_path(file_name).display().to_string(),
            "key_alias": signing.key_alias,
            "store_file": signing.store_file.display().to_string(),
            "keystore_present": keystore::exists(&signing),
            "gitignored": keystore::is_gitignored(project.root(), file_name),
        });
        return match serde_json::to_string_pretty(&payload) {
            Ok(rendered) => {
                println!("{}", rendered);
                exit_codes::SUCCESS
            }
            Err(e) => {
                Status::error(&format!("Failed to render report: {}", e));
                exit_codes::FAILURE
            }
        };
    }

    Status::success(&format!("Release signing resolves from {}", file_name));

    if project.signing_properties_path(file_name).is_file()
        && !keystore::is_gitignored(project.root(), file_name)
    {
        Status::warning(&format!(
            "{} is not covered by android/.gitignore",
            file_name
        ));
    }

    match verified {
        Some(Ok(())) => {
            Status::success(&format!("Keystore accepts alias '{}'", signing.key_alias));
            exit_codes::SUCCESS
        }
        Some(Err(e)) => {
            Status::error(&e.to_string());
            exit_codes::SIGNING_ERROR
        }
        None => {
            if !keystore::exists(&signing) {
                Status::warning(&format!(
                    "Keystore not found at {}; the release build will fail until it exists",
                    signing.store_file.display()
                ));
            }
            exit_codes::SUCCESS
        }
    }
}

/// Machine-readable error payload for `--json` consumers
fn print_error_report(err: &barbergo_core::error::Error) {
    match serde_json::to_string_pretty(&err.to_report()) {
        Ok(rendered) => println!("{}", rendered),
        Err(_) => Status::error(&err.to_string()),
    }
}

fn run_signing_show(project_dir: Option<&Path>, config: &Config, reveal: bool) -> i32 {
    let Some(project) = load_project(project_dir, config) else {
        return exit_codes::FAILURE;
    };
    let file_name = &config.schema.project.signing_properties;

    let props = match project.signing_properties(file_name) {
        Ok(props) => props,
        Err(e) => {
            Status::error(&e.to_string());
            return exit_codes::FAILURE;
        }
    };

    let signing = match SigningConfig::from_properties(&props, &project.app_dir()) {
        Ok(signing) => signing,
        Err(e) => {
            Status::error(&e.to_string());
            return exit_codes::SIGNING_ERROR;
        }
    };

    Status::header("Release signing");
    key_value(
        "source",
        &project.signing_properties_path(file_name).display().to_string(),
    );
    key_value("keyAlias", &signing.key_alias);
    key_value("keyPassword", &reveal_or_mask(signing.key_password(), reveal));
    key_value("storeFile", &signing.store_file.display().to_string());
    key_value(
        "storePassword",
        &reveal_or_mask(signing.store_password(), reveal),
    );
    key_value(
        "keystore",
        if keystore::exists(&signing) {
            "present"
        } else {
            "missing"
        },
    );

    exit_codes::SUCCESS
}

fn reveal_or_mask(value: &str, reveal: bool) -> String {
    if reveal {
        value.to_string()
    } else {
        "********".to_string()
    }
}

fn run_signing_init(project_dir: Option<&Path>, config: &Config) -> i32 {
    let Some(project) = load_project(project_dir, config) else {
        return exit_codes::FAILURE;
    };
    let file_name = &config.schema.project.signing_properties;
    let path = project.signing_properties_path(file_name);

    match keystore::write_template(&path) {
        Ok(()) => {
            Status::success(&format!("Wrote {}", path.display()));
            Status::info("Fill in storePassword and keyPassword before building a release");
            if !keystore::is_gitignored(project.root(), file_name) {
                Status::warning(&format!(
                    "Add {} to android/.gitignore before committing",
                    file_name
                ));
            }
            exit_codes::SUCCESS
        }
        Err(e) => {
            Status::error(&e.to_string());
            exit_codes::FAILURE
        }
    }
}

fn run_signing_report(project_dir: Option<&Path>, config: &Config) -> i32 {
    let Some(project) = load_project(project_dir, config) else {
        return exit_codes::FAILURE;
    };

    if !project.has_wrapper() {
        Status::error(&format!(
            "Gradle wrapper not found at {}",
            project.gradle_wrapper().display()
        ));
        return exit_codes::FAILURE;
    }

    match gradle::signing_report(project.root()) {
        Ok(r) if r.success => {
            print!("{}", r.stdout);
            exit_codes::SUCCESS
        }
        Ok(r) => {
            Status::error("signingReport failed");
            eprintln!("{}", r.stderr_tail(40));
            exit_codes::FAILURE
        }
        Err(e) => {
            Status::error(&e.to_string());
            exit_codes::FAILURE
        }
    }
}

fn run_inspect(project_dir: Option<&Path>, config: &Config) -> i32 {
    let Some(project) = load_project(project_dir, config) else {
        return exit_codes::FAILURE;
    };

    let build = match project
        .app_build_file()
        .and_then(|path| GradleBuildFile::open(&path))
    {
        Ok(build) => build,
        Err(e) => {
            Status::error(&e.to_string());
            return exit_codes::FAILURE;
        }
    };

    let defaults = FlutterSdkDefaults::from_config(&config.schema.flutter);

    Status::header("App module");
    key_value("script", &build.path.display().to_string());
    key_value(
        "dialect",
        if build.is_kotlin_dsl() {
            "Kotlin DSL"
        } else {
            "Groovy"
        },
    );
    key_value("namespace", build.namespace.as_deref().unwrap_or("-"));
    key_value(
        "applicationId",
        build.application_id.as_deref().unwrap_or("-"),
    );
    key_value(
        "versionCode",
        &build
            .version_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "-".to_string()),
    );
    key_value("versionName", build.version_name.as_deref().unwrap_or("-"));
    key_value("plugins", &build.plugins.join(", "));

    Status::header("SDK versions");
    key_value("compileSdk", &describe_sdk(&build.compile_sdk, &defaults.compile_sdk));
    key_value("minSdk", &describe_sdk(&build.min_sdk, &defaults.min_sdk));
    key_value("targetSdk", &describe_sdk(&build.target_sdk, &defaults.target_sdk));
    key_value("ndkVersion", &describe_sdk(&build.ndk_version, &defaults.ndk_version));

    Status::header("Compile options");
    key_value("jvmTarget", build.jvm_target.as_deref().unwrap_or("-"));
    key_value(
        "desugaring",
        match build.desugaring_enabled {
            Some(true) => "enabled",
            Some(false) => "disabled",
            None => "-",
        },
    );
    key_value(
        "desugar_jdk_libs",
        build.desugar_jdk_libs.as_deref().unwrap_or("-"),
    );

    Status::header("Release build type");
    key_value(
        "key.properties",
        if build.loads_key_properties {
            "loaded"
        } else {
            "not loaded"
        },
    );
    key_value(
        "signing config",
        if build.declares_release_signing {
            "release declared"
        } else {
            "not declared"
        },
    );
    key_value(
        "signed with",
        if build.release_signed_by_release_config {
            "release config"
        } else {
            "not wired"
        },
    );
    key_value("minify", &describe_flag(build.minify_enabled));
    key_value("shrinkResources", &describe_flag(build.shrink_resources));

    let result = build.validate();
    println!();
    for warning in result.warnings() {
        Status::warning(&warning.to_string());
    }
    if result.is_valid() {
        Status::success("Build script looks consistent");
        exit_codes::SUCCESS
    } else {
        for error in result.errors() {
            Status::error(&error.to_string());
        }
        exit_codes::VALIDATION_ERROR
    }
}

fn describe_sdk<T: std::fmt::Display>(
    binding: &Option<SdkBinding<T>>,
    flutter_default: &T,
) -> String {
    match binding {
        Some(binding) => binding.describe(flutter_default),
        None => "-".to_string(),
    }
}

fn describe_flag(flag: Option<bool>) -> String {
    match flag {
        Some(true) => "true".to_string(),
        Some(false) => "false".to_string(),
        None => "-".to_string(),
    }
}

enum CheckStatus {
    Ok,
    Warn,
    Fail,
}

impl CheckStatus {
    fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "ok",
            CheckStatus::Warn => "warn",
            CheckStatus::Fail => "fail",
        }
    }
}

struct DoctorCheck {
    name: String,
    status: CheckStatus,
    detail: Option<String>,
}

fn check_ok(name: &str, detail: Option<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        status: CheckStatus::Ok,
        detail,
    }
}

fn check_warn(name: &str, detail: Option<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        status: CheckStatus::Warn,
        detail,
    }
}

fn check_fail(name: &str, detail: Option<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        status: CheckStatus::Fail,
        detail,
    }
}

fn doctor_checks(project: Option<&AndroidProject>, config: &Config) -> Vec<DoctorCheck> {
    let mut checks = Vec::new();

    // java runs Gradle itself; keytool and flutter only gate optional steps
    for (tool, required) in [("java", true), ("keytool", false), ("flutter", false)] {
        checks.push(if command_exists(tool) {
            check_ok(tool, Some("installed".to_string()))
        } else if required {
            check_fail(tool, Some("not found on PATH".to_string()))
        } else {
            check_warn(tool, Some("not found on PATH".to_string()))
        });
    }

    let Some(project) = project else {
        checks.push(check_fail(
            "Android project",
            Some("not found from the current directory".to_string()),
        ));
        return checks;
    };
    checks.push(check_ok(
        "Android project",
        Some(project.root().display().to_string()),
    ));

    checks.push(if project.has_wrapper() {
        check_ok("Gradle wrapper", None)
    } else {
        check_fail(
            "Gradle wrapper",
            Some(format!("{} missing", project.gradle_wrapper().display())),
        )
    });

    match project.local_properties() {
        Ok(props) => {
            checks.push(
                if props.contains_key("sdk.dir") || props.contains_key("flutter.sdk") {
                    check_ok("local.properties", Some("SDK locations configured".to_string()))
                } else {
                    check_warn(
                        "local.properties",
                        Some("no sdk.dir or flutter.sdk entry".to_string()),
                    )
                },
            );
        }
        Err(e) => checks.push(check_warn("local.properties", Some(e.message.clone()))),
    }

    match project
        .app_build_file()
        .and_then(|path| GradleBuildFile::open(&path))
    {
        Ok(build) => {
            let result = build.validate();
            checks.push(if !result.is_valid() {
                check_fail(
                    "build script",
                    Some(format_count(
                        result.errors().len(),
                        "validation error",
                        "validation errors",
                    )),
                )
            } else if !result.warnings().is_empty() {
                check_warn(
                    "build script",
                    Some(format_count(result.warnings().len(), "warning", "warnings")),
                )
            } else {
                check_ok("build script", Some(build.path.display().to_string()))
            });

            // Resolved against the pinned Flutter release; the script itself
            // may only say `flutter.compileSdkVersion`.
            let defaults = FlutterSdkDefaults::from_config(&config.schema.flutter);
            let compile = build
                .compile_sdk
                .as_ref()
                .map(|binding| binding.resolve(&defaults.compile_sdk));
            let target = build
                .target_sdk
                .as_ref()
                .map(|binding| binding.resolve(&defaults.target_sdk));
            if let (Some(compile), Some(target)) = (compile, target) {
                checks.push(if target <= compile {
                    check_ok(
                        "SDK levels",
                        Some(format!("compile {} / target {}", compile, target)),
                    )
                } else {
                    check_warn(
                        "SDK levels",
                        Some(format!(
                            "targetSdk {} exceeds compileSdk {}",
                            target, compile
                        )),
                    )
                });
            }
        }
        Err(e) => checks.push(check_fail("build script", Some(e.message.clone()))),
    }

    let file_name = &config.schema.project.signing_properties;
    match project.signing_properties(file_name) {
        Ok(props) => {
            if !props.warnings().is_empty() {
                checks.push(check_warn(
                    "properties syntax",
                    Some(format_count(
                        props.warnings().len(),
                        "malformed line",
                        "malformed lines",
                    )),
                ));
            }

            if !project.signing_properties_path(file_name).is_file() {
                checks.push(check_warn(
                    "signing credentials",
                    Some(format!("{} absent; debug builds only", file_name)),
                ));
            } else {
                match SigningConfig::from_properties(&props, &project.app_dir()) {
                    Ok(signing) => {
                        checks.push(check_ok("signing credentials", Some("complete".to_string())));
                        checks.push(if keystore::exists(&signing) {
                            check_ok("keystore", Some(signing.store_file.display().to_string()))
                        } else {
                            check_fail(
                                "keystore",
                                Some(format!("not found at {}", signing.store_file.display())),
                            )
                        });
                    }
                    Err(e) => {
                        checks.push(check_fail("signing credentials", Some(e.message.clone())))
                    }
                }

                checks.push(if keystore::is_gitignored(project.root(), file_name) {
                    check_ok("gitignore", Some(format!("{} ignored", file_name)))
                } else {
                    check_warn(
                        "gitignore",
                        Some(format!("{} is not ignored", file_name)),
                    )
                });
            }
        }
        Err(e) => checks.push(check_fail("signing credentials", Some(e.message.clone()))),
    }

    checks
}

fn run_doctor(project_dir: Option<&Path>, config: &Config, json: bool) -> i32 {
    let project = resolve_project(project_dir, config).ok();
    let checks = doctor_checks(project.as_ref(), config);
    let failed = checks
        .iter()
        .any(|check| matches!(check.status, CheckStatus::Fail));

    if json {
        let payload = serde_json::json!({
            "run_id": barbergo_telemetry::run_id(),
            "ok": !failed,
            "checks": checks
                .iter()
                .map(|check| {
                    serde_json::json!({
                        "name": check.name,
                        "status": check.status.as_str(),
                        "detail": check.detail,
                    })
                })
                .collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => {
                Status::error(&format!("Failed to render report: {}", e));
                return exit_codes::FAILURE;
            }
        }
    } else {
        Status::header("Build environment");
        for check in &checks {
            let line = match &check.detail {
                Some(detail) => format!("{}: {}", check.name, detail),
                None => check.name.clone(),
            };
            match check.status {
                CheckStatus::Ok => Status::success(&line),
                CheckStatus::Warn => Status::warning(&line),
                CheckStatus::Fail => Status::error(&line),
            }
        }
    }

    if failed {
        exit_codes::FAILURE
    } else {
        exit_codes::SUCCESS
    }
}

fn run_build(
    project_dir: Option<&Path>,
    config: &Config,
    configuration: &str,
    clean: bool,
    bundle: bool,
) -> i32 {
    if configuration != "debug" && configuration != "release" {
        Status::error(&format!(
            "Unknown configuration: {} (use debug or release)",
            configuration
        ));
        return exit_codes::FAILURE;
    }

    let Some(project) = load_project(project_dir, config) else {
        return exit_codes::FAILURE;
    };

    if !project.has_wrapper() {
        Status::error(&format!(
            "Gradle wrapper not found at {}",
            project.gradle_wrapper().display()
        ));
        return exit_codes::FAILURE;
    }

    // Release signing resolves before Gradle runs; debug builds skip this
    // entirely and build unsigned.
    if configuration == "release" {
        let file_name = &config.schema.project.signing_properties;
        let props = match project.signing_properties(file_name) {
            Ok(props) => props,
            Err(e) => {
                Status::error(&e.to_string());
                return exit_codes::FAILURE;
            }
        };
        match SigningConfig::from_properties(&props, &project.app_dir()) {
            Ok(signing) => {
                if !keystore::exists(&signing) {
                    Status::warning(&format!(
                        "Keystore not found at {}; Gradle will fail at the signing step",
                        signing.store_file.display()
                    ));
                }
            }
            Err(e) => {
                Status::error(&e.to_string());
                return exit_codes::SIGNING_ERROR;
            }
        }
    }

    if clean {
        Status::info("Cleaning...");
        if let Err(e) = gradle::clean(project.root()) {
            Status::error(&format!("Clean failed: {}", e));
            return exit_codes::FAILURE;
        }
    }

    let artifact_kind = if bundle { "bundle" } else { "APK" };
    let pb = progress::spinner(&format!("Building {} {}...", configuration, artifact_kind));
    let started = Instant::now();

    let result = if bundle {
        if configuration == "release" {
            gradle::bundle_release(project.root())
        } else {
            gradle::bundle_debug(project.root())
        }
    } else if configuration == "release" {
        gradle::assemble_release(project.root())
    } else {
        gradle::assemble_debug(project.root())
    };

    match result {
        Ok(r) if r.success => {
            progress::finish_success(
                &pb,
                &format!(
                    "Built {} {} in {}",
                    configuration,
                    artifact_kind,
                    format_duration(started.elapsed())
                ),
            );
            let artifact = gradle::artifact_path(project.root(), configuration, bundle);
            if let Ok(metadata) = std::fs::metadata(&artifact) {
                key_value(
                    "artifact",
                    &format!("{} ({})", artifact.display(), format_size(metadata.len())),
                );
            }
            exit_codes::SUCCESS
        }
        Ok(r) => {
            progress::finish_error(&pb, &format!("{} build failed", configuration));
            eprintln!("{}", r.stderr_tail(40));
            exit_codes::FAILURE
        }
        Err(e) => {
            progress::finish_error(&pb, "Build error");
            Status::error(&e.to_string());
            exit_codes::FAILURE
        }
    }
}

fn run_clean(project_dir: Option<&Path>, config: &Config) -> i32 {
    let Some(project) = load_project(project_dir, config) else {
        return exit_codes::FAILURE;
    };

    if !project.has_wrapper() {
        Status::error(&format!(
            "Gradle wrapper not found at {}",
            project.gradle_wrapper().display()
        ));
        return exit_codes::FAILURE;
    }

    Status::info("Cleaning build outputs...");
    match gradle::clean(project.root()) {
        Ok(r) if r.success => {
            Status::success("Clean complete");
            exit_codes::SUCCESS
        }
        Ok(r) => {
            Status::error("Clean failed");
            eprintln!("{}", r.stderr_tail(40));
            exit_codes::FAILURE
        }
        Err(e) => {
            Status::error(&format!("Clean failed: {}", e));
            exit_codes::FAILURE
        }
    }
}
