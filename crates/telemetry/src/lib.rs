//! Logging and diagnostics for BarberGo tools
//!
//! Structured logging with tracing:
//! - Env-filtered subscriber setup shared by all binaries
//! - Verbosity flag mapping (-q / -v / -vv / -vvv)
//! - A per-invocation run ID for correlating log lines

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Global run ID for correlating logs from one invocation
static RUN_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize the logging system with defaults
pub fn init() -> anyhow::Result<()> {
    init_with_config(TelemetryConfig::default())
}

/// Initialize with custom configuration
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(config.show_target).compact());

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    announce_startup();

    Ok(())
}

/// Log the run ID once the subscriber is installed
///
/// Emitted at info: `-v` runs carry the correlation ID, the default `warn`
/// filter stays quiet.
fn announce_startup() {
    tracing::info!(
        run_id = %run_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Logging initialized"
    );
}

/// Get the current run ID
pub fn run_id() -> &'static str {
    &RUN_ID
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub show_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            show_target: false,
        }
    }
}

impl TelemetryConfig {
    /// Build a configuration from CLI verbosity flags
    ///
    /// `--quiet` wins over any number of `-v` flags.
    pub fn from_verbosity(quiet: bool, verbose: u8) -> Self {
        let log_level = if quiet {
            "error"
        } else {
            match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        };

        Self {
            log_level: log_level.to_string(),
            show_target: verbose >= 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_startup_run_id_visible_at_info() {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(fmt::layer().with_writer(capture.clone()).with_ansi(false));

        tracing::subscriber::with_default(subscriber, announce_startup);

        let logged = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains(run_id()), "startup line not logged: {:?}", logged);
    }

    #[test]
    fn test_run_id_is_uuid() {
        let id = run_id();
        assert!(!id.is_empty());
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_run_id_stable_within_process() {
        assert_eq!(run_id(), run_id());
    }

    #[test]
    fn test_default_level_is_warn() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_level, "warn");
        assert!(!config.show_target);
    }

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(TelemetryConfig::from_verbosity(false, 0).log_level, "warn");
        assert_eq!(TelemetryConfig::from_verbosity(false, 1).log_level, "info");
        assert_eq!(TelemetryConfig::from_verbosity(false, 2).log_level, "debug");
        assert_eq!(TelemetryConfig::from_verbosity(false, 3).log_level, "trace");
        assert_eq!(TelemetryConfig::from_verbosity(false, 9).log_level, "trace");
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        let config = TelemetryConfig::from_verbosity(true, 3);
        assert_eq!(config.log_level, "error");
    }

    #[test]
    fn test_show_target_follows_debug_levels() {
        assert!(!TelemetryConfig::from_verbosity(false, 1).show_target);
        assert!(TelemetryConfig::from_verbosity(false, 2).show_target);
    }
}
