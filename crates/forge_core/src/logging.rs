use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{ForgeConfig, LOG_LEVEL_ENV};

/// Initializes the logging system with file + console output.
/// Returns a guard that must be kept alive for the duration of the app.
pub fn init_logging(config: &ForgeConfig) -> Result<WorkerGuard> {
    let logs_dir = ForgeConfig::logs_dir()?;
    std::fs::create_dir_all(&logs_dir)?;

    // File appender: daily rotation
    let file_appender = tracing_appender::rolling::daily(&logs_dir, "conceptforge");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = build_filter(&default_filter(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(guard)
}

/// File-only logging into `logs_dir`, used when the CLI is given
/// `--log-dir`. A bare level in `filter` is scoped like the config's.
pub fn init_logging_to_dir(logs_dir: &std::path::Path, filter: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)?;

    let file_appender = tracing_appender::rolling::daily(logs_dir, "conceptforge");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(build_filter(&default_filter(filter)))
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(guard)
}

/// The crate-scoped default directive for a bare level such as `info`.
fn default_filter(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    format!("warn,forge_app={level},forge_core={level},forge_ai={level},forge_learn={level}")
}

fn build_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn init_logging_to_dir_creates_directory() {
        let tmp = tempfile::tempdir().expect("Failed to create tempdir");
        let logs_dir = tmp.path().join("nested").join("logs");
        assert!(!logs_dir.exists());

        // The global subscriber can only be installed once per process, so
        // only the directory creation is asserted here.
        let guard = init_logging_to_dir(&logs_dir, "warn");
        assert!(logs_dir.exists());
        drop(guard);
    }

    #[test]
    fn init_logging_to_dir_existing_directory() {
        let tmp = tempfile::tempdir().expect("Failed to create tempdir");
        let logs_dir = tmp.path().join("logs");
        fs::create_dir_all(&logs_dir).unwrap();

        let result = init_logging_to_dir(&logs_dir, "info");
        assert!(logs_dir.exists());
        if let Err(e) = result {
            let msg = e.to_string();
            assert!(
                msg.contains("logging") || msg.contains("subscriber"),
                "unexpected error: {msg}"
            );
        }
    }

    #[test]
    fn default_filter_scopes_bare_level() {
        let filter = default_filter("debug");
        assert!(filter.starts_with("warn,"));
        assert!(filter.contains("forge_learn=debug"));
        assert!(filter.contains("forge_ai=debug"));
    }

    #[test]
    fn default_filter_keeps_directives() {
        assert_eq!(default_filter("forge_ai=trace,info"), "forge_ai=trace,info");
    }

    #[test]
    fn env_filter_fallback() {
        let filters = ["info", "debug", "warn", "trace", "forge_learn=debug,warn"];
        for f in &filters {
            drop(build_filter(f));
        }
    }
}
