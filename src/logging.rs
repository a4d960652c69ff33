use std::fs::File;
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Env var naming a log file; overrides the configured destination.
pub const LOG_FILE_ENV: &str = "MODSHELL_LOG";
/// Env var holding an `EnvFilter` directive; overrides the configured level.
pub const LOG_FILTER_ENV: &str = "MODSHELL_LOG_FILTER";

/// Where log output ends up.
#[derive(Debug)]
enum Destination {
    Stderr,
    File(File),
}

/// Initialize tracing.
///
/// Module output (results, help, warnings) goes through the log, so the
/// default destination is stderr without timestamps. With a log file the
/// format gains timestamps and targets. A log file that cannot be opened
/// falls back to stderr.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_ascii_lowercase()));

    let log_path = std::env::var(LOG_FILE_ENV)
        .ok()
        .map(PathBuf::from)
        .or_else(|| config.file.clone());

    match destination(log_path.as_deref()) {
        Destination::Stderr => {
            let stderr_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false)
                .with_level(false);

            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
        }
        Destination::File(file) => {
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_level(true);

            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .init();
        }
    }
}

fn destination(log_path: Option<&Path>) -> Destination {
    let Some(log_path) = log_path else {
        return Destination::Stderr;
    };

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        Ok(file) => Destination::File(file),
        Err(e) => {
            eprintln!(
                "Warning: Failed to open log file {}: {}, logging to stderr",
                log_path.display(),
                e
            );
            Destination::Stderr
        }
    }
}
