//! Logging setup: filter selection and sink wiring.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_LOG_DIR_NAME: &str = "logs";
pub const DEFAULT_LOG_FILE_PREFIX: &str = "pixlift";
pub const DEFAULT_LOG_FILE_SUFFIX: &str = "log";
pub const DEFAULT_LOG_RETENTION_FILES: usize = 14;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
    pub verbose: u8,
    /// Explicit filter from the host, e.g. `pixlift_core=trace`.
    pub cli_log_filter: Option<String>,
    /// Value of `RUST_LOG`, if the host chooses to honor it.
    pub rust_log_env: Option<String>,
    /// When set, a daily-rolling file sink is added under
    /// `<data_dir>/logs/`.
    pub data_dir: Option<PathBuf>,
    pub retention_files: usize,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            verbose: 0,
            cli_log_filter: None,
            rust_log_env: None,
            data_dir: None,
            retention_files: DEFAULT_LOG_RETENTION_FILES,
        }
    }
}

/// Explicit CLI filter overrides verbosity, which overrides `RUST_LOG`,
/// which overrides the default.
pub fn select_log_filter(options: &LoggingOptions) -> String {
    if let Some(filter) = options.cli_log_filter.as_deref() {
        filter.to_string()
    } else if options.verbose >= 2 {
        "trace".to_string()
    } else if options.verbose == 1 {
        "debug".to_string()
    } else if let Some(filter) = options.rust_log_env.as_deref() {
        filter.to_string()
    } else {
        DEFAULT_LOG_FILTER.to_string()
    }
}

pub fn build_file_appender(data_dir: &Path, retention_files: usize) -> Result<RollingFileAppender> {
    let log_dir = data_dir.join(DEFAULT_LOG_DIR_NAME);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory: {}", log_dir.display()))?;

    let retention_files = if retention_files == 0 {
        DEFAULT_LOG_RETENTION_FILES
    } else {
        retention_files
    };

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(DEFAULT_LOG_FILE_PREFIX)
        .filename_suffix(DEFAULT_LOG_FILE_SUFFIX)
        .max_log_files(retention_files)
        .build(&log_dir)
        .with_context(|| {
            format!(
                "failed to initialize rolling file sink in {}",
                log_dir.display()
            )
        })
}

/// Install the process-wide tracing subscriber. Fails if a subscriber is
/// already installed.
pub fn init_logging(options: &LoggingOptions) -> Result<()> {
    let filter = EnvFilter::try_new(select_log_filter(options))
        .context("invalid log filter directive")?;
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    match options.data_dir.as_deref() {
        Some(data_dir) => {
            let appender = build_file_appender(data_dir, options.retention_files)?;
            let file_layer = fmt::layer().with_ansi(false).with_writer(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .map_err(|error| anyhow!("failed to install tracing subscriber: {error}"))?;
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .try_init()
                .map_err(|error| anyhow!("failed to install tracing subscriber: {error}"))?;
        }
    }

    Ok(())
}
