use crate::error::McGuessError;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Log file name inside the configured log directory
pub const LOG_FILE_NAME: &str = "mcguess.log";

/// Initialize logging for the server
///
/// Writes to the console and appends to `<log_dir>/mcguess.log`.
/// `RUST_LOG` takes precedence over `log_level`.
///
/// # Arguments
/// * `log_dir` - Directory where the log file will be stored
/// * `log_level` - Log level (trace, debug, info, warn, error)
pub fn setup_logging(log_dir: &Path, log_level: &str) -> Result<(), McGuessError> {
    let (log_file, log_file_path) = open_log_file(log_dir)?;
    let env_filter = build_filter(log_level);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(env_filter.clone());

    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| McGuessError::config(format!("Failed to install subscriber: {}", e)))?;

    tracing::info!(
        "Logging initialized: level={}, log_file={}",
        parse_log_level(log_level),
        log_file_path.display()
    );

    Ok(())
}

/// Console-only logging for the offline `guess`/`evaluate` commands
///
/// Logs go to stderr so stdout carries only the command's result.
pub fn setup_console_logging(log_level: &str) -> Result<(), McGuessError> {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_line_number(true)
        .with_env_filter(build_filter(log_level))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| McGuessError::config(format!("Failed to install subscriber: {}", e)))?;

    Ok(())
}

fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(parse_log_level(log_level).as_str().to_lowercase()))
}

fn open_log_file(log_dir: &Path) -> Result<(File, PathBuf), McGuessError> {
    std::fs::create_dir_all(log_dir).map_err(|e| {
        McGuessError::config(format!(
            "Failed to create log directory {}: {}",
            log_dir.display(),
            e
        ))
    })?;

    let path = log_dir.join(LOG_FILE_NAME);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| {
            McGuessError::config(format!("Failed to open log file {}: {}", path.display(), e))
        })?;

    Ok((file, path))
}

/// Parse string to tracing Level
pub fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to INFO", level);
            Level::INFO
        }
    }
}
