//! Logging setup
//!
//! The TUI owns the terminal, so `run` logs to a file under the configured
//! log directory. Every other command logs to stderr. `RUST_LOG` overrides
//! the configured level.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prompterm_core::AppConfig;

/// Keeps the background file writer alive; logs are flushed when dropped
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

fn env_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.general.log_level))
}

/// Log to `<log_dir>/prompterm-<pid>.log`
pub fn init_file(config: &AppConfig) -> Result<LogGuard> {
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let filename = format!("prompterm-{}.log", std::process::id());
    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .context("failed to initialize logging")?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Log to stderr
pub fn init_stderr(config: &AppConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .context("failed to initialize logging")?;
    Ok(())
}
