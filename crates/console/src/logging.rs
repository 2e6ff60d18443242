use std::{
    fs::{self, OpenOptions},
    sync::Mutex,
};

use anyhow::{Context, Result};
use tracing::{info, info_span};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Log to stdout (warnings by default) and to `logs/vethub.log` (info by default).
/// `RUST_LOG` overrides both filters.
pub fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("vethub.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stdout)
        .with_filter(filter_or("warn"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file))
        .with_filter(filter_or("info"));

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(())
}

fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Run `action` inside a span named after the operation, logging entry and exit.
/// The result is passed through untouched.
pub fn logged<T>(operation: &'static str, action: impl FnOnce() -> T) -> T {
    let span = info_span!("operation", name = operation);
    let _entered = span.enter();
    info!("started");
    let result = action();
    info!("finished");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logged_returns_the_action_result() {
        let mut calls = 0;
        let value = logged("increment", || {
            calls += 1;
            calls * 10
        });
        assert_eq!(value, 10);
        assert_eq!(calls, 1);
    }
}
