//! Tracing subscriber setup.
//!
//! The level is read from `PWORD_LOG`, then `RUST_LOG`, then a per-entry-point
//! default. The TUI owns the terminal, so the binary logs to a file.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::{fmt, EnvFilter};

const LOG_ENV: &str = "PWORD_LOG";

fn env_filter(default: &str) -> EnvFilter {
    std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(default))
}

/// Appends structured logs to `path`, creating parent directories.
pub fn init_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok();
    Ok(())
}

/// Idempotent subscriber for tests; output goes through the test harness capture.
pub fn init_test() {
    static INITIALIZED: OnceLock<()> = OnceLock::new();
    INITIALIZED.get_or_init(|| {
        fmt()
            .with_env_filter(env_filter("warn"))
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_test_can_be_called_repeatedly() {
        init_test();
        init_test();
        tracing::warn!("logging initialized twice without panicking");
    }
}
