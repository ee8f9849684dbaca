use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use log::{LevelFilter, debug};

/// Routes log output to `path`. Without a path logging stays off, since stderr
/// would draw over the terminal UI.
pub fn init_file_logger(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        log::set_max_level(LevelFilter::Off);
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_secs()
        .format_module_path(false)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("install logger")?;

    debug!("logging to {}", path.display());
    Ok(())
}

/// Stderr logger for headless binaries, filtered by `RUST_LOG` (default: warn).
pub fn init_stderr_logger() {
    let _ = env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .try_init();
}
