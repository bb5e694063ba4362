//! Debug tracing setup.
//!
//! The visible transcript is the user-facing channel; tracing output goes
//! to a file (never the terminal, which the TUI owns) and only when a log
//! path was given via `--log` or `TERMCHAT_LOG`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

pub fn init(debug_log: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = debug_log else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| e as Box<dyn std::error::Error>)?;

    Ok(())
}
