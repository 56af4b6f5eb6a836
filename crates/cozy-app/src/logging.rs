//! Log setup. The terminal surface owns stdout and stderr, so records go
//! to a file in the config directory.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};

/// Install `env_logger` writing to `path` (filter from `RUST_LOG`,
/// default `info`).
pub fn init(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .context("installing logger")?;
    Ok(())
}
