pub mod analyze;
pub mod classify;
pub mod config;
pub mod preview;

use std::path::Path;

use anyhow::{Context, Result};
use geolens_core::config::AppConfig;

/// Load `path` if given, otherwise the built-in defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}

/// Single-threaded runtime for one command.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}
