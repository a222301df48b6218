//! Package entry step.

use crate::config::{BuildConfig, PACKAGE_ENTRY_CONTENT};
use crate::error::{ErrorExt, Result};
use std::path::Path;

/// Writes the placeholder package entry, replacing whatever was there.
pub async fn write_package_entry(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating package entry directory", parent)?;
    }
    tokio::fs::write(path, PACKAGE_ENTRY_CONTENT)
        .await
        .fs_context("writing package entry", path)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

pub async fn run(config: &BuildConfig) -> Result<()> {
    write_package_entry(config.lib_index()).await
}
