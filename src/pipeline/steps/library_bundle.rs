//! Library bundle step.
//!
//! Components and the three utility tiers are bundled together in a single
//! code-split invocation, so code shared between them lands in hashed chunks
//! instead of being duplicated into every entry.

use crate::bundler::{BundleOptions, BundleOutcome, Bundler, OutputTarget};
use crate::config::BuildConfig;
use crate::discovery;
use crate::error::Result;
use std::path::PathBuf;

pub const ENTRY_NAMES: &str = "[dir]/[name]";
pub const CHUNK_NAMES: &str = "chunks/[name]-[hash]";
pub const ASSET_NAMES: &str = "assets/[name]-[hash]";

/// Options for the combined library bundle.
pub fn library_options(config: &BuildConfig, entry_points: Vec<PathBuf>) -> BundleOptions {
    let mut options = BundleOptions::new(
        entry_points,
        OutputTarget::Dir(config.out_dir().to_path_buf()),
    );
    options.splitting = true;
    options.outbase = Some(config.roots().source_root.clone());
    options.entry_names = Some(ENTRY_NAMES.to_string());
    options.chunk_names = Some(CHUNK_NAMES.to_string());
    options.asset_names = Some(ASSET_NAMES.to_string());
    options.target = config.target().to_vec();
    options.external = config.external().to_vec();
    options.metafile = Some(std::env::temp_dir().join(format!(
        "kodegen-esm-meta-{}.json",
        uuid::Uuid::new_v4()
    )));
    options
}

/// Discovers library entries across every library root and bundles them at once.
///
/// Returns `None` when there is nothing to bundle.
pub async fn run<B: Bundler>(config: &BuildConfig, bundler: &B) -> Result<Option<BundleOutcome>> {
    let entries =
        discovery::discover_all(&config.roots().library_roots(), config.lib_extensions()).await?;
    if entries.is_empty() {
        log::info!("No library entry points found, skipping library bundle");
        return Ok(None);
    }
    discovery::verify_entries_exist(&entries)?;

    log::info!("Bundling {} library entry point(s)", entries.len());
    let options = library_options(config, entries);

    match bundler.build(&options).await {
        Ok(outcome) => {
            log::info!("Build completed ({} output file(s))", outcome.outputs.len());
            Ok(Some(outcome))
        }
        Err(e) => {
            log::error!("Library bundle failed: {}", e);
            Err(e)
        }
    }
}
