//! CLI bundle step.
//!
//! Every CLI entry point becomes one standalone, minified ESM file under
//! `<out_dir>/<cli_out_subdir>/`. Entries are bundled concurrently and
//! independently; the first failure to complete fails the step and aborts
//! the bundles still in flight.

use crate::bundler::{BundleOptions, BundleOutcome, Bundler, OutputTarget};
use crate::config::BuildConfig;
use crate::discovery::{self, INDEX_STEM};
use crate::error::{BuildError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Output file for a CLI entry: named after its directory, or `index` for the root's own index.
pub fn cli_output_path(config: &BuildConfig, entry: &Path) -> PathBuf {
    let name = entry
        .parent()
        .filter(|dir| *dir != config.roots().cli)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| INDEX_STEM.to_string());
    config.cli_out_dir().join(format!("{name}.js"))
}

/// Options for bundling one CLI entry.
pub fn cli_options(config: &BuildConfig, entry: &Path) -> BundleOptions {
    let mut options = BundleOptions::new(
        vec![entry.to_path_buf()],
        OutputTarget::File(cli_output_path(config, entry)),
    );
    options.target = config.target().to_vec();
    options
}

/// Discovers and bundles every CLI entry point.
pub async fn run<B>(config: &BuildConfig, bundler: Arc<B>) -> Result<Vec<BundleOutcome>>
where
    B: Bundler + 'static,
{
    let entries =
        discovery::discover_indexes(&config.roots().cli, config.cli_extensions()).await?;
    if entries.is_empty() {
        log::info!(
            "No CLI entry points under {}",
            config.roots().cli.display()
        );
        return Ok(Vec::new());
    }
    discovery::verify_entries_exist(&entries)?;

    log::info!(
        "Bundling {} CLI entry point(s) with up to {} job(s)",
        entries.len(),
        config.jobs()
    );

    let permits = config.jobs().min(Semaphore::MAX_PERMITS);
    let semaphore = Arc::new(Semaphore::new(permits));
    let mut tasks = JoinSet::new();

    for entry in entries {
        let options = cli_options(config, &entry);
        let bundler = Arc::clone(&bundler);
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| BuildError::Generic(format!("bundle job limiter closed: {e}")))?;
            let outcome = bundler.build(&options).await?;
            log::info!("built {}", entry.display());
            Ok::<_, BuildError>(outcome)
        });
    }

    let mut outcomes = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined? {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                tasks.abort_all();
                return Err(e);
            }
        }
    }

    outcomes.sort_by(|a, b| a.entry_points.cmp(&b.entry_points));
    Ok(outcomes)
}
