//! esbuild process driver.

use super::{BundleOptions, BundleOutcome, Bundler, Metafile, OutputTarget, tool_detection};
use crate::config::BuildConfig;
use crate::error::{ErrorExt, Result};
use crate::exec::{self, CommandSpec};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runs esbuild as a child process.
#[derive(Debug, Clone)]
pub struct Esbuild {
    command: CommandSpec,
    cwd: PathBuf,
    timeout: Option<Duration>,
}

impl Esbuild {
    /// Creates a driver invoking `command` from `cwd`.
    pub fn new(command: CommandSpec, cwd: impl Into<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            command,
            cwd: cwd.into(),
            timeout,
        }
    }

    /// Detects the esbuild executable for the configured project.
    pub fn from_config(config: &BuildConfig) -> Self {
        let command =
            tool_detection::resolve_esbuild(config.project_root(), config.esbuild_binary());
        Self::new(command, config.project_root(), config.bundle_timeout())
    }

    pub fn command(&self) -> &CommandSpec {
        &self.command
    }

    async fn invoke(&self, options: &BundleOptions) -> Result<BundleOutcome> {
        let spec = self
            .command
            .clone()
            .args(options.to_args())
            .arg("--log-level=warning");
        let output = exec::run_captured(&spec, &self.cwd, self.timeout)
            .await?
            .into_result()?;

        // esbuild reports warnings on stderr even when the build succeeds
        let warnings = output.stderr.trim();
        if !warnings.is_empty() {
            log::warn!("{}", warnings);
        }

        let outputs = self.collect_outputs(options).await?;
        Ok(BundleOutcome {
            entry_points: options.entry_points.clone(),
            outputs,
        })
    }

    async fn collect_outputs(&self, options: &BundleOptions) -> Result<Vec<PathBuf>> {
        if let Some(metafile) = &options.metafile {
            let meta = Metafile::read(metafile).await?;
            log::debug!(
                "esbuild wrote {} file(s), {} bytes",
                meta.outputs.len(),
                meta.total_bytes()
            );
            return Ok(meta.output_paths(&self.cwd));
        }

        Ok(match &options.output {
            OutputTarget::File(file) => vec![file.clone()],
            OutputTarget::Dir(_) => Vec::new(),
        })
    }
}

impl Bundler for Esbuild {
    async fn build(&self, options: &BundleOptions) -> Result<BundleOutcome> {
        options.validate()?;

        if let Some(parent) = options.metafile.as_deref().and_then(Path::parent) {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating metafile directory", parent)?;
        }

        let result = self.invoke(options).await;
        if let Some(metafile) = &options.metafile {
            remove_quietly(metafile).await;
        }
        result
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        log::debug!("Could not remove {}: {}", path.display(), e);
    }
}
