//! esbuild executable detection.
//!
//! Resolution order: an explicitly configured binary, the project's
//! `node_modules/.bin/esbuild`, an `esbuild` on `PATH`, and finally
//! `npx esbuild`, which lets npm fetch it on demand.

use crate::exec::CommandSpec;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// esbuild found on `PATH` that answers `--version`.
///
/// Cached result to avoid repeated subprocess calls.
pub static ESBUILD_ON_PATH: LazyLock<Option<PathBuf>> =
    LazyLock::new(|| match which::which("esbuild") {
        Ok(path) => {
            log::debug!("Found esbuild at: {}", path.display());

            match std::process::Command::new(&path).arg("--version").output() {
                Ok(output) if output.status.success() => {
                    let version = String::from_utf8_lossy(&output.stdout);
                    log::info!("✓ esbuild available: {}", version.trim());
                    Some(path)
                }
                Ok(output) => {
                    log::warn!(
                        "esbuild found at {} but --version check failed (exit code: {:?}). \
                         Stderr: {}",
                        path.display(),
                        output.status.code(),
                        String::from_utf8_lossy(&output.stderr)
                    );
                    None
                }
                Err(e) => {
                    log::warn!(
                        "esbuild found at {} but failed to execute: {}. \
                         Check file permissions.",
                        path.display(),
                        e
                    );
                    None
                }
            }
        }
        Err(e) => {
            log::debug!("esbuild not found in PATH: {}", e);
            None
        }
    });

/// Local install path for a node package binary.
pub fn local_bin(project_root: &Path, name: &str) -> PathBuf {
    let bin = project_root.join("node_modules").join(".bin");
    if cfg!(windows) {
        bin.join(format!("{name}.cmd"))
    } else {
        bin.join(name)
    }
}

/// Picks the command used to invoke esbuild.
pub fn resolve_esbuild(project_root: &Path, explicit: Option<&Path>) -> CommandSpec {
    if let Some(binary) = explicit {
        log::debug!("Using configured esbuild: {}", binary.display());
        return CommandSpec::new(binary);
    }

    let local = local_bin(project_root, "esbuild");
    if local.is_file() {
        log::debug!("Using project esbuild: {}", local.display());
        return CommandSpec::new(local);
    }

    if let Some(path) = ESBUILD_ON_PATH.as_ref() {
        return CommandSpec::new(path);
    }

    log::debug!("No esbuild install found, falling back to npx");
    CommandSpec::new("npx").arg("esbuild")
}
