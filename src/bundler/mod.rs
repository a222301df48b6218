//! Bundler seam and the esbuild driver.
//!
//! The pipeline talks to the bundler only through the [`Bundler`] trait, so
//! tests can substitute an in-process fake for the real esbuild process.

mod esbuild;
mod metafile;
mod options;
pub mod tool_detection;

pub use esbuild::Esbuild;
pub use metafile::{MetaOutput, Metafile};
pub use options::{BundleOptions, Format, OutputTarget, Platform};

use crate::error::Result;
use std::future::Future;
use std::path::PathBuf;

/// Result of one successful bundler invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleOutcome {
    /// Entry points that were bundled
    pub entry_points: Vec<PathBuf>,
    /// Files written, when known
    pub outputs: Vec<PathBuf>,
}

/// Something that turns entry points into bundled output on disk.
pub trait Bundler: Send + Sync {
    /// Runs one bundle invocation described by `options`.
    fn build(&self, options: &BundleOptions) -> impl Future<Output = Result<BundleOutcome>> + Send;
}
