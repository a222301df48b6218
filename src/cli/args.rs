//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap and turns the
//! arguments into a [`BuildConfig`].

use crate::config::{BuildConfig, ConfigFile};
use crate::error::{CliError, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Build orchestrator for ESM component libraries
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_esm",
    version,
    about = "Bundle CLI entries and component libraries with esbuild, then emit type declarations",
    long_about = "Builds a component library into lib/:

  1. Bundles every src/cli/*/index.{js,ts} into a standalone ESM file under lib/cli/
  2. Bundles components and utils (agnostic, browser, node) in one code-split pass
  3. Emits .d.ts files with tsc --emitDeclarationOnly
  4. Writes lib/index.js

Usage:
  kodegen_bundler_esm
  kodegen_bundler_esm --project-root ./packages/ui --jobs 4
  kodegen_bundler_esm --compiler-timeout 600 --tsc pnpm exec tsc

Settings may also come from kodegen-build.toml in the project root.
Exit code 0 = every step succeeded."
)]
pub struct Args {
    /// Project root; relative paths are resolved against it
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub project_root: PathBuf,

    /// Build config file (default: <project-root>/kodegen-build.toml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory shared by every bundle
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// esbuild executable to use instead of detecting one
    #[arg(long, value_name = "PATH", env = "ESBUILD_BINARY_PATH")]
    pub esbuild: Option<PathBuf>,

    /// Declaration compiler program and leading arguments, e.g. `--tsc pnpm exec tsc`
    #[arg(long, value_name = "COMMAND", num_args = 1..)]
    pub tsc: Option<Vec<String>>,

    /// Maximum concurrent CLI bundles (default: number of CPUs)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Kill a bundler invocation after this many seconds
    #[arg(long, value_name = "SECS")]
    pub bundle_timeout: Option<u64>,

    /// Kill the declaration compiler after this many seconds
    #[arg(long, value_name = "SECS")]
    pub compiler_timeout: Option<u64>,

    /// Do not emit type declarations
    #[arg(long)]
    pub skip_declarations: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.jobs == Some(0) {
            return Err("--jobs must be at least 1".to_string());
        }
        if let Some(tsc) = &self.tsc
            && tsc.first().is_none_or(|program| program.trim().is_empty())
        {
            return Err("--tsc cannot be empty".to_string());
        }
        Ok(())
    }

    /// Builds the configuration: defaults, then the config file, then these flags.
    pub fn to_config(&self) -> Result<BuildConfig> {
        self.validate()
            .map_err(|reason| CliError::InvalidArguments { reason })?;

        let file = ConfigFile::discover(&self.project_root, self.config.as_deref())?;
        let mut builder = BuildConfig::builder(&self.project_root)
            .config_file(file)
            .skip_declarations(self.skip_declarations);

        if let Some(out_dir) = &self.out_dir {
            builder = builder.out_dir(out_dir);
        }
        if let Some(esbuild) = &self.esbuild {
            builder = builder.esbuild_binary(esbuild);
        }
        if let Some(tsc) = &self.tsc {
            builder = builder.tsc_command(tsc.clone());
        }
        if let Some(jobs) = self.jobs {
            builder = builder.jobs(jobs);
        }
        if let Some(secs) = self.bundle_timeout {
            builder = builder.bundle_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.compiler_timeout {
            builder = builder.compiler_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }
}
