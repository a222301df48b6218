//! Options for a single bundler invocation.

use crate::error::{BuildError, Result};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Runtime the bundle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    /// Server-side runtime
    #[default]
    Node,
    Browser,
    Neutral,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Browser => "browser",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Module format of the emitted files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// ECMAScript modules
    #[default]
    Esm,
    Cjs,
    Iife,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Esm => "esm",
            Self::Cjs => "cjs",
            Self::Iife => "iife",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the bundler writes its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Output root; file names follow the naming templates
    Dir(PathBuf),
    /// Exact output file, single entry point only
    File(PathBuf),
}

/// Configuration record for one bundler invocation.
///
/// Mirrors the subset of esbuild's build options this tool drives. Use
/// [`to_args`](Self::to_args) to render it as an esbuild command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOptions {
    /// Source files that each root a bundle graph
    pub entry_points: Vec<PathBuf>,
    pub output: OutputTarget,
    /// Directory that `[dir]` in `entry_names` is relative to
    pub outbase: Option<PathBuf>,
    /// Inline dependencies
    pub bundle: bool,
    pub minify: bool,
    /// Extract code shared between entry points into chunks
    pub splitting: bool,
    pub platform: Platform,
    pub format: Format,
    /// Language-level ceiling, e.g. `esnext`
    pub target: Vec<String>,
    pub sourcemap: bool,
    /// Packages excluded from inlining
    pub external: Vec<String>,
    pub entry_names: Option<String>,
    pub chunk_names: Option<String>,
    pub asset_names: Option<String>,
    /// Where esbuild should write its build metadata JSON
    pub metafile: Option<PathBuf>,
}

impl BundleOptions {
    /// Bundled, minified ESM for node with no splitting and no source maps.
    pub fn new(entry_points: Vec<PathBuf>, output: OutputTarget) -> Self {
        Self {
            entry_points,
            output,
            outbase: None,
            bundle: true,
            minify: true,
            splitting: false,
            platform: Platform::Node,
            format: Format::Esm,
            target: vec!["esnext".to_string()],
            sourcemap: false,
            external: Vec::new(),
            entry_names: None,
            chunk_names: None,
            asset_names: None,
            metafile: None,
        }
    }

    /// Output directory, when writing to one.
    pub fn outdir(&self) -> Option<&Path> {
        match &self.output {
            OutputTarget::Dir(dir) => Some(dir),
            OutputTarget::File(_) => None,
        }
    }

    /// Rejects combinations esbuild would refuse.
    pub fn validate(&self) -> Result<()> {
        if self.entry_points.is_empty() {
            return Err(BuildError::InvalidOptions(
                "at least one entry point is required".to_string(),
            ));
        }
        if let OutputTarget::File(file) = &self.output
            && self.entry_points.len() > 1
        {
            return Err(BuildError::InvalidOptions(format!(
                "outfile {} cannot receive {} entry points",
                file.display(),
                self.entry_points.len()
            )));
        }
        if self.splitting {
            if self.format != Format::Esm {
                return Err(BuildError::InvalidOptions(format!(
                    "code splitting requires esm format, got {}",
                    self.format
                )));
            }
            if self.outdir().is_none() {
                return Err(BuildError::InvalidOptions(
                    "code splitting requires an output directory".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Renders the options as esbuild command line arguments.
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self
            .entry_points
            .iter()
            .map(|p| p.as_os_str().to_os_string())
            .collect();

        if self.bundle {
            args.push("--bundle".into());
        }
        if self.minify {
            args.push("--minify".into());
        }
        if self.splitting {
            args.push("--splitting".into());
        }
        args.push(format!("--platform={}", self.platform).into());
        args.push(format!("--format={}", self.format).into());
        if !self.target.is_empty() {
            args.push(format!("--target={}", self.target.join(",")).into());
        }
        if self.sourcemap {
            args.push("--sourcemap".into());
        }

        match &self.output {
            OutputTarget::Dir(dir) => args.push(path_flag("--outdir=", dir)),
            OutputTarget::File(file) => args.push(path_flag("--outfile=", file)),
        }
        if let Some(outbase) = &self.outbase {
            args.push(path_flag("--outbase=", outbase));
        }
        if let Some(names) = &self.entry_names {
            args.push(format!("--entry-names={names}").into());
        }
        if let Some(names) = &self.chunk_names {
            args.push(format!("--chunk-names={names}").into());
        }
        if let Some(names) = &self.asset_names {
            args.push(format!("--asset-names={names}").into());
        }
        for package in &self.external {
            args.push(format!("--external:{package}").into());
        }
        if let Some(metafile) = &self.metafile {
            args.push(path_flag("--metafile=", metafile));
        }

        args
    }
}

fn path_flag(flag: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push(path.as_os_str());
    arg
}
