//! On-disk build configuration (`kodegen-build.toml`).
//!
//! Every key is optional; anything left out falls back to the builder defaults.
//!
//! ```toml
//! [paths]
//! source_root = "src"
//! cli = "src/cli"
//! out_dir = "lib"
//!
//! [bundle]
//! external = ["react", "react-dom"]
//! timeout_secs = 300
//!
//! [declarations]
//! command = ["pnpm", "exec", "tsc"]
//! tsconfig = "src/tsconfig.json"
//! ```

use crate::error::{BuildError, ErrorExt, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name looked up in the project root when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "kodegen-build.toml";

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub paths: PathsSection,
    pub bundle: BundleSection,
    pub esbuild: EsbuildSection,
    pub declarations: DeclarationsSection,
}

/// `[paths]`, relative to the project root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsSection {
    pub source_root: Option<PathBuf>,
    pub cli: Option<PathBuf>,
    pub components: Option<PathBuf>,
    pub utils_agnostic: Option<PathBuf>,
    pub utils_browser: Option<PathBuf>,
    pub utils_node: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub lib_index: Option<PathBuf>,
    pub cli_out_subdir: Option<String>,
}

/// `[bundle]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleSection {
    pub target: Option<Vec<String>>,
    pub external: Option<Vec<String>>,
    pub cli_extensions: Option<Vec<String>>,
    pub lib_extensions: Option<Vec<String>>,
    pub jobs: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// `[esbuild]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EsbuildSection {
    pub binary: Option<PathBuf>,
}

/// `[declarations]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeclarationsSection {
    pub enabled: Option<bool>,
    pub command: Option<Vec<String>>,
    pub jsx: Option<String>,
    pub tsconfig: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Parses configuration from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).fs_context("reading build config", path)?;
        Self::parse(&text).map_err(|e| {
            BuildError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Loads `path` if given, otherwise [`DEFAULT_CONFIG_FILE`] from `project_root`
    /// when it exists. An explicit path that does not exist is an error.
    pub fn discover(project_root: &Path, path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = project_root.join(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    log::debug!("Using build config {}", default.display());
                    Self::load(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
