//! Build configuration.
//!
//! A [`BuildConfig`] is constructed once at startup by [`BuildConfigBuilder`]
//! from built-in defaults, an optional TOML file and command line overrides.
//! All paths it holds are absolute.

mod builder;
mod file;

pub use builder::BuildConfigBuilder;
pub use file::{
    BundleSection, ConfigFile, DEFAULT_CONFIG_FILE, DeclarationsSection, EsbuildSection,
    PathsSection,
};

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Placeholder written to the package root entry.
pub const PACKAGE_ENTRY_CONTENT: &str = "export default {}\n";

/// Source roots scanned for index files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoots {
    /// Common ancestor of every library root; library outputs mirror paths below it
    pub source_root: PathBuf,
    /// CLI entry points, bundled one by one
    pub cli: PathBuf,
    /// Shared components
    pub components: PathBuf,
    /// Environment-agnostic utilities
    pub utils_agnostic: PathBuf,
    /// Browser-only utilities
    pub utils_browser: PathBuf,
    /// Node-only utilities
    pub utils_node: PathBuf,
}

impl SourceRoots {
    /// Library roots in bundling order.
    pub fn library_roots(&self) -> Vec<PathBuf> {
        vec![
            self.components.clone(),
            self.utils_agnostic.clone(),
            self.utils_browser.clone(),
            self.utils_node.clone(),
        ]
    }
}

/// Settings for the type declaration step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationSettings {
    /// Run the step at all
    pub enabled: bool,
    /// Compiler command prefix, e.g. `["npx", "tsc"]`
    pub command: Vec<String>,
    /// Value passed to `--jsx`
    pub jsx: String,
    /// Project file passed to `-p`
    pub tsconfig: PathBuf,
    /// Time limit for the compiler
    pub timeout: Option<Duration>,
}

/// Complete, resolved configuration for one build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    project_root: PathBuf,
    roots: SourceRoots,
    out_dir: PathBuf,
    lib_index: PathBuf,
    cli_out_subdir: String,
    cli_extensions: Vec<String>,
    lib_extensions: Vec<String>,
    target: Vec<String>,
    external: Vec<String>,
    jobs: usize,
    bundle_timeout: Option<Duration>,
    esbuild_binary: Option<PathBuf>,
    declarations: DeclarationSettings,
}

impl BuildConfig {
    /// Starts a builder rooted at `project_root`.
    pub fn builder(project_root: impl AsRef<Path>) -> BuildConfigBuilder {
        BuildConfigBuilder::new(project_root)
    }

    /// Directory every relative path and every child process is anchored to.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn roots(&self) -> &SourceRoots {
        &self.roots
    }

    /// Shared output tree for both bundle steps.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Package root entry file.
    pub fn lib_index(&self) -> &Path {
        &self.lib_index
    }

    /// Directory under [`out_dir`](Self::out_dir) that receives CLI bundles.
    pub fn cli_out_dir(&self) -> PathBuf {
        self.out_dir.join(&self.cli_out_subdir)
    }

    pub fn cli_extensions(&self) -> &[String] {
        &self.cli_extensions
    }

    pub fn lib_extensions(&self) -> &[String] {
        &self.lib_extensions
    }

    /// esbuild `--target` values.
    pub fn target(&self) -> &[String] {
        &self.target
    }

    /// Packages left for the consumer's runtime to resolve.
    pub fn external(&self) -> &[String] {
        &self.external
    }

    /// Maximum number of concurrent CLI bundles.
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub fn bundle_timeout(&self) -> Option<Duration> {
        self.bundle_timeout
    }

    /// Explicit esbuild executable, bypassing detection.
    pub fn esbuild_binary(&self) -> Option<&Path> {
        self.esbuild_binary.as_deref()
    }

    pub fn declarations(&self) -> &DeclarationSettings {
        &self.declarations
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        project_root: PathBuf,
        roots: SourceRoots,
        out_dir: PathBuf,
        lib_index: PathBuf,
        cli_out_subdir: String,
        cli_extensions: Vec<String>,
        lib_extensions: Vec<String>,
        target: Vec<String>,
        external: Vec<String>,
        jobs: usize,
        bundle_timeout: Option<Duration>,
        esbuild_binary: Option<PathBuf>,
        declarations: DeclarationSettings,
    ) -> Self {
        Self {
            project_root,
            roots,
            out_dir,
            lib_index,
            cli_out_subdir,
            cli_extensions,
            lib_extensions,
            target,
            external,
            jobs,
            bundle_timeout,
            esbuild_binary,
            declarations,
        }
    }
}
