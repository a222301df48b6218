//! Builder for constructing BuildConfig.

use super::{BuildConfig, ConfigFile, DeclarationSettings, SourceRoots};
use crate::error::{BuildError, ErrorExt, Result};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_SOURCE_ROOT: &str = "src";
const DEFAULT_CLI: &str = "src/cli";
const DEFAULT_COMPONENTS: &str = "src/components";
const DEFAULT_UTILS_AGNOSTIC: &str = "src/utils/agnostic";
const DEFAULT_UTILS_BROWSER: &str = "src/utils/browser";
const DEFAULT_UTILS_NODE: &str = "src/utils/node";
const DEFAULT_OUT_DIR: &str = "lib";
const DEFAULT_LIB_INDEX: &str = "index.js";
const DEFAULT_CLI_OUT_SUBDIR: &str = "cli";
const DEFAULT_TSCONFIG: &str = "src/tsconfig.json";
const DEFAULT_JSX: &str = "react-jsx";

const CLI_EXTENSIONS: &[&str] = &[".js", ".ts"];
const LIB_EXTENSIONS: &[&str] = &[".js", ".jsx", ".ts", ".tsx"];
const DEFAULT_TARGET: &[&str] = &["esnext"];
const DEFAULT_EXTERNAL: &[&str] = &["react", "react-dom"];
const DEFAULT_TSC_COMMAND: &[&str] = &["npx", "tsc"];

/// Builder for constructing [`BuildConfig`].
///
/// Layers are applied in call order: start from defaults, merge a
/// [`ConfigFile`], then apply command line overrides.
///
/// ```no_run
/// use kodegen_bundler_esm::config::{BuildConfig, ConfigFile};
///
/// # fn example() -> kodegen_bundler_esm::Result<()> {
/// let file = ConfigFile::discover(std::path::Path::new("."), None)?;
/// let config = BuildConfig::builder(".")
///     .config_file(file)
///     .jobs(4)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BuildConfigBuilder {
    project_root: PathBuf,
    file: ConfigFile,
    out_dir: Option<PathBuf>,
    esbuild_binary: Option<PathBuf>,
    tsc_command: Option<Vec<String>>,
    jobs: Option<usize>,
    bundle_timeout: Option<Duration>,
    compiler_timeout: Option<Duration>,
    skip_declarations: bool,
}

impl BuildConfigBuilder {
    /// Creates a builder with every setting at its default.
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
            file: ConfigFile::default(),
            out_dir: None,
            esbuild_binary: None,
            tsc_command: None,
            jobs: None,
            bundle_timeout: None,
            compiler_timeout: None,
            skip_declarations: false,
        }
    }

    /// Merges a parsed configuration file.
    pub fn config_file(mut self, file: ConfigFile) -> Self {
        self.file = file;
        self
    }

    /// Overrides the output directory.
    pub fn out_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.out_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Uses this esbuild executable instead of detecting one.
    pub fn esbuild_binary<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.esbuild_binary = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replaces the declaration compiler command prefix.
    pub fn tsc_command(mut self, command: Vec<String>) -> Self {
        self.tsc_command = Some(command);
        self
    }

    /// Limits concurrent CLI bundles.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn bundle_timeout(mut self, timeout: Duration) -> Self {
        self.bundle_timeout = Some(timeout);
        self
    }

    pub fn compiler_timeout(mut self, timeout: Duration) -> Self {
        self.compiler_timeout = Some(timeout);
        self
    }

    /// Disables the type declaration step.
    pub fn skip_declarations(mut self, skip: bool) -> Self {
        self.skip_declarations = skip;
        self
    }

    /// Resolves every path against the project root and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Config`] for a zero job count, a timeout under one
    /// second, an empty compiler command, or an extension without its leading dot.
    pub fn build(self) -> Result<BuildConfig> {
        let project_root = self
            .project_root
            .absolutize()
            .fs_context("resolving project root", &self.project_root)?
            .into_owned();

        let paths = self.file.paths;
        let bundle = self.file.bundle;
        let declarations = self.file.declarations;

        let resolve = |value: Option<PathBuf>, default: &str| -> Result<PathBuf> {
            let relative = value.unwrap_or_else(|| PathBuf::from(default));
            let joined = project_root.join(&relative);
            Ok(joined
                .absolutize()
                .fs_context("resolving configured path", &relative)?
                .into_owned())
        };

        let roots = SourceRoots {
            source_root: resolve(paths.source_root, DEFAULT_SOURCE_ROOT)?,
            cli: resolve(paths.cli, DEFAULT_CLI)?,
            components: resolve(paths.components, DEFAULT_COMPONENTS)?,
            utils_agnostic: resolve(paths.utils_agnostic, DEFAULT_UTILS_AGNOSTIC)?,
            utils_browser: resolve(paths.utils_browser, DEFAULT_UTILS_BROWSER)?,
            utils_node: resolve(paths.utils_node, DEFAULT_UTILS_NODE)?,
        };

        let out_dir = resolve(self.out_dir.or(paths.out_dir), DEFAULT_OUT_DIR)?;
        let lib_index = match paths.lib_index {
            Some(index) => resolve(Some(index), DEFAULT_LIB_INDEX)?,
            None => out_dir.join(DEFAULT_LIB_INDEX),
        };

        let cli_extensions = bundle.cli_extensions.unwrap_or_else(|| owned(CLI_EXTENSIONS));
        let lib_extensions = bundle.lib_extensions.unwrap_or_else(|| owned(LIB_EXTENSIONS));
        for ext in cli_extensions.iter().chain(lib_extensions.iter()) {
            if !ext.starts_with('.') || ext.len() < 2 {
                return Err(BuildError::Config(format!(
                    "extension `{ext}` must start with a dot, e.g. `.ts`"
                )));
            }
        }

        let jobs = self.jobs.or(bundle.jobs).unwrap_or_else(num_cpus::get);
        if jobs == 0 {
            return Err(BuildError::Config("jobs must be at least 1".to_string()));
        }

        let bundle_timeout = checked_timeout(
            "bundle",
            self.bundle_timeout
                .or(bundle.timeout_secs.map(Duration::from_secs)),
        )?;
        let compiler_timeout = checked_timeout(
            "compiler",
            self.compiler_timeout
                .or(declarations.timeout_secs.map(Duration::from_secs)),
        )?;

        let command = self
            .tsc_command
            .or(declarations.command)
            .unwrap_or_else(|| owned(DEFAULT_TSC_COMMAND));
        if command.is_empty() {
            return Err(BuildError::Config(
                "declaration compiler command is empty".to_string(),
            ));
        }

        let declarations = DeclarationSettings {
            enabled: !self.skip_declarations && declarations.enabled.unwrap_or(true),
            command,
            jsx: declarations.jsx.unwrap_or_else(|| DEFAULT_JSX.to_string()),
            tsconfig: resolve(declarations.tsconfig, DEFAULT_TSCONFIG)?,
            timeout: compiler_timeout,
        };

        let esbuild_binary = match self.esbuild_binary.or(self.file.esbuild.binary) {
            Some(binary) => Some(resolve(Some(binary), "")?),
            None => None,
        };

        Ok(BuildConfig::new(
            project_root.clone(),
            roots,
            out_dir,
            lib_index,
            paths
                .cli_out_subdir
                .unwrap_or_else(|| DEFAULT_CLI_OUT_SUBDIR.to_string()),
            cli_extensions,
            lib_extensions,
            bundle.target.unwrap_or_else(|| owned(DEFAULT_TARGET)),
            bundle.external.unwrap_or_else(|| owned(DEFAULT_EXTERNAL)),
            jobs,
            bundle_timeout,
            esbuild_binary,
            declarations,
        ))
    }
}

fn checked_timeout(name: &str, timeout: Option<Duration>) -> Result<Option<Duration>> {
    match timeout {
        Some(limit) if limit < Duration::from_secs(1) => Err(BuildError::Config(format!(
            "{name} timeout must be at least one second"
        ))),
        _ => Ok(timeout),
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
