//! TypeScript declaration emission.
//!
//! The compiler is run once for the whole project in declaration-only mode;
//! the project file decides which sources are covered and where the `.d.ts`
//! files land.

use crate::config::BuildConfig;
use crate::error::Result;
use crate::exec::{self, CommandOutput, CommandSpec};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

/// Something that emits type declaration files for the project.
pub trait TypeCompiler: Send + Sync {
    /// Runs the compiler to completion.
    ///
    /// An unsuccessful exit is reported in the returned [`CommandOutput`], not
    /// as an error. Errors are reserved for failing to run the compiler at all.
    fn emit_declarations(&self) -> impl Future<Output = Result<CommandOutput>> + Send;
}

/// `tsc --emitDeclarationOnly`, usually via `npx`.
#[derive(Debug, Clone)]
pub struct Tsc {
    command: Vec<String>,
    jsx: String,
    tsconfig: PathBuf,
    cwd: PathBuf,
    timeout: Option<Duration>,
}

impl Tsc {
    pub fn from_config(config: &BuildConfig) -> Self {
        let settings = config.declarations();
        Self {
            command: settings.command.clone(),
            jsx: settings.jsx.clone(),
            tsconfig: settings.tsconfig.clone(),
            cwd: config.project_root().to_path_buf(),
            timeout: settings.timeout,
        }
    }

    /// Full command line: the configured prefix, then the declaration flags.
    pub fn spec(&self) -> CommandSpec {
        let (program, prefix_args) = match self.command.split_first() {
            Some((program, rest)) => (program.as_str(), rest),
            None => ("tsc", &[][..]),
        };
        CommandSpec::new(program)
            .args(prefix_args.iter().map(String::as_str))
            .args(["--jsx", self.jsx.as_str(), "-p"])
            .arg(&self.tsconfig)
            .arg("--emitDeclarationOnly")
    }
}

impl TypeCompiler for Tsc {
    async fn emit_declarations(&self) -> Result<CommandOutput> {
        exec::run_captured(&self.spec(), &self.cwd, self.timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_command_line() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuildConfig::builder(dir.path()).jobs(1).build().unwrap();
        let tsc = Tsc::from_config(&config);
        assert_eq!(
            tsc.spec().display(),
            format!(
                "npx tsc --jsx react-jsx -p {} --emitDeclarationOnly",
                dir.path().join("src/tsconfig.json").display()
            )
        );
    }

    #[test]
    fn custom_prefix_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuildConfig::builder(dir.path())
            .tsc_command(vec!["pnpm".into(), "exec".into(), "tsc".into()])
            .build()
            .unwrap();
        let spec = Tsc::from_config(&config).spec();
        assert_eq!(spec.program, "pnpm");
        assert_eq!(spec.args[..2], ["exec", "tsc"]);
    }
}
