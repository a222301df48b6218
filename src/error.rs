//! Error types for build orchestration.
//!
//! Every step of the pipeline reports failures through [`BuildError`]. External
//! tool failures carry the command line that was run so the log line is enough
//! to reproduce the problem by hand.

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for build operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Main error type for all build operations
#[derive(Error, Debug)]
pub enum BuildError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Invalid or inconsistent build configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error with the action and path that produced it
    #[error("{context} ({}): {source}", .path.display())]
    FsContext {
        /// What was being attempted
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// An external command could not be spawned or waited on
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Command line
        command: String,
        /// Spawn or wait error
        #[source]
        error: std::io::Error,
    },

    /// An external command exited unsuccessfully
    #[error("`{command}` exited with {}: {stderr}", .code.map_or_else(|| "signal".to_string(), |c| format!("status {c}")))]
    CommandStatus {
        /// Command line
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Captured stderr, trimmed
        stderr: String,
    },

    /// An external command exceeded its time budget and was killed
    #[error("`{command}` timed out after {}s", .timeout.as_secs())]
    Timeout {
        /// Command line
        command: String,
        /// Configured limit
        timeout: Duration,
    },

    /// Bundle options rejected before invoking the bundler
    #[error("Invalid bundle options: {0}")]
    InvalidOptions(String),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A spawned bundling task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Generic errors
    #[error("{0}")]
    Generic(String),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

/// Attaches filesystem context to IO results.
pub trait ErrorExt<T> {
    /// Wraps an IO error with the action being performed and the path involved.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| BuildError::FsContext {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_keeps_path_and_action() {
        let err: Result<()> = Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))
            .fs_context("writing package entry", "/tmp/lib/index.js");
        let message = err.unwrap_err().to_string();
        assert!(message.contains("writing package entry"));
        assert!(message.contains("/tmp/lib/index.js"));
        assert!(message.contains("gone"));
    }

    #[test]
    fn command_status_reports_signal_without_code() {
        let err = BuildError::CommandStatus {
            command: "esbuild".into(),
            code: None,
            stderr: "killed".into(),
        };
        assert_eq!(err.to_string(), "`esbuild` exited with signal: killed");
    }
}
