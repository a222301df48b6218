//! External process execution with captured output.
//!
//! Both the bundler and the declaration compiler run as child processes. This
//! module spawns them, drains stdout and stderr concurrently, and enforces an
//! optional time limit.

use crate::error::{BuildError, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// Grace period for a killed child to be reaped.
const KILL_GRACE: Duration = Duration::from_secs(10);

/// Result of running an external command to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Rendered command line, for logs and errors
    pub command: String,
    /// Exit code, `None` when terminated by a signal
    pub status: Option<i32>,
    /// Whether the process exited successfully
    pub success: bool,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Converts an unsuccessful exit into [`BuildError::CommandStatus`].
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(BuildError::CommandStatus {
                command: self.command,
                code: self.status,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// A program plus its arguments, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path
    pub program: OsString,
    /// Arguments passed verbatim
    pub args: Vec<OsString>,
}

impl CommandSpec {
    /// Creates a spec for `program` with no arguments.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Human-readable command line.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs `spec` in `cwd`, capturing stdout and stderr.
///
/// Never fails on a non-zero exit; callers decide what an unsuccessful status
/// means via [`CommandOutput::into_result`]. Spawn errors and timeouts are
/// returned as errors. On timeout the child is killed before returning.
pub async fn run_captured(
    spec: &CommandSpec,
    cwd: &Path,
    timeout: Option<Duration>,
) -> Result<CommandOutput> {
    let command = spec.display();
    log::debug!("Running `{}` in {}", command, cwd.display());

    let mut child = Command::new(&spec.program)
        .args(&spec.args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|error| BuildError::CommandFailed {
            command: command.clone(),
            error,
        })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // Both pipes are drained before waiting so a chatty child cannot block on a full pipe
    let completion = async {
        let (stdout, stderr) = tokio::join!(read_stream(stdout), read_stream(stderr));
        let status = child.wait().await;
        (stdout, stderr, status)
    };

    let finished = match timeout {
        Some(limit) => tokio::time::timeout(limit, completion).await.ok(),
        None => Some(completion.await),
    };

    let Some((stdout, stderr, status)) = finished else {
        let limit = timeout.unwrap_or_default();
        log::warn!(
            "`{}` timed out after {}s, terminating...",
            command,
            limit.as_secs()
        );
        if let Err(e) = child.kill().await {
            log::warn!("Failed to kill `{}`: {}", command, e);
        }
        let _ = tokio::time::timeout(KILL_GRACE, child.wait()).await;
        return Err(BuildError::Timeout {
            command,
            timeout: limit,
        });
    };

    let status = status.map_err(|error| BuildError::CommandFailed {
        command: command.clone(),
        error,
    })?;

    Ok(CommandOutput {
        command,
        status: status.code(),
        success: status.success(),
        stdout,
        stderr,
    })
}

async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>) -> String {
    let mut buffer = Vec::new();
    if let Some(mut stream) = stream
        && let Err(e) = stream.read_to_end(&mut buffer).await
    {
        log::debug!("Stopped reading child output: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
