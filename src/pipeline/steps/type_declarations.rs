//! Type declaration step.

use crate::declarations::TypeCompiler;
use crate::error::Result;
use crate::exec::CommandOutput;

/// Runs the declaration compiler and relays its output.
///
/// Compiler stdout and stderr are logged verbatim when non-empty. Only a
/// failure to run the compiler at all is an error here; judge the exit
/// status with [`check`].
pub async fn run<C: TypeCompiler>(compiler: &C) -> Result<CommandOutput> {
    let output = compiler.emit_declarations().await.inspect_err(|e| {
        log::error!("Type declaration compiler could not run: {}", e);
    })?;

    if !output.stdout.is_empty() {
        log::info!("{}", output.stdout);
    }
    if !output.stderr.is_empty() {
        log::info!("{}", output.stderr);
    }
    Ok(output)
}

/// Turns an unsuccessful compiler exit into an error, logging it.
pub fn check(output: &CommandOutput) -> Result<()> {
    output.clone().into_result().map(drop).inspect_err(|e| {
        log::error!("Type declaration emit failed: {}", e);
    })
}
