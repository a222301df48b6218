//! Command line interface for the esm bundler.

mod args;

pub use args::Args;

use crate::error::Result;
use crate::pipeline::{BuildReport, Pipeline};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    run_with(Args::parse_args()).await
}

/// Runs a build for already-parsed arguments.
pub async fn run_with(args: Args) -> Result<i32> {
    let config = args.to_config()?;
    log::info!(
        "Building {} into {}",
        config.project_root().display(),
        config.out_dir().display()
    );

    let report = Pipeline::from_config(config).run().await;
    summarize(&report);
    Ok(report.exit_code())
}

fn summarize(report: &BuildReport) {
    if report.succeeded() {
        log::info!(
            "✓ Build finished: {} CLI bundle(s), {} library output(s)",
            report.cli_bundles.len(),
            report
                .library_bundle
                .as_ref()
                .map_or(0, |bundle| bundle.outputs.len())
        );
    } else {
        for failure in report.failures() {
            log::error!("{} failed", failure.step);
        }
    }
}
