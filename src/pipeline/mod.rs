//! Build pipeline orchestration.
//!
//! The [`Pipeline`] runs the steps strictly in order:
//!
//! 1. CLI bundle: one standalone bundle per CLI entry, built concurrently
//! 2. Library bundle: one code-split bundle over every library root
//! 3. Type declarations: `tsc --emitDeclarationOnly`
//! 4. Package entry: the placeholder root module
//!
//! Steps never terminate the process. Each one reports a [`StepOutcome`] and
//! the caller turns the resulting [`BuildReport`] into an exit status.
//!
//! A bundling failure stops the pipeline and every later step is recorded as
//! skipped. A declaration failure is recorded and the pipeline carries on, but
//! the report still counts it as a failure.

pub mod steps;

use crate::bundler::{BundleOutcome, Bundler, Esbuild};
use crate::config::BuildConfig;
use crate::declarations::{Tsc, TypeCompiler};
use crate::error::Result;
use crate::exec::CommandOutput;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Pipeline steps in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    CliBundle,
    LibraryBundle,
    TypeDeclarations,
    PackageEntry,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::CliBundle,
        Step::LibraryBundle,
        Step::TypeDeclarations,
        Step::PackageEntry,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::CliBundle => "cli bundle",
            Self::LibraryBundle => "library bundle",
            Self::TypeDeclarations => "type declarations",
            Self::PackageEntry => "package entry",
        }
    }

    /// Whether a failure in this step stops the pipeline.
    pub fn is_fatal(self) -> bool {
        !matches!(self, Self::TypeDeclarations)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Succeeded,
    /// Failed with the rendered error
    Failed(String),
    /// Not run, either disabled or after an earlier fatal failure
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: Step,
    pub status: StepStatus,
    pub elapsed: Duration,
}

/// Everything a pipeline run produced.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub steps: Vec<StepOutcome>,
    pub cli_bundles: Vec<BundleOutcome>,
    pub library_bundle: Option<BundleOutcome>,
    pub declarations: Option<CommandOutput>,
}

impl BuildReport {
    pub fn status(&self, step: Step) -> Option<&StepStatus> {
        self.steps
            .iter()
            .find(|outcome| outcome.step == step)
            .map(|outcome| &outcome.status)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps
            .iter()
            .filter(|outcome| matches!(outcome.status, StepStatus::Failed(_)))
    }

    pub fn succeeded(&self) -> bool {
        self.failures().next().is_none()
    }

    /// 0 when every executed step succeeded, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.succeeded() { 0 } else { 1 }
    }

    fn record(&mut self, step: Step, status: StepStatus, elapsed: Duration) {
        match &status {
            StepStatus::Succeeded => {
                log::info!("✓ {} ({:.1}s)", step, elapsed.as_secs_f64())
            }
            StepStatus::Failed(reason) => log::error!("✗ {} failed: {}", step, reason),
            StepStatus::Skipped => log::info!("- {} skipped", step),
        }
        self.steps.push(StepOutcome {
            step,
            status,
            elapsed,
        });
    }
}

/// Sequential build driver.
pub struct Pipeline<B, C> {
    config: BuildConfig,
    bundler: Arc<B>,
    compiler: C,
}

impl Pipeline<Esbuild, Tsc> {
    /// Pipeline driving the real esbuild and tsc for `config`.
    pub fn from_config(config: BuildConfig) -> Self {
        let bundler = Esbuild::from_config(&config);
        let compiler = Tsc::from_config(&config);
        Self::new(config, bundler, compiler)
    }
}

impl<B, C> Pipeline<B, C>
where
    B: Bundler + 'static,
    C: TypeCompiler,
{
    pub fn new(config: BuildConfig, bundler: B, compiler: C) -> Self {
        Self {
            config,
            bundler: Arc::new(bundler),
            compiler,
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Runs every step and reports what happened.
    pub async fn run(&self) -> BuildReport {
        let mut report = BuildReport::default();

        for step in Step::ALL {
            let aborted = report
                .failures()
                .any(|outcome| outcome.step.is_fatal());
            if aborted
                || (step == Step::TypeDeclarations && !self.config.declarations().enabled)
            {
                report.record(step, StepStatus::Skipped, Duration::ZERO);
                continue;
            }

            log::info!("Running {}", step);
            let started = Instant::now();
            let result = self.run_step(step, &mut report).await;
            let status = match result {
                Ok(()) => StepStatus::Succeeded,
                Err(e) => StepStatus::Failed(e.to_string()),
            };
            report.record(step, status, started.elapsed());
        }

        report
    }

    async fn run_step(&self, step: Step, report: &mut BuildReport) -> Result<()> {
        match step {
            Step::CliBundle => {
                report.cli_bundles =
                    steps::cli_bundle::run(&self.config, Arc::clone(&self.bundler)).await?;
            }
            Step::LibraryBundle => {
                report.library_bundle =
                    steps::library_bundle::run(&self.config, self.bundler.as_ref()).await?;
            }
            Step::TypeDeclarations => {
                let output = steps::type_declarations::run(&self.compiler).await?;
                let checked = steps::type_declarations::check(&output);
                report.declarations = Some(output);
                checked?;
            }
            Step::PackageEntry => steps::package_entry::run(&self.config).await?,
        }
        Ok(())
    }
}
