//! Build orchestration for ESM component libraries
//!
//! This library drives a four-step build:
//! - CLI entry points bundled one by one with esbuild
//! - Components and utilities bundled together with code-splitting
//! - Type declarations emitted by tsc
//! - A placeholder package entry
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod config;
pub mod declarations;
pub mod discovery;
pub mod error;
pub mod exec;
pub mod pipeline;

// Re-export commonly used types
pub use config::BuildConfig;
pub use error::{BuildError, CliError, Result};
pub use pipeline::{BuildReport, Pipeline, Step, StepStatus};
