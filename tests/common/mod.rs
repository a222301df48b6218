//! Shared fixtures and fakes for pipeline integration tests

#![allow(dead_code)]

use kodegen_bundler_esm::bundler::{BundleOptions, BundleOutcome, Bundler, OutputTarget};
use kodegen_bundler_esm::declarations::TypeCompiler;
use kodegen_bundler_esm::exec::CommandOutput;
use kodegen_bundler_esm::{BuildConfig, BuildError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const CLI_ENTRIES: &[&str] = &["src/cli/init/index.ts", "src/cli/serve/index.js"];

pub const LIBRARY_ENTRIES: &[&str] = &[
    "src/components/button/index.tsx",
    "src/components/card/index.jsx",
    "src/utils/agnostic/strings/index.ts",
    "src/utils/browser/dom/index.ts",
    "src/utils/node/fs/index.js",
];

/// Writes a source file, creating parent directories.
pub fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, "export default 1\n").unwrap();
}

/// Lays out two CLI entries and five library entries across the four library roots.
pub fn component_library(root: &Path) {
    for entry in CLI_ENTRIES.iter().chain(LIBRARY_ENTRIES) {
        touch(&root.join(entry));
    }
    // Not index files, or too deep: never entries
    touch(&root.join("src/components/button/Button.tsx"));
    touch(&root.join("src/components/button/parts/index.tsx"));
}

pub fn config(root: &Path) -> BuildConfig {
    BuildConfig::builder(root).jobs(4).build().unwrap()
}

/// How the fake bundler should treat one entry point.
#[derive(Clone, Default)]
pub struct EntryBehavior {
    pub delay: Duration,
    pub fail: bool,
}

/// In-process bundler that records every invocation and writes plausible outputs.
#[derive(Clone, Default)]
pub struct RecordingBundler {
    calls: Arc<Mutex<Vec<BundleOptions>>>,
    behaviors: Arc<Mutex<Vec<(String, EntryBehavior)>>>,
}

impl RecordingBundler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `behavior` to any invocation whose entries contain `needle`.
    pub fn on_entry(self, needle: &str, behavior: EntryBehavior) -> Self {
        self.behaviors
            .lock()
            .unwrap()
            .push((needle.to_string(), behavior));
        self
    }

    pub fn calls(&self) -> Vec<BundleOptions> {
        self.calls.lock().unwrap().clone()
    }

    fn behavior_for(&self, options: &BundleOptions) -> EntryBehavior {
        let behaviors = self.behaviors.lock().unwrap();
        behaviors
            .iter()
            .find(|(needle, _)| {
                options
                    .entry_points
                    .iter()
                    .any(|entry| entry.to_string_lossy().contains(needle.as_str()))
            })
            .map(|(_, behavior)| behavior.clone())
            .unwrap_or_default()
    }
}

impl Bundler for RecordingBundler {
    async fn build(&self, options: &BundleOptions) -> Result<BundleOutcome> {
        self.calls.lock().unwrap().push(options.clone());
        let behavior = self.behavior_for(options);

        tokio::time::sleep(behavior.delay).await;
        if behavior.fail {
            return Err(BuildError::CommandStatus {
                command: "esbuild".into(),
                code: Some(1),
                stderr: format!(
                    "Could not resolve \"missing-dep\" from {}",
                    options.entry_points[0].display()
                ),
            });
        }

        let outputs = write_outputs(options);
        Ok(BundleOutcome {
            entry_points: options.entry_points.clone(),
            outputs,
        })
    }
}

fn write_outputs(options: &BundleOptions) -> Vec<PathBuf> {
    let mut outputs = Vec::new();
    match &options.output {
        OutputTarget::File(file) => outputs.push(file.clone()),
        OutputTarget::Dir(dir) => {
            for entry in &options.entry_points {
                let relative = options
                    .outbase
                    .as_deref()
                    .and_then(|base| entry.strip_prefix(base).ok())
                    .unwrap_or(entry.as_path());
                outputs.push(dir.join(relative).with_extension("js"));
            }
            if options.splitting && options.entry_points.len() > 1 {
                outputs.push(dir.join("chunks/chunk-4F2KX7QA.js"));
            }
        }
    }
    for output in &outputs {
        touch(output);
    }
    outputs
}

/// Declaration compiler stand-in.
#[derive(Clone)]
pub struct FakeCompiler {
    output: CommandOutput,
    declarations: Vec<PathBuf>,
    runs: Arc<Mutex<usize>>,
}

impl FakeCompiler {
    pub fn succeeding() -> Self {
        Self::with_status(true, Some(0), "")
    }

    pub fn failing(stderr: &str) -> Self {
        Self::with_status(false, Some(2), stderr)
    }

    fn with_status(success: bool, status: Option<i32>, stderr: &str) -> Self {
        Self {
            output: CommandOutput {
                command: "npx tsc --emitDeclarationOnly".into(),
                status,
                success,
                stdout: String::new(),
                stderr: stderr.into(),
            },
            declarations: Vec::new(),
            runs: Arc::new(Mutex::new(0)),
        }
    }

    /// Declaration files to write when run.
    pub fn emitting(mut self, files: Vec<PathBuf>) -> Self {
        self.declarations = files;
        self
    }

    pub fn runs(&self) -> usize {
        *self.runs.lock().unwrap()
    }
}

impl TypeCompiler for FakeCompiler {
    async fn emit_declarations(&self) -> Result<CommandOutput> {
        *self.runs.lock().unwrap() += 1;
        for file in &self.declarations {
            touch(file);
        }
        Ok(self.output.clone())
    }
}
