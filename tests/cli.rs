//! Binary tests driving stub esbuild/tsc executables

#![cfg(unix)]

mod common;

use assert_cmd::Command;
use common::component_library;
use predicates::prelude::*;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const ESBUILD_STUB: &str = r#"#!/bin/sh
echo "$@" >> "@LOG@"
for arg in "$@"; do
  case "$arg" in
    --outfile=*) f="${arg#--outfile=}"; mkdir -p "$(dirname "$f")"; echo 'export{}' > "$f" ;;
    --outdir=*) d="${arg#--outdir=}"; mkdir -p "$d/chunks"; echo 'export{}' > "$d/chunks/chunk-TEST.js" ;;
    --metafile=*) m="${arg#--metafile=}"; echo '{"outputs":{"lib/chunks/chunk-TEST.js":{"bytes":9}}}' > "$m" ;;
  esac
done
"#;

const TSC_STUB: &str = r#"#!/bin/sh
echo "$@" > "@LOG@"
mkdir -p lib/components/button
echo 'export {}' > lib/components/button/index.d.ts
echo "declarations emitted"
"#;

const LIBRARY_FAILING_STUB: &str = r#"#!/bin/sh
echo "$@" >> "@LOG@"
for arg in "$@"; do
  case "$arg" in
    --splitting) echo 'Could not resolve "missing-dep"' >&2; exit 1 ;;
    --outfile=*) f="${arg#--outfile=}"; mkdir -p "$(dirname "$f")"; echo 'export{}' > "$f" ;;
  esac
done
"#;

const FAILING_STUB: &str = r#"#!/bin/sh
echo "error TS2304: Cannot find name 'JSX'" >&2
exit 2
"#;

fn write_script(dir: &Path, name: &str, body: &str, log: &Path) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body.replace("@LOG@", &log.display().to_string())).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

struct Fixture {
    _tools: tempfile::TempDir,
    project: tempfile::TempDir,
    esbuild: PathBuf,
    tsc: PathBuf,
    esbuild_log: PathBuf,
    tsc_log: PathBuf,
}

impl Fixture {
    fn new(esbuild_body: &str, tsc_body: &str) -> Self {
        let tools = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        component_library(project.path());

        let esbuild_log = tools.path().join("esbuild.log");
        let tsc_log = tools.path().join("tsc.log");
        let esbuild = write_script(tools.path(), "esbuild", esbuild_body, &esbuild_log);
        let tsc = write_script(tools.path(), "tsc", tsc_body, &tsc_log);

        Self {
            _tools: tools,
            project,
            esbuild,
            tsc,
            esbuild_log,
            tsc_log,
        }
    }

    fn root(&self) -> &Path {
        self.project.path()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("kodegen_bundler_esm").unwrap();
        cmd.env_remove("ESBUILD_BINARY_PATH")
            .env("RUST_LOG", "info")
            .arg("--project-root")
            .arg(self.root())
            .arg("--esbuild")
            .arg(&self.esbuild)
            .arg("--tsc")
            .arg(&self.tsc);
        cmd
    }
}

#[test]
fn help_describes_the_pipeline() {
    Command::cargo_bin("kodegen_bundler_esm")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("esbuild"));
}

#[test]
fn full_build_succeeds() {
    let fixture = Fixture::new(ESBUILD_STUB, TSC_STUB);

    fixture
        .command()
        .assert()
        .success()
        .stderr(predicate::str::contains("declarations emitted"));

    let root = fixture.root();
    assert!(root.join("lib/cli/init.js").is_file());
    assert!(root.join("lib/cli/serve.js").is_file());
    assert!(root.join("lib/chunks/chunk-TEST.js").is_file());
    assert!(root.join("lib/components/button/index.d.ts").is_file());
    assert_eq!(
        std::fs::read_to_string(root.join("lib/index.js")).unwrap(),
        "export default {}\n"
    );

    let esbuild_calls = std::fs::read_to_string(&fixture.esbuild_log).unwrap();
    let lines: Vec<&str> = esbuild_calls.lines().collect();
    assert_eq!(lines.len(), 3);
    let library = lines.iter().find(|l| l.contains("--splitting")).unwrap();
    assert!(library.contains("--external:react"));
    assert!(library.contains("--external:react-dom"));
    assert!(library.contains("--chunk-names=chunks/[name]-[hash]"));
    assert!(library.contains("components/button/index.tsx"));
    assert!(library.contains("utils/node/fs/index.js"));

    let tsc_args = std::fs::read_to_string(&fixture.tsc_log).unwrap();
    assert!(tsc_args.contains("--jsx react-jsx -p"));
    assert!(tsc_args.contains("src/tsconfig.json"));
    assert!(tsc_args.trim_end().ends_with("--emitDeclarationOnly"));
}

#[test]
fn bundler_failure_exits_nonzero_without_entry_file() {
    let fixture = Fixture::new(FAILING_STUB, TSC_STUB);

    fixture
        .command()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cli bundle failed"));

    assert!(!fixture.root().join("lib/index.js").exists());
    assert!(!fixture.tsc_log.exists());
}

#[test]
fn library_failure_is_logged_and_stops_the_build() {
    let fixture = Fixture::new(LIBRARY_FAILING_STUB, TSC_STUB);

    fixture
        .command()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Library bundle failed"))
        .stderr(predicate::str::contains("missing-dep"));

    let root = fixture.root();
    assert!(root.join("lib/cli/init.js").is_file());
    assert!(!root.join("lib/index.js").exists());
    assert!(!fixture.tsc_log.exists());
}

#[test]
fn compiler_failure_still_writes_entry_but_exits_nonzero() {
    let fixture = Fixture::new(ESBUILD_STUB, FAILING_STUB);

    fixture
        .command()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("TS2304"));

    assert_eq!(
        std::fs::read_to_string(fixture.root().join("lib/index.js")).unwrap(),
        "export default {}\n"
    );
}

#[test]
fn skip_declarations_never_runs_compiler() {
    let fixture = Fixture::new(ESBUILD_STUB, TSC_STUB);

    fixture.command().arg("--skip-declarations").assert().success();

    assert!(!fixture.tsc_log.exists());
    assert!(fixture.root().join("lib/index.js").is_file());
}

#[test]
fn invalid_jobs_is_rejected() {
    let fixture = Fixture::new(ESBUILD_STUB, TSC_STUB);

    fixture
        .command()
        .args(["--jobs", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--jobs must be at least 1"));

    assert!(!fixture.esbuild_log.exists());
}
