//! Kodegen Bundler ESM - build orchestration for ESM component libraries.
//!
//! This binary bundles CLI entry points and library sources with esbuild,
//! emits type declarations with tsc, and writes the package entry file.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging, defaulting to info so step progress is visible
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Run CLI and get exit code
    let exit_code = match kodegen_bundler_esm::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
