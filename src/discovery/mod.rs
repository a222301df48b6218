//! Entry point discovery by directory convention.
//!
//! Each source root holds one module per immediate subdirectory, and each
//! module is entered through an `index.<ext>` file. The root may also carry
//! its own index. Nothing deeper than one level is considered.

use crate::error::{BuildError, ErrorExt, Result};
use std::path::{Path, PathBuf};

/// Base name shared by every index file.
pub const INDEX_STEM: &str = "index";

/// Lists the index files of `root` and of its immediate subdirectories.
///
/// `extensions` are matched in order with their leading dot (`.ts`, `.tsx`);
/// the first extension present wins, so each directory yields at most one
/// entry. The root's own index comes first, followed by subdirectories in
/// file-name order.
///
/// A missing root is not an error: it yields an empty list and a warning.
pub fn list_subdirectory_indexes(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        log::warn!(
            "Source root {} does not exist or is not a directory, skipping",
            root.display()
        );
        return Ok(Vec::new());
    }

    let mut indexes = Vec::new();
    if let Some(index) = find_index(root, extensions) {
        indexes.push(index);
    }

    let walker = walkdir::WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            match e.into_io_error() {
                Some(source) => BuildError::FsContext {
                    context: "listing source root".to_string(),
                    path,
                    source,
                },
                None => BuildError::Generic(format!(
                    "filesystem loop while listing {}",
                    path.display()
                )),
            }
        })?;

        if !entry.file_type().is_dir() {
            continue;
        }
        if let Some(index) = find_index(entry.path(), extensions) {
            indexes.push(index);
        }
    }

    log::debug!(
        "Found {} index file(s) under {}",
        indexes.len(),
        root.display()
    );
    Ok(indexes)
}

/// Async wrapper around [`list_subdirectory_indexes`].
///
/// Directory walking is blocking, so it runs on the blocking thread pool.
pub async fn discover_indexes(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let root = root.to_path_buf();
    let extensions = extensions.to_vec();
    tokio::task::spawn_blocking(move || list_subdirectory_indexes(&root, &extensions)).await?
}

/// Discovers index files across several roots and flattens them in root order.
pub async fn discover_all(roots: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for root in roots {
        entries.extend(discover_indexes(root, extensions).await?);
    }
    Ok(entries)
}

fn find_index(dir: &Path, extensions: &[String]) -> Option<PathBuf> {
    extensions
        .iter()
        .map(|ext| dir.join(format!("{INDEX_STEM}{ext}")))
        .find(|candidate| candidate.is_file())
}

/// Ensures every discovered entry is still present before it is handed to the bundler.
pub fn verify_entries_exist(entries: &[PathBuf]) -> Result<()> {
    for entry in entries {
        std::fs::metadata(entry).fs_context("checking entry point", entry)?;
    }
    Ok(())
}
