//! esbuild metafile parsing.
//!
//! esbuild writes a JSON description of every input and output when invoked
//! with `--metafile`. Only the output table is read here.

use crate::error::{ErrorExt, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metafile {
    #[serde(default)]
    pub outputs: BTreeMap<String, MetaOutput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaOutput {
    #[serde(default)]
    pub bytes: u64,
    /// Set for outputs that correspond to an entry point; chunks and assets have none
    #[serde(default)]
    pub entry_point: Option<String>,
}

impl Metafile {
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn read(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .fs_context("reading esbuild metafile", path)?;
        Self::parse(&json)
    }

    /// Output paths, resolved against the directory esbuild ran in.
    pub fn output_paths(&self, cwd: &Path) -> Vec<PathBuf> {
        self.outputs.keys().map(|key| cwd.join(key)).collect()
    }

    /// Total bytes written.
    pub fn total_bytes(&self) -> u64 {
        self.outputs.values().map(|o| o.bytes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "inputs": { "src/components/button/index.tsx": { "bytes": 120, "imports": [] } },
        "outputs": {
            "lib/components/button/index.js": {
                "bytes": 300,
                "entryPoint": "src/components/button/index.tsx",
                "imports": [], "exports": ["default"], "inputs": {}
            },
            "lib/chunks/chunk-5XKQ2Z7A.js": { "bytes": 1200, "imports": [], "exports": [], "inputs": {} }
        }
    }"#;

    #[test]
    fn reads_outputs_and_entry_points() {
        let meta = Metafile::parse(SAMPLE).unwrap();
        assert_eq!(meta.outputs.len(), 2);
        assert_eq!(meta.total_bytes(), 1500);
        assert_eq!(
            meta.outputs["lib/components/button/index.js"]
                .entry_point
                .as_deref(),
            Some("src/components/button/index.tsx")
        );
        assert!(meta.outputs["lib/chunks/chunk-5XKQ2Z7A.js"].entry_point.is_none());
    }

    #[test]
    fn output_paths_are_anchored_to_cwd() {
        let meta = Metafile::parse(SAMPLE).unwrap();
        let paths = meta.output_paths(Path::new("/work"));
        assert!(paths.contains(&PathBuf::from("/work/lib/chunks/chunk-5XKQ2Z7A.js")));
    }
}
