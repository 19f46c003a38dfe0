use anyhow::{Context, Result};

use crate::config::Config;

use super::ClusterRegistry;

/// Directory-listing registry: every subdirectory of the clusters mount whose
/// name carries a known prefix is a candidate. Mounting the path is an
/// operational concern outside this tool.
pub struct FsRegistry {
    config: Config,
}

impl FsRegistry {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ClusterRegistry for FsRegistry {
    fn list_candidates(&self) -> Result<Vec<String>> {
        let dir = &self.config.clusters_path;
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("read cluster registry {}", dir.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.context("read registry entry")?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.config.is_candidate(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}
