use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Runtime configuration. Every field has a default matching the QE fleet
/// conventions, so running without a config file is the common case. An
/// optional JSON file (partial files are fine) overrides individual fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Mount point of the cluster registry directory.
    #[serde(default = "default_clusters_path")]
    pub clusters_path: PathBuf,

    /// Directory names starting with one of these are candidate clusters.
    #[serde(default = "default_name_prefixes")]
    pub name_prefixes: Vec<String>,

    /// DNS zone the per-cluster API and console hostnames live under.
    #[serde(default = "default_cluster_domain")]
    pub cluster_domain: String,

    /// Wall-clock budget for one discovery batch, in seconds.
    #[serde(default = "default_discovery_timeout_secs")]
    pub discovery_timeout_secs: u64,
}

fn default_clusters_path() -> PathBuf {
    PathBuf::from("/mnt/cnv-qe.rhcloud.com")
}

fn default_name_prefixes() -> Vec<String> {
    vec!["qemtv-".to_string(), "qemtvd-".to_string()]
}

fn default_cluster_domain() -> String {
    "rhos-psi.cnv-qe.rhood.us".to_string()
}

fn default_discovery_timeout_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clusters_path: default_clusters_path(),
            name_prefixes: default_name_prefixes(),
            cluster_domain: default_cluster_domain(),
            discovery_timeout_secs: default_discovery_timeout_secs(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from `$CLUSTERDECK_CONFIG` /
    /// `~/.config/clusterdeck/config.json` when present. A missing file
    /// yields the defaults; a malformed file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => match std::env::var_os("CLUSTERDECK_CONFIG") {
                Some(p) => Some(PathBuf::from(p)),
                None => std::env::var_os("HOME")
                    .map(|home| PathBuf::from(home).join(".config/clusterdeck/config.json")),
            },
        };

        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg: Config = serde_json::from_str(&raw)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(cfg)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout_secs)
    }

    pub fn is_candidate(&self, name: &str) -> bool {
        self.name_prefixes.iter().any(|p| name.starts_with(p))
    }

    pub fn api_url(&self, cluster: &str) -> String {
        format!("https://api.{}.{}:6443", cluster, self.cluster_domain)
    }

    pub fn console_fallback_url(&self, cluster: &str) -> String {
        format!(
            "https://console-openshift-console.apps.{}.{}",
            cluster, self.cluster_domain
        )
    }

    pub fn kubeconfig_path(&self, cluster: &str) -> PathBuf {
        self.clusters_path.join(cluster).join("auth/kubeconfig")
    }

    pub fn password_path(&self, cluster: &str) -> PathBuf {
        self.clusters_path
            .join(cluster)
            .join("auth/kubeadmin-password")
    }
}
