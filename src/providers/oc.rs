use std::process::Command;

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::config::Config;
use crate::model::KUBEADMIN_USER;

use super::{CredentialStore, MetadataProvider, SessionProvider};

const MARKETPLACE_NAMESPACE: &str = "openshift-marketplace";
const CONSOLE_NAMESPACE: &str = "openshift-console";

/// Production session/metadata/credential provider backed by the `oc` binary
/// and the per-cluster auth material on the registry mount. Every call shells
/// out with the cluster's own kubeconfig, so concurrent probes never share
/// client state.
pub struct OcClient {
    config: Config,
}

impl OcClient {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn oc_json(&self, cluster: &str, args: &[&str]) -> Result<Value> {
        let kubeconfig = self.config.kubeconfig_path(cluster);
        let output = Command::new("oc")
            .args(args)
            .arg("-o")
            .arg("json")
            .arg("--kubeconfig")
            .arg(&kubeconfig)
            .output()
            .context("run oc")?;
        if !output.status.success() {
            bail!(
                "oc {} failed for {}: {}",
                args.join(" "),
                cluster,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        serde_json::from_slice(&output.stdout).context("parse oc json output")
    }
}

impl SessionProvider for OcClient {
    fn login(&self, cluster: &str) -> Result<()> {
        let kubeconfig = self.config.kubeconfig_path(cluster);
        if !kubeconfig.exists() {
            bail!("kubeconfig not found at {}", kubeconfig.display());
        }

        let password = self.password(cluster)?;
        let output = Command::new("oc")
            .arg("login")
            .arg("--insecure-skip-tls-verify=true")
            .arg(self.config.api_url(cluster))
            .arg("-u")
            .arg(KUBEADMIN_USER)
            .arg("-p")
            .arg(&password)
            .arg("--kubeconfig")
            .arg(&kubeconfig)
            .output()
            .context("run oc login")?;
        if !output.status.success() {
            bail!(
                "login to {} failed: {}",
                cluster,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

impl MetadataProvider for OcClient {
    fn ocp_version(&self, cluster: &str) -> Result<String> {
        let doc = self.oc_json(cluster, &["get", "clusterversion", "version"])?;

        // Prefer the last completed rollout; fall back to the desired version.
        let completed = doc["status"]["history"]
            .as_array()
            .into_iter()
            .flatten()
            .find(|h| h["state"].as_str() == Some("Completed"))
            .and_then(|h| h["version"].as_str());
        if let Some(v) = completed {
            return Ok(v.to_string());
        }
        if let Some(v) = doc["status"]["desired"]["version"].as_str() {
            if !v.is_empty() {
                return Ok(v.to_string());
            }
        }
        bail!("no completed or desired version reported by {}", cluster)
    }

    fn operator_version(&self, cluster: &str, namespace: &str) -> Result<Option<String>> {
        let doc = self.oc_json(cluster, &["get", "csv", "-n", namespace])?;
        let items = doc["items"].as_array().cloned().unwrap_or_default();

        // An active CSV is one nothing has replaced yet.
        for item in items {
            let replaced_by = item["status"]["replacedBy"].as_str().unwrap_or("");
            if !replaced_by.is_empty() {
                continue;
            }
            if let Some(version) = item["spec"]["version"].as_str() {
                if !version.is_empty() {
                    return Ok(Some(version.to_string()));
                }
            }
        }
        Ok(None)
    }

    fn catalog_bundle(&self, cluster: &str) -> Result<Option<String>> {
        let doc = self.oc_json(cluster, &["get", "catalogsource", "-n", MARKETPLACE_NAMESPACE])?;
        let items = doc["items"].as_array().cloned().unwrap_or_default();

        let mut sources: Vec<(String, String)> = items
            .iter()
            .filter_map(|item| {
                let name = item["metadata"]["name"].as_str()?;
                let created = item["metadata"]["creationTimestamp"]
                    .as_str()
                    .unwrap_or_default();
                if name.starts_with("iib-")
                    || name.contains("redhat-osbs-")
                    || name.contains("mtv")
                    || name.contains("forklift")
                {
                    Some((created.to_string(), name.to_string()))
                } else {
                    None
                }
            })
            .collect();

        // RFC 3339 timestamps sort lexicographically; newest first.
        sources.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(sources.into_iter().next().map(|(_, name)| name))
    }

    fn console_url(&self, cluster: &str) -> Result<String> {
        let doc = self.oc_json(cluster, &["get", "route", "console", "-n", CONSOLE_NAMESPACE])?;
        match doc["spec"]["host"].as_str() {
            Some(host) if !host.is_empty() => Ok(format!("https://{}", host)),
            _ => bail!("console route for {} has no host", cluster),
        }
    }
}

impl CredentialStore for OcClient {
    fn password(&self, cluster: &str) -> Result<String> {
        let path = self.config.password_path(cluster);
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("read password file {}", path.display()))?;
        let password = raw.trim();
        if password.is_empty() {
            bail!("password file {} is empty", path.display());
        }
        Ok(password.to_string())
    }
}
