//! Scriptable provider doubles shared by the integration tests. Behavior is
//! keyed per cluster name so one `Deps` can mix healthy, failing, slow, and
//! panicking clusters in a single batch.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;

use clusterdeck::config::Config;
use clusterdeck::discovery::Deps;
use clusterdeck::providers::{
    ClipboardSink, ClusterRegistry, CredentialStore, MetadataProvider, SessionProvider,
};

#[derive(Clone, Debug, Default)]
pub enum LoginBehavior {
    #[default]
    Ok,
    Fail(&'static str),
    Panic(&'static str),
    Slow(Duration),
}

/// Which metadata sub-queries misbehave for a cluster. Failures here never
/// make the cluster unreachable; they exercise the sentinel degradation.
#[derive(Clone, Debug, Default)]
pub struct MetadataFaults {
    pub fail_ocp: bool,
    pub mtv_missing: bool,
    pub fail_cnv: bool,
    pub fail_bundle: bool,
    pub fail_console: bool,
}

#[derive(Default)]
pub struct ScriptedProviders {
    pub names: Vec<String>,
    pub logins: HashMap<String, LoginBehavior>,
    pub metadata_faults: HashMap<String, MetadataFaults>,
    pub login_count: AtomicUsize,
    pub password_count: AtomicUsize,
}

impl ScriptedProviders {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_login(mut self, name: &str, behavior: LoginBehavior) -> Self {
        self.logins.insert(name.to_string(), behavior);
        self
    }

    pub fn with_metadata_faults(mut self, name: &str, faults: MetadataFaults) -> Self {
        self.metadata_faults.insert(name.to_string(), faults);
        self
    }

    fn faults(&self, cluster: &str) -> MetadataFaults {
        self.metadata_faults.get(cluster).cloned().unwrap_or_default()
    }
}

impl ClusterRegistry for ScriptedProviders {
    fn list_candidates(&self) -> Result<Vec<String>> {
        Ok(self.names.clone())
    }
}

impl SessionProvider for ScriptedProviders {
    fn login(&self, cluster: &str) -> Result<()> {
        self.login_count.fetch_add(1, Ordering::SeqCst);
        match self.logins.get(cluster).cloned().unwrap_or_default() {
            LoginBehavior::Ok => Ok(()),
            LoginBehavior::Fail(msg) => anyhow::bail!("{}", msg),
            LoginBehavior::Panic(msg) => panic!("{}", msg),
            LoginBehavior::Slow(delay) => {
                std::thread::sleep(delay);
                Ok(())
            }
        }
    }
}

impl MetadataProvider for ScriptedProviders {
    fn ocp_version(&self, cluster: &str) -> Result<String> {
        if self.faults(cluster).fail_ocp {
            anyhow::bail!("clusterversion query failed");
        }
        Ok("4.17.3".to_string())
    }

    fn operator_version(&self, cluster: &str, namespace: &str) -> Result<Option<String>> {
        let faults = self.faults(cluster);
        match namespace {
            "openshift-mtv" if faults.mtv_missing => Ok(None),
            "openshift-mtv" => Ok(Some("2.7.0".to_string())),
            "openshift-cnv" if faults.fail_cnv => anyhow::bail!("csv query failed"),
            "openshift-cnv" => Ok(Some("4.17.1".to_string())),
            _ => Ok(None),
        }
    }

    fn catalog_bundle(&self, cluster: &str) -> Result<Option<String>> {
        if self.faults(cluster).fail_bundle {
            anyhow::bail!("catalogsource query failed");
        }
        Ok(Some("iib-12345".to_string()))
    }

    fn console_url(&self, cluster: &str) -> Result<String> {
        if self.faults(cluster).fail_console {
            anyhow::bail!("console route query failed");
        }
        Ok(format!("https://console.{}.example", cluster))
    }
}

impl CredentialStore for ScriptedProviders {
    fn password(&self, cluster: &str) -> Result<String> {
        self.password_count.fetch_add(1, Ordering::SeqCst);
        Ok(format!("pw-{}", cluster))
    }
}

impl ClipboardSink for ScriptedProviders {
    fn copy(&self, _text: &str) -> Result<()> {
        Ok(())
    }
}

pub fn deps_with(providers: ScriptedProviders) -> (Arc<Deps>, Arc<ScriptedProviders>) {
    let providers = Arc::new(providers);
    let deps = Arc::new(Deps {
        config: Config::default(),
        registry: providers.clone(),
        session: providers.clone(),
        metadata: providers.clone(),
        credentials: providers.clone(),
        clipboard: providers.clone(),
    });
    (deps, providers)
}
