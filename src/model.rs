use serde::{Deserialize, Serialize};

/// Substituted when an operator is absent from a cluster.
pub const NOT_INSTALLED: &str = "Not installed";
/// Substituted when a value should exist but could not be determined.
pub const UNKNOWN: &str = "Unknown";
/// Substituted when a value is not applicable for the cluster.
pub const NOT_APPLICABLE: &str = "N/A";

pub const KUBEADMIN_USER: &str = "kubeadmin";

/// Row status. Only `Loading -> terminal` transitions happen; the sole way
/// back to `Loading` is an explicit refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterStatus {
    Loading,
    Online,
    Offline,
    Timeout,
}

impl ClusterStatus {
    pub fn label(self) -> &'static str {
        match self {
            ClusterStatus::Loading => "Loading",
            ClusterStatus::Online => "Online",
            ClusterStatus::Offline => "Offline",
            ClusterStatus::Timeout => "Timeout",
        }
    }

    pub fn is_terminal(self) -> bool {
        self != ClusterStatus::Loading
    }
}

/// One row in the cluster list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClusterRecord {
    pub name: String,
    pub accessible: bool,
    pub status: ClusterStatus,
    pub ocp_version: String,
    pub mtv_version: String,
    pub cnv_version: String,
}

impl ClusterRecord {
    pub fn loading(name: &str) -> Self {
        Self {
            name: name.to_string(),
            accessible: false,
            status: ClusterStatus::Loading,
            ocp_version: String::new(),
            mtv_version: String::new(),
            cnv_version: String::new(),
        }
    }

    pub fn offline(name: &str) -> Self {
        Self {
            status: ClusterStatus::Offline,
            ..Self::loading(name)
        }
    }

    pub fn timeout(name: &str) -> Self {
        Self {
            status: ClusterStatus::Timeout,
            ..Self::loading(name)
        }
    }

    pub fn online(detail: &ClusterDetail) -> Self {
        Self {
            name: detail.name.clone(),
            accessible: true,
            status: ClusterStatus::Online,
            ocp_version: detail.ocp_version.clone(),
            mtv_version: detail.mtv_version.clone(),
            cnv_version: detail.cnv_version.clone(),
        }
    }
}

/// Full metadata for an accessible cluster, as cached by the session layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClusterDetail {
    pub name: String,
    pub ocp_version: String,
    pub mtv_version: String,
    pub cnv_version: String,
    /// Newest matching index-image/catalog source name, or a sentinel.
    pub bundle: String,
    pub console_url: String,
}

impl ClusterDetail {
    /// MTV version annotated with the bundle id when one is known.
    pub fn mtv_display(&self) -> String {
        if self.mtv_version != NOT_INSTALLED
            && self.bundle != NOT_APPLICABLE
            && self.bundle != UNKNOWN
            && !self.bundle.is_empty()
        {
            format!("{} ({})", self.mtv_version, self.bundle)
        } else {
            self.mtv_version.clone()
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Credential {
    pub password: String,
}

/// The `oc login` one-liner shown (and copied) for a cluster.
pub fn login_command(api_url: &str, password: &str) -> String {
    format!(
        "oc login --insecure-skip-tls-verify=true {} -u {} -p {}",
        api_url, KUBEADMIN_USER, password
    )
}
