use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::model::{ClusterDetail, NOT_APPLICABLE, NOT_INSTALLED, UNKNOWN};

use super::Deps;

pub const MTV_NAMESPACE: &str = "openshift-mtv";
pub const CNV_NAMESPACE: &str = "openshift-cnv";

/// Why a probe classified its cluster as unreachable. Partial metadata
/// failures never show up here: they degrade to sentinel fields inside a
/// successful probe.
#[derive(Clone, Debug)]
pub enum ProbeError {
    /// Login/connect failed; the cluster is offline from our point of view.
    Connect(String),
    /// The probe itself faulted (panic recovered at the probe boundary).
    Fault(String),
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::Connect(msg) => write!(f, "connect failed: {}", msg),
            ProbeError::Fault(msg) => write!(f, "probe fault: {}", msg),
        }
    }
}

impl std::error::Error for ProbeError {}

/// One unit of discovery work: connect, then gather metadata. Any panic in
/// the provider stack is converted into a `ProbeError::Fault` so a single
/// bad cluster can never take down the batch or the process.
pub fn probe_cluster(deps: &Deps, name: &str) -> Result<ClusterDetail, ProbeError> {
    match catch_unwind(AssertUnwindSafe(|| probe_inner(deps, name))) {
        Ok(result) => result,
        Err(payload) => Err(ProbeError::Fault(panic_message(&payload))),
    }
}

fn probe_inner(deps: &Deps, name: &str) -> Result<ClusterDetail, ProbeError> {
    deps.session
        .login(name)
        .map_err(|err| ProbeError::Connect(format!("{:#}", err)))?;

    // From here on partial success is success: each sub-query degrades to a
    // sentinel on its own.
    let ocp_version = deps
        .metadata
        .ocp_version(name)
        .unwrap_or_else(|_| UNKNOWN.to_string());

    let mtv_version = match deps.metadata.operator_version(name, MTV_NAMESPACE) {
        Ok(Some(version)) => version,
        Ok(None) | Err(_) => NOT_INSTALLED.to_string(),
    };

    let cnv_version = match deps.metadata.operator_version(name, CNV_NAMESPACE) {
        Ok(Some(version)) => version,
        Ok(None) | Err(_) => NOT_INSTALLED.to_string(),
    };

    let bundle = match deps.metadata.catalog_bundle(name) {
        Ok(Some(bundle)) => bundle,
        Ok(None) | Err(_) => {
            if mtv_version != NOT_INSTALLED {
                UNKNOWN.to_string()
            } else {
                NOT_APPLICABLE.to_string()
            }
        }
    };

    let console_url = deps
        .metadata
        .console_url(name)
        .unwrap_or_else(|_| deps.config.console_fallback_url(name));

    Ok(ClusterDetail {
        name: name.to_string(),
        ocp_version,
        mtv_version,
        cnv_version,
        bundle,
        console_url,
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
