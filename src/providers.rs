use anyhow::Result;

mod clipboard;
mod fs_registry;
mod oc;

pub use self::clipboard::ShellClipboard;
pub use self::fs_registry::FsRegistry;
pub use self::oc::OcClient;

/// Enumerates candidate cluster names from the registry mount.
pub trait ClusterRegistry: Send + Sync {
    fn list_candidates(&self) -> Result<Vec<String>>;
}

/// Establishes (or refreshes) a session against one cluster. A failure here
/// classifies the cluster as unreachable.
pub trait SessionProvider: Send + Sync {
    fn login(&self, cluster: &str) -> Result<()>;
}

/// Per-cluster metadata queries. Each call may fail independently; callers
/// degrade failures to sentinel values instead of propagating them.
pub trait MetadataProvider: Send + Sync {
    fn ocp_version(&self, cluster: &str) -> Result<String>;

    /// Version of the active operator CSV in `namespace`, `None` when the
    /// operator is not installed there.
    fn operator_version(&self, cluster: &str, namespace: &str) -> Result<Option<String>>;

    /// Newest index-image/catalog source relevant to MTV, if any.
    fn catalog_bundle(&self, cluster: &str) -> Result<Option<String>>;

    fn console_url(&self, cluster: &str) -> Result<String>;
}

/// Read-only per-cluster secret retrieval.
pub trait CredentialStore: Send + Sync {
    fn password(&self, cluster: &str) -> Result<String>;
}

/// Best-effort string copy; failures are surfaced as notifications only.
pub trait ClipboardSink: Send + Sync {
    fn copy(&self, text: &str) -> Result<()>;
}
