use std::collections::HashMap;

use anyhow::Result;

use crate::model::{ClusterDetail, Credential};

/// Two independent lazily-populated caches keyed by cluster name. The cache
/// is written only by the single thread that owns the view state (or the CLI
/// main thread), so it needs no interior locking; background results arrive
/// as messages and are inserted by that owner.
///
/// There is no expiry: staleness is resolved only by an explicit refresh.
#[derive(Debug, Default)]
pub struct SessionCache {
    metadata: HashMap<String, ClusterDetail>,
    credentials: HashMap<String, Credential>,
}

impl SessionCache {
    pub fn detail(&self, cluster: &str) -> Option<&ClusterDetail> {
        self.metadata.get(cluster)
    }

    pub fn credential(&self, cluster: &str) -> Option<&Credential> {
        self.credentials.get(cluster)
    }

    pub fn insert_detail(&mut self, detail: ClusterDetail) {
        self.metadata.insert(detail.name.clone(), detail);
    }

    pub fn insert_credential(&mut self, cluster: &str, credential: Credential) {
        self.credentials.insert(cluster.to_string(), credential);
    }

    /// Cached detail, or run `fetch` exactly once and populate the cache.
    pub fn detail_or_fetch<F>(&mut self, cluster: &str, fetch: F) -> Result<ClusterDetail>
    where
        F: FnOnce(&str) -> Result<ClusterDetail>,
    {
        if let Some(detail) = self.metadata.get(cluster) {
            return Ok(detail.clone());
        }
        let detail = fetch(cluster)?;
        self.metadata.insert(cluster.to_string(), detail.clone());
        Ok(detail)
    }

    /// Cached credential, or run `fetch` exactly once and populate the cache.
    pub fn credential_or_fetch<F>(&mut self, cluster: &str, fetch: F) -> Result<Credential>
    where
        F: FnOnce(&str) -> Result<Credential>,
    {
        if let Some(credential) = self.credentials.get(cluster) {
            return Ok(credential.clone());
        }
        let credential = fetch(cluster)?;
        self.credentials.insert(cluster.to_string(), credential.clone());
        Ok(credential)
    }

    /// Drop one cluster's entries from both caches.
    pub fn invalidate(&mut self, cluster: &str) {
        self.metadata.remove(cluster);
        self.credentials.remove(cluster);
    }

    /// Drop everything from both caches.
    pub fn invalidate_all(&mut self) {
        self.metadata.clear();
        self.credentials.clear();
    }
}
