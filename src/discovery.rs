use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::model::{ClusterDetail, ClusterRecord, Credential};
use crate::providers::{
    ClipboardSink, ClusterRegistry, CredentialStore, MetadataProvider, SessionProvider,
};

mod probe;

pub use self::probe::{ProbeError, probe_cluster};

/// Every external collaborator, constructed once and passed in explicitly.
/// There is no unconfigured state: holding a `Deps` means holding working
/// providers (real or test doubles).
pub struct Deps {
    pub config: Config,
    pub registry: Arc<dyn ClusterRegistry>,
    pub session: Arc<dyn SessionProvider>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub credentials: Arc<dyn CredentialStore>,
    pub clipboard: Arc<dyn ClipboardSink>,
}

impl Deps {
    pub fn production(config: Config) -> Self {
        let oc = Arc::new(crate::providers::OcClient::new(config.clone()));
        Self {
            registry: Arc::new(crate::providers::FsRegistry::new(config.clone())),
            session: oc.clone(),
            metadata: oc.clone(),
            credentials: oc,
            clipboard: Arc::new(crate::providers::ShellClipboard),
            config,
        }
    }
}

/// Result of one discovery batch: exactly one record per candidate name,
/// sorted by name, plus the full metadata fetched for accessible clusters.
#[derive(Debug)]
pub struct BatchOutcome {
    pub records: Vec<ClusterRecord>,
    pub details: HashMap<String, ClusterDetail>,
}

/// Result of re-probing a single cluster.
#[derive(Debug)]
pub struct SingleOutcome {
    pub record: ClusterRecord,
    pub detail: Option<ClusterDetail>,
    pub credential: Option<Credential>,
    pub error: Option<String>,
}

/// Fan out one probe per candidate and collect under a single wall-clock
/// deadline. Completion order never matters: the output is name-sorted, and
/// any cluster still unreported when the deadline fires is synthesized as
/// `Timeout`. A fault inside one probe becomes an `Offline` row for that
/// cluster only.
pub fn run_batch(deps: &Arc<Deps>, names: &[String], timeout: Duration) -> BatchOutcome {
    let unique: Vec<String> = names
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let (tx, rx) = mpsc::channel::<(String, Result<ClusterDetail, ProbeError>)>();
    for name in &unique {
        let tx = tx.clone();
        let deps = Arc::clone(deps);
        let name = name.clone();
        thread::spawn(move || {
            let outcome = probe::probe_cluster(&deps, &name);
            // The receiver may have given up at the deadline already.
            let _ = tx.send((name, outcome));
        });
    }
    drop(tx);

    let deadline = Instant::now() + timeout;
    let mut records: BTreeMap<String, ClusterRecord> = BTreeMap::new();
    let mut details: HashMap<String, ClusterDetail> = HashMap::new();

    while records.len() < unique.len() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        match rx.recv_timeout(remaining) {
            Ok((name, Ok(detail))) => {
                records.insert(name.clone(), ClusterRecord::online(&detail));
                details.insert(name, detail);
            }
            Ok((name, Err(_))) => {
                records.insert(name.clone(), ClusterRecord::offline(&name));
            }
            Err(_) => break,
        }
    }

    for name in &unique {
        records
            .entry(name.clone())
            .or_insert_with(|| ClusterRecord::timeout(name));
    }

    BatchOutcome {
        records: records.into_values().collect(),
        details,
    }
}

/// Probe one cluster (no batch deadline) and fetch its credential on
/// success. Errors are folded into the returned record and message; the
/// caller never sees a `Result`.
pub fn run_single(deps: &Arc<Deps>, name: &str) -> SingleOutcome {
    match probe::probe_cluster(deps, name) {
        Ok(detail) => {
            let (credential, error) = match deps.credentials.password(name) {
                Ok(password) => (Some(Credential { password }), None),
                Err(err) => (None, Some(format!("password for {}: {:#}", name, err))),
            };
            SingleOutcome {
                record: ClusterRecord::online(&detail),
                detail: Some(detail),
                credential,
                error,
            }
        }
        Err(err) => SingleOutcome {
            record: ClusterRecord::offline(name),
            detail: None,
            credential: None,
            error: Some(format!("{}", err)),
        },
    }
}
