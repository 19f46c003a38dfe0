use crate::discovery::{BatchOutcome, SingleOutcome};
use crate::model::{ClusterDetail, Credential};

/// Everything background tasks may tell the UI thread. Messages are the only
/// way results cross execution contexts; the consumer owns all state.
pub(super) enum UiMsg {
    /// The registry listing for a batch; rows appear as Loading.
    CandidatesListed { generation: u64, names: Vec<String> },
    /// A discovery batch finished (all probes reported or deadline hit).
    BatchFinished {
        generation: u64,
        outcome: BatchOutcome,
    },
    /// The registry itself could not be read.
    BatchFailed { generation: u64, error: String },
    /// A single-cluster re-probe finished.
    SingleRefreshFinished {
        generation: u64,
        outcome: SingleOutcome,
    },
    /// Lazy detail fetch for the selected cluster.
    DetailLoaded {
        generation: u64,
        cluster: String,
        result: Result<(ClusterDetail, Credential), String>,
    },
    /// Credential-only fetch (detail was already cached).
    CredentialLoaded {
        generation: u64,
        cluster: String,
        result: Result<Credential, String>,
    },
    /// Clipboard write finished.
    CopyFinished {
        field: String,
        result: Result<(), String>,
    },
    /// Recurring notification expiry check.
    NotificationExpired,
}
