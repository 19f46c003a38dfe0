//! Background work. Every function here spawns a worker thread that does its
//! job and reports back with a single message; send failures mean the UI has
//! already shut down and are ignored.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::discovery::{self, Deps, probe_cluster};
use crate::model::Credential;

use super::UiMsg;
use super::app::NOTIFICATION_TTL;

/// Full discovery: list candidates, then fan out probes under the batch
/// deadline. The candidate list goes out first so rows appear immediately.
pub(super) fn spawn_discovery(deps: Arc<Deps>, tx: Sender<UiMsg>, generation: u64) {
    thread::spawn(move || {
        let names = match deps.registry.list_candidates() {
            Ok(names) => names,
            Err(err) => {
                let _ = tx.send(UiMsg::BatchFailed {
                    generation,
                    error: format!("{:#}", err),
                });
                return;
            }
        };
        let _ = tx.send(UiMsg::CandidatesListed {
            generation,
            names: names.clone(),
        });

        let timeout = deps.config.deadline();
        let outcome = discovery::run_batch(&deps, &names, timeout);
        let _ = tx.send(UiMsg::BatchFinished {
            generation,
            outcome,
        });
    });
}

pub(super) fn spawn_single_refresh(
    deps: Arc<Deps>,
    tx: Sender<UiMsg>,
    generation: u64,
    name: String,
) {
    thread::spawn(move || {
        let outcome = discovery::run_single(&deps, &name);
        let _ = tx.send(UiMsg::SingleRefreshFinished {
            generation,
            outcome,
        });
    });
}

/// Lazy fetch for a newly selected cluster: metadata plus password in one
/// trip, so the detail pane fills in a single update.
pub(super) fn spawn_detail_fetch(
    deps: Arc<Deps>,
    tx: Sender<UiMsg>,
    generation: u64,
    name: String,
) {
    thread::spawn(move || {
        let result = probe_cluster(&deps, &name)
            .map_err(|err| err.to_string())
            .and_then(|detail| {
                let password = deps
                    .credentials
                    .password(&name)
                    .map_err(|err| format!("{:#}", err))?;
                Ok((detail, Credential { password }))
            });
        let _ = tx.send(UiMsg::DetailLoaded {
            generation,
            cluster: name,
            result,
        });
    });
}

pub(super) fn spawn_credential_fetch(
    deps: Arc<Deps>,
    tx: Sender<UiMsg>,
    generation: u64,
    name: String,
) {
    thread::spawn(move || {
        let result = deps
            .credentials
            .password(&name)
            .map(|password| Credential { password })
            .map_err(|err| format!("{:#}", err));
        let _ = tx.send(UiMsg::CredentialLoaded {
            generation,
            cluster: name,
            result,
        });
    });
}

pub(super) fn spawn_copy(deps: Arc<Deps>, tx: Sender<UiMsg>, field: String, value: String) {
    thread::spawn(move || {
        let result = deps
            .clipboard
            .copy(&value)
            .map_err(|err| format!("{:#}", err));
        let _ = tx.send(UiMsg::CopyFinished { field, result });
    });
}

/// Wakes the UI after the notification TTL so it can re-check the deadline.
/// Superseded notifications are handled by the deadline comparison, not here.
pub(super) fn spawn_notification_timer(tx: Sender<UiMsg>) {
    thread::spawn(move || {
        thread::sleep(NOTIFICATION_TTL);
        let _ = tx.send(UiMsg::NotificationExpired);
    });
}
