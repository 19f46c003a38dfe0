mod common;

use std::sync::atomic::Ordering;

use anyhow::Result;

use clusterdeck::discovery::run_single;
use clusterdeck::model::{ClusterDetail, ClusterStatus, Credential};
use clusterdeck::session::SessionCache;

use common::{LoginBehavior, ScriptedProviders, deps_with};

fn detail(name: &str) -> ClusterDetail {
    ClusterDetail {
        name: name.to_string(),
        ocp_version: "4.17.3".to_string(),
        mtv_version: "2.7.0".to_string(),
        cnv_version: "4.17.1".to_string(),
        bundle: "iib-12345".to_string(),
        console_url: "https://console.example".to_string(),
    }
}

#[test]
fn detail_fetch_runs_once_until_invalidated() -> Result<()> {
    let (deps, providers) = deps_with(ScriptedProviders::new(&["qemtv-a"]));
    let mut cache = SessionCache::default();

    let first = cache.detail_or_fetch("qemtv-a", |name| {
        deps.credentials.password(name)?;
        Ok(detail(name))
    })?;
    let second = cache.detail_or_fetch("qemtv-a", |name| {
        deps.credentials.password(name)?;
        Ok(detail(name))
    })?;

    assert_eq!(first.ocp_version, second.ocp_version);
    assert_eq!(providers.password_count.load(Ordering::SeqCst), 1);

    cache.invalidate("qemtv-a");
    cache.detail_or_fetch("qemtv-a", |name| {
        deps.credentials.password(name)?;
        Ok(detail(name))
    })?;
    assert_eq!(providers.password_count.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn credential_fetch_is_lazy_and_cached() -> Result<()> {
    let (deps, providers) = deps_with(ScriptedProviders::new(&["qemtv-a"]));
    let mut cache = SessionCache::default();

    assert!(cache.credential("qemtv-a").is_none());
    assert_eq!(providers.password_count.load(Ordering::SeqCst), 0);

    let fetch = |name: &str| -> Result<Credential> {
        Ok(Credential {
            password: deps.credentials.password(name)?,
        })
    };
    let first = cache.credential_or_fetch("qemtv-a", fetch)?;
    let second = cache.credential_or_fetch("qemtv-a", fetch)?;

    assert_eq!(first.password, "pw-qemtv-a");
    assert_eq!(first.password, second.password);
    assert_eq!(providers.password_count.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn invalidate_all_clears_both_caches() -> Result<()> {
    let mut cache = SessionCache::default();
    cache.insert_detail(detail("qemtv-a"));
    cache.insert_credential(
        "qemtv-a",
        Credential {
            password: "pw".to_string(),
        },
    );

    cache.invalidate_all();

    assert!(cache.detail("qemtv-a").is_none());
    assert!(cache.credential("qemtv-a").is_none());
    Ok(())
}

#[test]
fn single_refresh_returns_fresh_metadata_and_credential() {
    let (deps, _) = deps_with(ScriptedProviders::new(&["qemtv-a"]));

    let outcome = run_single(&deps, "qemtv-a");

    assert_eq!(outcome.record.status, ClusterStatus::Online);
    let detail = outcome.detail.expect("detail");
    assert_eq!(detail.mtv_version, "2.7.0");
    let credential = outcome.credential.expect("credential");
    assert_eq!(credential.password, "pw-qemtv-a");
    assert!(outcome.error.is_none());
}

#[test]
fn single_refresh_of_unreachable_cluster_reports_the_error() {
    let (deps, _) = deps_with(
        ScriptedProviders::new(&["qemtv-a"])
            .with_login("qemtv-a", LoginBehavior::Fail("connection refused")),
    );

    let outcome = run_single(&deps, "qemtv-a");

    assert_eq!(outcome.record.status, ClusterStatus::Offline);
    assert!(!outcome.record.accessible);
    assert!(outcome.detail.is_none());
    assert!(outcome.credential.is_none());
    let err = outcome.error.expect("error");
    assert!(err.contains("connection refused"));
}
