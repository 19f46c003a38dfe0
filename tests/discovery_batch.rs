mod common;

use std::time::Duration;

use clusterdeck::discovery::run_batch;
use clusterdeck::model::{ClusterStatus, NOT_APPLICABLE, NOT_INSTALLED, UNKNOWN};

use common::{LoginBehavior, MetadataFaults, ScriptedProviders, deps_with};

const BATCH_TIMEOUT: Duration = Duration::from_secs(5);

#[test]
fn batch_yields_one_record_per_candidate_sorted_by_name() {
    let (deps, _) = deps_with(ScriptedProviders::new(&[
        "qemtv-c", "qemtv-a", "qemtv-b", "qemtv-a",
    ]));
    let names = vec![
        "qemtv-c".to_string(),
        "qemtv-a".to_string(),
        "qemtv-b".to_string(),
        "qemtv-a".to_string(),
    ];

    let outcome = run_batch(&deps, &names, BATCH_TIMEOUT);

    let got: Vec<&str> = outcome.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(got, vec!["qemtv-a", "qemtv-b", "qemtv-c"]);
    assert!(outcome.records.iter().all(|r| r.status == ClusterStatus::Online));
}

#[test]
fn one_slow_cluster_times_out_without_stalling_the_rest() {
    let (deps, _) = deps_with(
        ScriptedProviders::new(&["qemtv-fast", "qemtv-slow"])
            .with_login("qemtv-slow", LoginBehavior::Slow(Duration::from_secs(30))),
    );
    let names = vec!["qemtv-fast".to_string(), "qemtv-slow".to_string()];

    let outcome = run_batch(&deps, &names, Duration::from_millis(300));

    let fast = &outcome.records[0];
    assert_eq!(fast.name, "qemtv-fast");
    assert_eq!(fast.status, ClusterStatus::Online);
    assert!(fast.accessible);

    let slow = &outcome.records[1];
    assert_eq!(slow.name, "qemtv-slow");
    assert_eq!(slow.status, ClusterStatus::Timeout);
    assert!(!slow.accessible);
}

#[test]
fn login_failure_marks_only_that_cluster_offline() {
    // Three clusters, the middle one unreachable.
    let (deps, _) = deps_with(
        ScriptedProviders::new(&["qemtv-a", "qemtv-b", "qemtv-c"])
            .with_login("qemtv-b", LoginBehavior::Fail("connection refused")),
    );
    let names = vec![
        "qemtv-a".to_string(),
        "qemtv-b".to_string(),
        "qemtv-c".to_string(),
    ];

    let outcome = run_batch(&deps, &names, BATCH_TIMEOUT);

    let statuses: Vec<(&str, ClusterStatus)> = outcome
        .records
        .iter()
        .map(|r| (r.name.as_str(), r.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("qemtv-a", ClusterStatus::Online),
            ("qemtv-b", ClusterStatus::Offline),
            ("qemtv-c", ClusterStatus::Online),
        ]
    );

    // Metadata was gathered only for the reachable clusters.
    assert!(outcome.details.contains_key("qemtv-a"));
    assert!(!outcome.details.contains_key("qemtv-b"));
    assert!(outcome.details.contains_key("qemtv-c"));
}

#[test]
fn panicking_probe_degrades_to_offline_and_spares_the_batch() {
    let (deps, _) = deps_with(
        ScriptedProviders::new(&["qemtv-a", "qemtv-bad"])
            .with_login("qemtv-bad", LoginBehavior::Panic("boom")),
    );
    let names = vec!["qemtv-a".to_string(), "qemtv-bad".to_string()];

    let outcome = run_batch(&deps, &names, BATCH_TIMEOUT);

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].status, ClusterStatus::Online);
    assert_eq!(outcome.records[1].status, ClusterStatus::Offline);
}

#[test]
fn metadata_failures_degrade_to_sentinels_not_offline() {
    // All sub-queries misbehave; the login still works, so the cluster stays
    // Online with sentinel fields instead of becoming an error.
    let (deps, providers) = deps_with(ScriptedProviders::new(&["qemtv-a"]).with_metadata_faults(
        "qemtv-a",
        MetadataFaults {
            fail_ocp: true,
            mtv_missing: true,
            fail_cnv: true,
            fail_bundle: true,
            fail_console: true,
        },
    ));

    let outcome = run_batch(&deps, &["qemtv-a".to_string()], BATCH_TIMEOUT);

    let record = &outcome.records[0];
    assert_eq!(record.status, ClusterStatus::Online);
    assert!(record.accessible);
    assert_eq!(record.ocp_version, UNKNOWN);
    assert_eq!(record.mtv_version, NOT_INSTALLED);
    assert_eq!(record.cnv_version, NOT_INSTALLED);

    let detail = &outcome.details["qemtv-a"];
    // MTV is absent, so no bundle is expected at all.
    assert_eq!(detail.bundle, NOT_APPLICABLE);
    // The console URL falls back to the configured route template.
    assert_eq!(
        detail.console_url,
        deps.config.console_fallback_url("qemtv-a")
    );
    assert_eq!(
        providers.login_count.load(std::sync::atomic::Ordering::SeqCst),
        1
    );
}

#[test]
fn bundle_failure_with_mtv_installed_reads_unknown() {
    let (deps, _) = deps_with(ScriptedProviders::new(&["qemtv-a"]).with_metadata_faults(
        "qemtv-a",
        MetadataFaults {
            fail_bundle: true,
            ..MetadataFaults::default()
        },
    ));

    let outcome = run_batch(&deps, &["qemtv-a".to_string()], BATCH_TIMEOUT);

    let detail = &outcome.details["qemtv-a"];
    assert_eq!(detail.mtv_version, "2.7.0");
    assert_eq!(detail.bundle, UNKNOWN);
    assert_eq!(detail.mtv_display(), "2.7.0");
}

#[test]
fn online_records_carry_version_fields() {
    let (deps, _) = deps_with(ScriptedProviders::new(&["qemtv-a"]));
    let outcome = run_batch(&deps, &["qemtv-a".to_string()], BATCH_TIMEOUT);

    let record = &outcome.records[0];
    assert_eq!(record.ocp_version, "4.17.3");
    assert_eq!(record.mtv_version, "2.7.0");
    assert_eq!(record.cnv_version, "4.17.1");

    let detail = &outcome.details["qemtv-a"];
    assert_eq!(detail.bundle, "iib-12345");
    assert_eq!(detail.console_url, "https://console.qemtv-a.example");
}
