use chrono::{TimeZone, Utc};
use healthmonitor_core::domain::{Alert, AlertStatus, AlertType};
use proptest::prelude::*;

use super::*;

const DID: &str = "dev-1";

fn alert(alert_type: AlertType, status: AlertStatus, created_secs: i64) -> Alert {
    let ts = Utc.timestamp_opt(1_700_000_000 + created_secs, 0).single().expect("valid ts");
    Alert {
        did: DID.to_owned(),
        alert_type,
        status,
        created_ts: ts,
        last_active_ts: ts,
        resolved_ts: chrono::DateTime::<Utc>::UNIX_EPOCH,
    }
}

#[test]
fn active_plus_active_candidate_continues_preserving_created_ts() {
    let active = alert(AlertType::TempHigh, AlertStatus::Active, 0);
    let candidate = alert(AlertType::TempHigh, AlertStatus::Active, 100);
    let updates = reconcile(DID, &[active.clone()], &[candidate]);
    assert_eq!(updates.len(), 1);
    match &updates[0] {
        AlertUpdate::Continued { alert, .. } => assert_eq!(alert.created_ts, active.created_ts),
        other => panic!("expected Continued, got {other:?}"),
    }
}

#[test]
fn active_plus_resolved_candidate_resolves_preserving_created_ts() {
    let active = alert(AlertType::TempHigh, AlertStatus::Active, 0);
    let candidate = alert(AlertType::TempHigh, AlertStatus::Resolved, 100);
    let updates = reconcile(DID, &[active.clone()], &[candidate]);
    assert_eq!(updates.len(), 1);
    match &updates[0] {
        AlertUpdate::Resolved { alert, .. } => assert_eq!(alert.created_ts, active.created_ts),
        other => panic!("expected Resolved, got {other:?}"),
    }
}

#[test]
fn no_active_plus_active_candidate_creates() {
    let candidate = alert(AlertType::TempHigh, AlertStatus::Active, 0);
    let updates = reconcile(DID, &[], &[candidate.clone()]);
    assert_eq!(updates.len(), 1);
    match &updates[0] {
        AlertUpdate::Created { alert, .. } => assert_eq!(alert.created_ts, candidate.created_ts),
        other => panic!("expected Created, got {other:?}"),
    }
}

#[test]
fn no_active_plus_resolved_candidate_emits_nothing() {
    let candidate = alert(AlertType::TempHigh, AlertStatus::Resolved, 0);
    let updates = reconcile(DID, &[], &[candidate]);
    assert!(updates.is_empty());
}

#[test]
fn no_candidate_for_an_active_alert_emits_nothing() {
    // An alert type no longer present among candidates (no run in the window
    // at all) simply isn't touched; it neither continues nor resolves here.
    let active = alert(AlertType::TempHigh, AlertStatus::Active, 0);
    let updates = reconcile(DID, &[active], &[]);
    assert!(updates.is_empty());
}

#[test]
fn duplicate_candidates_of_same_type_keep_first_and_warn() {
    let first = alert(AlertType::TempHigh, AlertStatus::Active, 0);
    let second = alert(AlertType::TempHigh, AlertStatus::Active, 50);
    let updates = reconcile(DID, &[], &[first.clone(), second]);
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].alert().created_ts, first.created_ts);
}

#[test]
fn independent_alert_types_do_not_interfere() {
    let active = vec![alert(AlertType::TempHigh, AlertStatus::Active, 0)];
    let candidates = vec![
        alert(AlertType::TempHigh, AlertStatus::Active, 0),
        alert(AlertType::Spo2Low, AlertStatus::Active, 10),
    ];
    let updates = reconcile(DID, &active, &candidates);
    assert_eq!(updates.len(), 2);
}

fn arb_status() -> impl Strategy<Value = AlertStatus> {
    prop_oneof![Just(AlertStatus::Active), Just(AlertStatus::Resolved)]
}

fn arb_alert_type() -> impl Strategy<Value = AlertType> {
    prop_oneof![
        Just(AlertType::TempHigh),
        Just(AlertType::TempLow),
        Just(AlertType::HeartrateHigh),
        Just(AlertType::HeartrateLow),
        Just(AlertType::EcgHigh),
        Just(AlertType::EcgLow),
        Just(AlertType::Spo2High),
        Just(AlertType::Spo2Low),
    ]
}

proptest! {
    /// §8: no two updates from one reconcile call share a docId.
    #[test]
    fn updates_never_collide_on_doc_id(
        active_types in prop::collection::vec(arb_alert_type(), 0..8),
        candidate_pairs in prop::collection::vec((arb_alert_type(), arb_status()), 0..8),
    ) {
        let active: Vec<Alert> = active_types.into_iter().map(|t| alert(t, AlertStatus::Active, 0)).collect();
        let candidates: Vec<Alert> = candidate_pairs.into_iter().map(|(t, s)| alert(t, s, 1)).collect();
        let updates = reconcile(DID, &active, &candidates);
        let mut ids: Vec<&str> = updates.iter().map(AlertUpdate::doc_id).collect();
        ids.sort_unstable();
        let mut dedup = ids.clone();
        dedup.dedup();
        prop_assert_eq!(ids.len(), dedup.len());
    }

    /// §8: RESOLVED is only ever emitted when an active alert of that type existed.
    #[test]
    fn resolved_only_emitted_when_active_existed(
        active_types in prop::collection::vec(arb_alert_type(), 0..8),
        candidate_pairs in prop::collection::vec((arb_alert_type(), arb_status()), 0..8),
    ) {
        let active: Vec<Alert> = active_types.clone().into_iter().map(|t| alert(t, AlertStatus::Active, 0)).collect();
        let candidates: Vec<Alert> = candidate_pairs.into_iter().map(|(t, s)| alert(t, s, 1)).collect();
        let updates = reconcile(DID, &active, &candidates);
        for update in &updates {
            if let AlertUpdate::Resolved { alert, .. } = update {
                prop_assert!(active_types.contains(&alert.alert_type));
            }
        }
    }
}
