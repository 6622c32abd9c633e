// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The six end-to-end scenarios of spec.md §8, each driven against
//! in-memory fakes rather than a live Elasticsearch/NATS cluster.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use healthmonitor_core::domain::{AlertStatus, AlertType, DeviceSample};
use healthmonitor_core::store::InMemoryStore;
use healthmonitor_specs::{clear_debounce, default_notify_flags, minutes_ago, sample, temperature_only_orchestrator, DID};
use healthmonitor_validator::cleanup::CleanupHandler;
use healthmonitor_validator::report::ReportHandler;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Scenario 1: first-ever high temperature creates one ACTIVE alert.
#[tokio::test]
async fn scenario_1_first_ever_high_temperature() {
    let store = Arc::new(InMemoryStore::new());
    store.register_device_info(DID, "patient").await.expect("register");
    let orchestrator = temperature_only_orchestrator(Arc::clone(&store), default_notify_flags());

    let in_bound_ts = minutes_ago(2);
    store.append_samples(&[sample(in_bound_ts, 37.0)]).await.expect("append in-bound sample");
    orchestrator.handle_validation(DID).await.expect("first validation");
    assert!(store.get_active_alerts(DID).await.expect("active alerts").is_empty());

    clear_debounce(&store).await;
    let out_of_bound_ts = minutes_ago(1);
    store.append_samples(&[sample(out_of_bound_ts, 39.0)]).await.expect("append out-of-bound sample");
    orchestrator.handle_validation(DID).await.expect("second validation");

    let active = store.get_active_alerts(DID).await.expect("active alerts");
    assert_eq!(active.len(), 1);
    let alert = &active[0];
    assert_eq!(alert.alert_type, AlertType::TempHigh);
    assert_eq!(alert.status, AlertStatus::Active);
    assert_eq!(alert.created_ts, out_of_bound_ts);
    assert_eq!(alert.last_active_ts, out_of_bound_ts);
    assert_eq!(alert.resolved_ts, DateTime::<Utc>::UNIX_EPOCH);
}

/// Scenario 2: a later high sample continues the same alert document.
#[tokio::test]
async fn scenario_2_continuation_updates_last_active_ts_not_doc_id() {
    let store = Arc::new(InMemoryStore::new());
    store.register_device_info(DID, "patient").await.expect("register");
    let orchestrator = temperature_only_orchestrator(Arc::clone(&store), default_notify_flags());

    let created_ts = minutes_ago(2);
    store.append_samples(&[sample(created_ts, 39.0)]).await.expect("append");
    orchestrator.handle_validation(DID).await.expect("first validation");
    let first_doc_id = store.get_active_alerts(DID).await.expect("active").first().expect("one alert").doc_id();

    clear_debounce(&store).await;
    let continued_ts = minutes_ago(1);
    store.append_samples(&[sample(continued_ts, 39.5)]).await.expect("append");
    orchestrator.handle_validation(DID).await.expect("second validation");

    let active = store.get_active_alerts(DID).await.expect("active alerts");
    assert_eq!(active.len(), 1, "continuation must not create a second document");
    assert_eq!(active[0].doc_id(), first_doc_id);
    assert_eq!(active[0].created_ts, created_ts);
    assert_eq!(active[0].last_active_ts, continued_ts);
}

/// Scenario 3: a re-entry sample resolves the same alert document.
#[tokio::test]
async fn scenario_3_resolution_transitions_status_and_sets_resolved_ts() {
    let store = Arc::new(InMemoryStore::new());
    store.register_device_info(DID, "patient").await.expect("register");
    let orchestrator = temperature_only_orchestrator(Arc::clone(&store), default_notify_flags());

    let created_ts = minutes_ago(3);
    store.append_samples(&[sample(created_ts, 39.0)]).await.expect("append");
    orchestrator.handle_validation(DID).await.expect("first validation");

    clear_debounce(&store).await;
    let continued_ts = minutes_ago(2);
    store.append_samples(&[sample(continued_ts, 39.5)]).await.expect("append");
    orchestrator.handle_validation(DID).await.expect("second validation");
    let doc_id = store.get_active_alerts(DID).await.expect("active").first().expect("one alert").doc_id();

    clear_debounce(&store).await;
    let resolved_ts = minutes_ago(1);
    store.append_samples(&[sample(resolved_ts, 36.9)]).await.expect("append re-entry sample");
    orchestrator.handle_validation(DID).await.expect("third validation");

    assert!(store.get_active_alerts(DID).await.expect("active alerts").is_empty());
    let all = store.scroll_alerts(DID).await.expect("scroll alerts");
    let alert = all.iter().find(|a| a.doc_id() == doc_id).expect("same document, now resolved");
    assert_eq!(alert.status, AlertStatus::Resolved);
    assert_eq!(alert.last_active_ts, continued_ts);
    assert_eq!(alert.resolved_ts, resolved_ts);
}

/// Scenario 4: two validation messages arriving within the debounce
/// window only do real work once.
#[tokio::test]
async fn scenario_4_debounce_only_one_message_does_real_work() {
    let store = Arc::new(InMemoryStore::new());
    store.register_device_info(DID, "patient").await.expect("register");
    let orchestrator = temperature_only_orchestrator(Arc::clone(&store), default_notify_flags());

    store.append_samples(&[sample(minutes_ago(1), 39.0)]).await.expect("append");
    orchestrator.handle_validation(DID).await.expect("first message");
    let after_first = store.get_device_info(DID).await.expect("info").last_validation_ts;
    assert_eq!(store.get_active_alerts(DID).await.expect("active").len(), 1);

    // Second message "1s later": debounce window (5s) has not elapsed, so
    // this must be a no-op even though a new sample landed in between.
    store.append_samples(&[sample(Utc::now(), 39.5)]).await.expect("append");
    orchestrator.handle_validation(DID).await.expect("second message");
    let after_second = store.get_device_info(DID).await.expect("info").last_validation_ts;

    assert_eq!(after_first, after_second, "debounced call must not re-advance last_validation_ts");
    assert_eq!(store.get_active_alerts(DID).await.expect("active").len(), 1);
}

/// Scenario 5: cleanup deletes every sample with `ts <= cutoff`.
#[tokio::test]
async fn scenario_5_cleanup_deletes_everything_at_or_before_cutoff() {
    let store = Arc::new(InMemoryStore::new());
    store.register_device_info(DID, "patient").await.expect("register");

    let cutoff: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().expect("valid rfc3339");
    let samples = vec![
        DeviceSample { did: DID.to_owned(), ts: cutoff - chrono::Duration::hours(1), temperature: 36.0, heart_rate: 70.0, ecg: 70.0, spo2: 98.0 },
        DeviceSample { did: DID.to_owned(), ts: cutoff, temperature: 36.0, heart_rate: 70.0, ecg: 70.0, spo2: 98.0 },
        DeviceSample { did: DID.to_owned(), ts: cutoff + chrono::Duration::hours(1), temperature: 36.0, heart_rate: 70.0, ecg: 70.0, spo2: 98.0 },
    ];
    store.append_samples(&samples).await.expect("append");

    let handler = CleanupHandler::new(Arc::clone(&store));
    handler.handle(cutoff, CancellationToken::new()).await.expect("cleanup");

    let remaining = store.get_device_data(DID, DateTime::<Utc>::UNIX_EPOCH, Utc::now() + chrono::Duration::days(1)).await.expect("data");
    assert_eq!(remaining.len(), 1);
    assert!(remaining[0].ts > cutoff);
}

/// Scenario 6: report generation writes one file per bundle part.
#[tokio::test]
async fn scenario_6_report_fan_out_writes_three_files() {
    let store = Arc::new(InMemoryStore::new());
    store.register_device_info(DID, "patient").await.expect("register");
    store.append_samples(&[sample(minutes_ago(5), 36.5), sample(minutes_ago(1), 39.0)]).await.expect("append");

    let orchestrator = temperature_only_orchestrator(Arc::clone(&store), default_notify_flags());
    orchestrator.handle_validation(DID).await.expect("generate an alert to report on");

    let dir = tempfile::tempdir().expect("tempdir");
    let handler = ReportHandler::new(Arc::clone(&store), dir.path().to_path_buf());
    let report_name = format!("alice_{DID}_{}", Uuid::new_v4());
    handler.handle(&report_name).await.expect("report");

    let info = std::fs::read_to_string(dir.path().join(format!("{report_name}_info"))).expect("info file");
    let data = std::fs::read_to_string(dir.path().join(format!("{report_name}_data"))).expect("data file");
    let alerts = std::fs::read_to_string(dir.path().join(format!("{report_name}_alerts"))).expect("alerts file");

    let info_json: serde_json::Value = serde_json::from_str(&info).expect("info is one json object");
    assert_eq!(info_json["did"], DID);

    assert_eq!(serde_json_stream_count(&data), 2, "one json object per sample");
    assert_eq!(serde_json_stream_count(&alerts), 1, "one json object per alert");
}

/// Count top-level JSON values in a concatenated (not array-wrapped) stream.
fn serde_json_stream_count(body: &str) -> usize {
    serde_json::Deserializer::from_str(body).into_iter::<serde_json::Value>().count()
}
