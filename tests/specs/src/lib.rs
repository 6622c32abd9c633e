// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenario tests for spec.md §8, run in-process against
//! [`InMemoryStore`]/[`InMemoryPublisher`] fakes rather than a live
//! Elasticsearch/NATS cluster (no client SDK for either exists in this
//! workspace's dependency stack to test against in isolation, and spec.md
//! §1 treats both as external collaborators with a documented contract —
//! see SPEC_FULL.md's Test tooling section).

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use healthmonitor_core::domain::{DeviceSample, Validator, VitalBounds};
use healthmonitor_core::store::InMemoryStore;
use healthmonitor_validator::orchestrator::{NotifyFlags, Orchestrator};
use healthmonitor_validator::sms::SmsGateway;
use healthmonitor_validator::validators::TemperatureValidator;

pub const DID: &str = "d1";

pub fn temp_bounds() -> VitalBounds {
    VitalBounds { low: 35.0, high: 38.0 }
}

/// Orchestrator wired with only the temperature validator, matching the
/// scenarios in spec.md §8 which all exercise temperature.
pub fn temperature_only_orchestrator(store: Arc<InMemoryStore>, notify: NotifyFlags) -> Orchestrator<InMemoryStore> {
    let validators: Vec<Box<dyn Validator>> = vec![Box::new(TemperatureValidator::new(temp_bounds()))];
    // Account SID/token are never dialed out in these tests: notify flags
    // are false by default, and the phone list is empty unless a scenario
    // opts in.
    let sms = SmsGateway::new("test-sid", "test-token", "+15550000");
    Orchestrator::new(store, validators, sms, Duration::from_secs(3600), notify)
}

pub fn default_notify_flags() -> NotifyFlags {
    NotifyFlags { send_created: true, send_continued: false, send_resolved: false }
}

pub fn sample(ts: DateTime<Utc>, temperature: f64) -> DeviceSample {
    DeviceSample { did: DID.to_owned(), ts, temperature, heart_rate: 70.0, ecg: 70.0, spo2: 98.0 }
}

/// Rewind `last_validation_ts` past the debounce window so the next
/// `handle_validation` call is guaranteed to do real work, modeling "more
/// than 5 seconds have passed" without sleeping in the test.
pub async fn clear_debounce(store: &InMemoryStore) {
    use healthmonitor_core::domain::DeviceInfoPatch;
    store
        .update_device_info(DID, &DeviceInfoPatch { last_validation_ts: Some(DateTime::<Utc>::UNIX_EPOCH), ..Default::default() })
        .await
        .expect("reset debounce");
}

pub fn minutes_ago(n: i64) -> DateTime<Utc> {
    Utc::now() - ChronoDuration::minutes(n)
}
