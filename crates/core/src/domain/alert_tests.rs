// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

fn alert(alert_type: AlertType, status: AlertStatus) -> Alert {
    let created = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    Alert {
        did: "d1".to_owned(),
        alert_type,
        status,
        created_ts: created,
        last_active_ts: created,
        resolved_ts: DateTime::<Utc>::UNIX_EPOCH,
    }
}

#[test]
fn doc_id_is_deterministic_from_type_and_created_ts() {
    let a = alert(AlertType::TempHigh, AlertStatus::Active);
    assert_eq!(a.doc_id(), "d1_TEMPERATURE_HIGH_1700000000");
}

#[yare::parameterized(
    created = { AlertUpdate::Created { doc_id: "x".into(), alert: alert(AlertType::TempHigh, AlertStatus::Active) }, "CREATED" },
    continued = { AlertUpdate::Continued { doc_id: "x".into(), alert: alert(AlertType::TempHigh, AlertStatus::Active) }, "CONTINUED" },
    resolved = { AlertUpdate::Resolved { doc_id: "x".into(), alert: alert(AlertType::TempHigh, AlertStatus::Resolved) }, "RESOLVED" },
)]
fn kind_matches_variant(update: AlertUpdate, expected: &str) {
    assert_eq!(update.kind(), expected);
    assert_eq!(update.doc_id(), "x");
}
