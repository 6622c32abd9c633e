// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Alert Reconciler (§4.D): diffs active alerts against this run's
//! candidates and emits CREATED/CONTINUED/RESOLVED updates.
//!
//! | active? | candidate status | emit      | createdTs source |
//! |---------|-------------------|-----------|-------------------|
//! | yes     | Active            | CONTINUED | active's          |
//! | yes     | Resolved          | RESOLVED  | active's          |
//! | no      | Active             | CREATED   | candidate's       |
//! | no      | Resolved          | (nothing) | -                 |

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use healthmonitor_core::domain::{Alert, AlertStatus, AlertType, AlertUpdate};

/// Pure diff; no I/O. Both inputs are expected to already be scoped to a
/// single `did`. Duplicate alert types within either slice are logged and
/// only the first occurrence is kept, matching the upstream generator's
/// "got duplicate alert" warning.
pub fn reconcile(did: &str, active: &[Alert], candidates: &[Alert]) -> Vec<AlertUpdate> {
    let active_by_type = index_by_type(did, active, "active");
    let candidate_by_type = index_by_type(did, candidates, "candidate");

    let mut updates: Vec<AlertUpdate> = candidate_by_type
        .into_iter()
        .filter_map(|(alert_type, candidate)| {
            match (active_by_type.get(&alert_type), candidate.status) {
                (Some(existing), AlertStatus::Active) => {
                    let alert = Alert { created_ts: existing.created_ts, ..candidate.clone() };
                    Some(AlertUpdate::Continued { doc_id: alert.doc_id(), alert })
                }
                (Some(existing), AlertStatus::Resolved) => {
                    let alert = Alert { created_ts: existing.created_ts, ..candidate.clone() };
                    Some(AlertUpdate::Resolved { doc_id: alert.doc_id(), alert })
                }
                (None, AlertStatus::Active) => {
                    Some(AlertUpdate::Created { doc_id: candidate.doc_id(), alert: candidate.clone() })
                }
                (None, AlertStatus::Resolved) => None,
            }
        })
        .collect();

    updates.sort_by(|a, b| a.doc_id().cmp(b.doc_id()));
    updates
}

fn index_by_type<'a>(did: &str, alerts: &'a [Alert], which: &str) -> HashMap<AlertType, &'a Alert> {
    let mut map = HashMap::new();
    for alert in alerts {
        match map.entry(alert.alert_type) {
            Entry::Occupied(existing) => {
                tracing::warn!(
                    did,
                    alert_type = %alert.alert_type,
                    which,
                    prior_created_ts = %existing.get().created_ts,
                    "duplicate alert of same type, keeping first seen",
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(alert);
            }
        }
    }
    map
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
