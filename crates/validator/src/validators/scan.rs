// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use healthmonitor_core::domain::{Alert, AlertStatus, AlertType, DeviceSample, VitalBounds};

/// Two-pass scan over an ordered sample run (§4.C): one pass for runs where
/// the vital is `>= bounds.high`, one for runs where it is `<= bounds.low`.
/// Only the *last* run in each direction is reported; an in-progress run at
/// the end of the dataset surfaces as `AlertStatus::Active`, a run that
/// closed before the dataset ends surfaces as `AlertStatus::Resolved`.
pub fn scan_two_directions(
    did: &str,
    samples: &[DeviceSample],
    bounds: VitalBounds,
    high_type: AlertType,
    low_type: AlertType,
    extract: impl Fn(&DeviceSample) -> f64,
) -> Vec<Alert> {
    let high_runs = scan_direction(did, samples, high_type, |s| extract(s) >= bounds.high);
    let low_runs = scan_direction(did, samples, low_type, |s| extract(s) <= bounds.low);

    let last_high = high_runs.into_iter().last();
    let last_low = low_runs.into_iter().last();

    if let (Some(h), Some(l)) = (&last_high, &last_low) {
        if h.status == AlertStatus::Active && l.status == AlertStatus::Active {
            tracing::warn!(did, high = %h.alert_type, low = %l.alert_type, "same vital is simultaneously above high and below low margin");
        }
    }

    let mut out = Vec::with_capacity(2);
    out.extend(last_high);
    out.extend(last_low);
    out
}

fn scan_direction(
    did: &str,
    samples: &[DeviceSample],
    alert_type: AlertType,
    in_run: impl Fn(&DeviceSample) -> bool,
) -> Vec<Alert> {
    let mut runs = Vec::new();
    let mut current: Option<Alert> = None;

    for sample in samples {
        if in_run(sample) {
            match current.as_mut() {
                Some(alert) => alert.last_active_ts = sample.ts,
                None => {
                    current = Some(Alert {
                        did: did.to_owned(),
                        alert_type,
                        status: AlertStatus::Active,
                        created_ts: sample.ts,
                        last_active_ts: sample.ts,
                        resolved_ts: DateTime::<Utc>::UNIX_EPOCH,
                    });
                }
            }
        } else if let Some(mut alert) = current.take() {
            alert.status = AlertStatus::Resolved;
            alert.resolved_ts = sample.ts;
            runs.push(alert);
        }
    }

    if let Some(alert) = current {
        runs.push(alert);
    }

    runs
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
