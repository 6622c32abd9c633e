// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed enum of alert kinds: one per vital, one per direction.
///
/// `#[serde(rename)]` pins the wire string to the same spelling as
/// [`AlertType::as_str`] (and the ES `alert_type` field / the original's
/// `ALERT_TYPE_*` constants) so a report bundle's serialized `Alert` and a
/// store document agree, instead of serde's default variant-name spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertType {
    #[serde(rename = "TEMPERATURE_HIGH")]
    TempHigh,
    #[serde(rename = "TEMPERATURE_LOW")]
    TempLow,
    #[serde(rename = "HEARTRATE_HIGH")]
    HeartrateHigh,
    #[serde(rename = "HEARTRATE_LOW")]
    HeartrateLow,
    #[serde(rename = "ECG_HIGH")]
    EcgHigh,
    #[serde(rename = "ECG_LOW")]
    EcgLow,
    #[serde(rename = "SPO2_HIGH")]
    Spo2High,
    #[serde(rename = "SPO2_LOW")]
    Spo2Low,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TempHigh => "TEMPERATURE_HIGH",
            Self::TempLow => "TEMPERATURE_LOW",
            Self::HeartrateHigh => "HEARTRATE_HIGH",
            Self::HeartrateLow => "HEARTRATE_LOW",
            Self::EcgHigh => "ECG_HIGH",
            Self::EcgLow => "ECG_LOW",
            Self::Spo2High => "SPO2_HIGH",
            Self::Spo2Low => "SPO2_LOW",
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "RESOLVED")]
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Resolved => "RESOLVED",
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{did, alertType, status, createdTs, lastActiveTs, resolvedTs}`.
///
/// `resolvedTs` is the Unix-epoch instant while `status == Active`; invariant
/// 2 requires `resolvedTs >= lastActiveTs >= createdTs` once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub did: String,
    pub alert_type: AlertType,
    pub status: AlertStatus,
    pub created_ts: DateTime<Utc>,
    pub last_active_ts: DateTime<Utc>,
    pub resolved_ts: DateTime<Utc>,
}

impl Alert {
    /// Document id for the `device-alerts` index: `<did>_<alertType>_<createdTsUnix>`.
    ///
    /// This is the single idempotency key every upsert keys on; it never
    /// changes after creation because `created_ts` is immutable.
    pub fn doc_id(&self) -> String {
        format!("{}_{}_{}", self.did, self.alert_type, self.created_ts.timestamp())
    }
}

/// `{CREATED, CONTINUED, RESOLVED}` — the Reconciler's output. The docId is
/// precomputed so the store adapter can apply each update without a read.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertUpdate {
    Created { doc_id: String, alert: Alert },
    Continued { doc_id: String, alert: Alert },
    Resolved { doc_id: String, alert: Alert },
}

impl AlertUpdate {
    pub fn doc_id(&self) -> &str {
        match self {
            Self::Created { doc_id, .. } | Self::Continued { doc_id, .. } | Self::Resolved { doc_id, .. } => {
                doc_id
            }
        }
    }

    pub fn alert(&self) -> &Alert {
        match self {
            Self::Created { alert, .. } | Self::Continued { alert, .. } | Self::Resolved { alert, .. } => {
                alert
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created { .. } => "CREATED",
            Self::Continued { .. } => "CONTINUED",
            Self::Resolved { .. } => "RESOLVED",
        }
    }
}

#[cfg(test)]
#[path = "alert_tests.rs"]
mod tests;
