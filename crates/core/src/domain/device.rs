// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mutable per-device record. `did` is both the document id and the routing key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub did: String,
    pub last_seen_ts: DateTime<Utc>,
    pub last_validation_ts: DateTime<Utc>,
    pub patient_name: String,
    /// No duplicates; enforced by `subscribe_phone`, not by the type itself.
    pub subscribed_phones: Vec<String>,
}

impl DeviceInfo {
    pub fn new(did: impl Into<String>, patient_name: impl Into<String>) -> Self {
        let zero = DateTime::<Utc>::UNIX_EPOCH;
        Self {
            did: did.into(),
            last_seen_ts: zero,
            last_validation_ts: zero,
            patient_name: patient_name.into(),
            subscribed_phones: Vec::new(),
        }
    }

    /// Advance `last_seen_ts` to `ts` if `ts` is strictly newer (invariant 5).
    pub fn observe_sample_ts(&mut self, ts: DateTime<Utc>) {
        if ts > self.last_seen_ts {
            self.last_seen_ts = ts;
        }
    }

    pub fn subscribe_phone(&mut self, phone: impl Into<String>) {
        let phone = phone.into();
        if !self.subscribed_phones.iter().any(|p| p == &phone) {
            self.subscribed_phones.push(phone);
        }
    }
}

/// Partial update accepted by `DocumentStore::update_device_info`.
///
/// Every field is optional; absent fields are left untouched. Fails if the
/// target document does not exist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceInfoPatch {
    pub last_seen_ts: Option<DateTime<Utc>>,
    pub last_validation_ts: Option<DateTime<Utc>>,
    pub patient_name: Option<String>,
    pub subscribed_phones: Option<Vec<String>>,
}

#[cfg(test)]
#[path = "device_tests.rs"]
mod tests;
