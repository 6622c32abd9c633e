// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable vital-sign measurement from a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSample {
    pub did: String,
    pub ts: DateTime<Utc>,
    pub temperature: f64,
    pub heart_rate: f64,
    pub ecg: f64,
    pub spo2: f64,
}

impl DeviceSample {
    /// Document id for the `device-data` index: `<did>_<ts>`.
    pub fn doc_id(&self) -> String {
        format!("{}_{}", self.did, self.ts.to_rfc3339())
    }
}

#[cfg(test)]
#[path = "sample_tests.rs"]
mod tests;
