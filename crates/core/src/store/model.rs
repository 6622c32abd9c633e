// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire shapes for the three Elasticsearch indices, separate from the
//! domain types so a reshape of the index mapping doesn't ripple through
//! validator/reconciler logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Alert, AlertStatus, AlertType, DeviceInfo, DeviceSample};

pub(super) const DEVICE_INFO_INDEX: &str = "device-info";
pub(super) const DEVICE_DATA_INDEX: &str = "device-data";
pub(super) const DEVICE_ALERTS_INDEX: &str = "device-alerts";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct DeviceInfoEs {
    pub did: String,
    pub last_seen_ts: DateTime<Utc>,
    pub last_validation_ts: DateTime<Utc>,
    pub patient_name: String,
    pub subscribed_phones: Vec<String>,
}

impl From<&DeviceInfo> for DeviceInfoEs {
    fn from(info: &DeviceInfo) -> Self {
        Self {
            did: info.did.clone(),
            last_seen_ts: info.last_seen_ts,
            last_validation_ts: info.last_validation_ts,
            patient_name: info.patient_name.clone(),
            subscribed_phones: info.subscribed_phones.clone(),
        }
    }
}

impl From<DeviceInfoEs> for DeviceInfo {
    fn from(es: DeviceInfoEs) -> Self {
        Self {
            did: es.did,
            last_seen_ts: es.last_seen_ts,
            last_validation_ts: es.last_validation_ts,
            patient_name: es.patient_name,
            subscribed_phones: es.subscribed_phones,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct DeviceSampleEs {
    pub did: String,
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub heart_rate: f64,
    pub ecg: f64,
    pub spo2: f64,
}

impl From<&DeviceSample> for DeviceSampleEs {
    fn from(s: &DeviceSample) -> Self {
        Self {
            did: s.did.clone(),
            timestamp: s.ts,
            temperature: s.temperature,
            heart_rate: s.heart_rate,
            ecg: s.ecg,
            spo2: s.spo2,
        }
    }
}

impl From<DeviceSampleEs> for DeviceSample {
    fn from(es: DeviceSampleEs) -> Self {
        Self {
            did: es.did,
            ts: es.timestamp,
            temperature: es.temperature,
            heart_rate: es.heart_rate,
            ecg: es.ecg,
            spo2: es.spo2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct AlertEs {
    pub did: String,
    pub alert_type: String,
    pub status: String,
    pub created_ts: DateTime<Utc>,
    pub last_active_ts: DateTime<Utc>,
    pub resolved_ts: DateTime<Utc>,
}

impl From<&Alert> for AlertEs {
    fn from(a: &Alert) -> Self {
        Self {
            did: a.did.clone(),
            alert_type: a.alert_type.as_str().to_owned(),
            status: a.status.as_str().to_owned(),
            created_ts: a.created_ts,
            last_active_ts: a.last_active_ts,
            resolved_ts: a.resolved_ts,
        }
    }
}

impl TryFrom<AlertEs> for Alert {
    type Error = super::StoreError;

    fn try_from(es: AlertEs) -> Result<Self, Self::Error> {
        let alert_type = parse_alert_type(&es.alert_type)?;
        let status = match es.status.as_str() {
            "ACTIVE" => AlertStatus::Active,
            "RESOLVED" => AlertStatus::Resolved,
            other => return Err(super::StoreError::Other(format!("unknown alert status: {other}"))),
        };
        Ok(Self {
            did: es.did,
            alert_type,
            status,
            created_ts: es.created_ts,
            last_active_ts: es.last_active_ts,
            resolved_ts: es.resolved_ts,
        })
    }
}

fn parse_alert_type(s: &str) -> Result<AlertType, super::StoreError> {
    match s {
        "TEMPERATURE_HIGH" => Ok(AlertType::TempHigh),
        "TEMPERATURE_LOW" => Ok(AlertType::TempLow),
        "HEARTRATE_HIGH" => Ok(AlertType::HeartrateHigh),
        "HEARTRATE_LOW" => Ok(AlertType::HeartrateLow),
        "ECG_HIGH" => Ok(AlertType::EcgHigh),
        "ECG_LOW" => Ok(AlertType::EcgLow),
        "SPO2_HIGH" => Ok(AlertType::Spo2High),
        "SPO2_LOW" => Ok(AlertType::Spo2Low),
        other => Err(super::StoreError::Other(format!("unknown alert type: {other}"))),
    }
}
