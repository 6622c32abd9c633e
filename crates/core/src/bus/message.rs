// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};

use super::error::BusError;

const VALIDATION_PREFIX: &str = "validation_";
const CLEANUP_PREFIX: &str = "cleanup_";
const REPORT_PREFIX: &str = "report-generation_";

/// The three payload shapes a `validation_<did>` / `cleanup_<RFC3339>` /
/// `report-generation_<name>` message can take. Classification is by
/// prefix of the raw ASCII payload (§4.B); anything else is dropped by the
/// caller, not represented here.
#[derive(Debug, Clone, PartialEq)]
pub enum BusMessage {
    Validation { did: String },
    Cleanup { cutoff: DateTime<Utc> },
    ReportGeneration { report_name: String },
}

impl BusMessage {
    pub fn parse(payload: &str) -> Result<Self, BusError> {
        if let Some(did) = payload.strip_prefix(VALIDATION_PREFIX) {
            if did.is_empty() {
                return Err(BusError::MalformedPayload(payload.to_owned()));
            }
            return Ok(Self::Validation { did: did.to_owned() });
        }
        if let Some(ts) = payload.strip_prefix(CLEANUP_PREFIX) {
            let cutoff = DateTime::parse_from_rfc3339(ts)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| BusError::MalformedPayload(payload.to_owned()))?;
            return Ok(Self::Cleanup { cutoff });
        }
        if let Some(name) = payload.strip_prefix(REPORT_PREFIX) {
            if name.is_empty() {
                return Err(BusError::MalformedPayload(payload.to_owned()));
            }
            return Ok(Self::ReportGeneration { report_name: name.to_owned() });
        }
        Err(BusError::UnknownPrefix(payload.to_owned()))
    }

    pub fn validation(did: impl Into<String>) -> String {
        format!("{VALIDATION_PREFIX}{}", did.into())
    }

    pub fn cleanup(cutoff: DateTime<Utc>) -> String {
        format!("{CLEANUP_PREFIX}{}", cutoff.to_rfc3339())
    }

    pub fn report_generation(report_name: impl Into<String>) -> String {
        format!("{REPORT_PREFIX}{}", report_name.into())
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
