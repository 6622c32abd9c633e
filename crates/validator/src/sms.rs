// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SMS gateway (§4.E step 8): a Twilio-like HTTP client sending one text
//! message per subscribed phone, listing every alert in the notified batch.

use std::fmt;
use std::time::Duration;

use healthmonitor_core::domain::Alert;

const ROW_HEADER: &str = "ALERT_TYPE --- STATUS --- START TIME\n";

#[derive(Debug)]
pub enum SmsError {
    /// A single send failed; carries the HTTP status if one was received.
    Rejected { phone: String, status: Option<u16> },
    Unavailable(String),
    /// Aggregate of per-phone failures raised by the orchestrator fan-out.
    Aggregate(Vec<String>),
}

impl SmsError {
    pub fn aggregate(failed_phones: Vec<String>) -> Self {
        Self::Aggregate(failed_phones)
    }
}

impl fmt::Display for SmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { phone, status: Some(status) } => {
                write!(f, "failed to send text message to {phone}, got status {status}")
            }
            Self::Rejected { phone, status: None } => {
                write!(f, "failed to send text message to {phone}")
            }
            Self::Unavailable(msg) => write!(f, "sms gateway unavailable: {msg}"),
            Self::Aggregate(phones) => write!(f, "failed to notify {} phone(s): {}", phones.len(), phones.join(", ")),
        }
    }
}

impl std::error::Error for SmsError {}

/// Thin client over a single Twilio-compatible account/number.
pub struct SmsGateway {
    client: reqwest::Client,
    url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl SmsGateway {
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>, from_number: impl Into<String>) -> Self {
        let account_sid = account_sid.into();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        let url = format!("https://api.twilio.com/2010-04-01/Accounts/{account_sid}/Messages.json");
        Self { client, url, account_sid, auth_token: auth_token.into(), from_number: from_number.into() }
    }

    pub async fn send_alerts(&self, to: &str, did: &str, alerts: &[Alert]) -> Result<(), SmsError> {
        let body = message_body(did, alerts);
        let resp = self
            .client
            .post(&self.url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .header("Accept", "application/json")
            .form(&[("To", to), ("From", &self.from_number), ("Body", &body)])
            .send()
            .await
            .map_err(|e| SmsError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SmsError::Rejected { phone: to.to_owned(), status: Some(resp.status().as_u16()) });
        }
        Ok(())
    }
}

fn message_body(did: &str, alerts: &[Alert]) -> String {
    let mut message = format!("WARNING! You have active alerts for device {did} from HEALTHMONITOR!\n");
    message.push_str(ROW_HEADER);
    for alert in alerts {
        message.push_str(&format!("{} --- {} --- {}\n", alert.alert_type, alert.status, alert.created_ts.to_rfc3339()));
    }
    message
}

#[cfg(test)]
#[path = "sms_tests.rs"]
mod tests;
