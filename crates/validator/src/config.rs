// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use healthmonitor_core::domain::VitalBounds;

use crate::orchestrator::NotifyFlags;

/// Configuration for `healthmonitor-validator`, the asynchronous back-end
/// that consumes the bus and runs the alert pipeline (§4, §6).
#[derive(Debug, Clone, Parser)]
#[command(name = "healthmonitor-validator", version, about)]
pub struct Config {
    /// NATS server URL backing the Message Bus Adapter.
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_NATS_URL", default_value = "nats://127.0.0.1:4222")]
    pub nats_url: String,

    /// Durable consumer / consumer-group name identifying the validator fleet (§6).
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_CONSUMER_GROUP", default_value = "healthmonitorvalidator")]
    pub consumer_group: String,

    /// Number of worker coroutines draining the dispatch channel (§4.B, §6 default 1).
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_WORKER_COUNT", default_value_t = 1)]
    pub worker_count: usize,

    /// Base URL of the Elasticsearch-compatible document store.
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_ES_HOST", default_value = "http://127.0.0.1:9200")]
    pub es_host: String,

    /// Twilio-like SMS gateway account SID.
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_SMS_ACCOUNT_SID", default_value = "")]
    pub sms_account_sid: String,

    /// Twilio-like SMS gateway auth token.
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_SMS_AUTH_TOKEN", default_value = "")]
    pub sms_auth_token: String,

    /// Sender phone number for outbound SMS alerts.
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_SMS_FROM_NUMBER", default_value = "")]
    pub sms_from_number: String,

    /// Validation look-back window in seconds (§6 default 1h).
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_VALIDATION_WINDOW_SECS", default_value_t = 3600)]
    pub validation_window_secs: u64,

    /// Directory report bundles are written to (§4.G).
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_REPORT_DIR", default_value = "./reports")]
    pub report_dir: PathBuf,

    /// Notify subscribers when an alert is newly CREATED (§6 default true).
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_NOTIFY_CREATED", default_value_t = true)]
    pub notify_created: bool,

    /// Notify subscribers when an alert CONTINUES (§6 default false).
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_NOTIFY_CONTINUED", default_value_t = false)]
    pub notify_continued: bool,

    /// Notify subscribers when an alert is RESOLVED (§6 default false).
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_NOTIFY_RESOLVED", default_value_t = false)]
    pub notify_resolved: bool,

    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_TEMP_LOW", default_value_t = 35.0)]
    pub temp_low: f64,
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_TEMP_HIGH", default_value_t = 38.0)]
    pub temp_high: f64,

    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_HEARTRATE_LOW", default_value_t = 60.0)]
    pub heartrate_low: f64,
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_HEARTRATE_HIGH", default_value_t = 100.0)]
    pub heartrate_high: f64,

    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_ECG_LOW", default_value_t = 60.0)]
    pub ecg_low: f64,
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_ECG_HIGH", default_value_t = 100.0)]
    pub ecg_high: f64,

    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_SPO2_LOW", default_value_t = 94.0)]
    pub spo2_low: f64,
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_SPO2_HIGH", default_value_t = 100.0)]
    pub spo2_high: f64,

    /// Log format (json or text).
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_LOG_FORMAT", default_value = "json")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "HEALTHMONITOR_VALIDATOR_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, bounds) in [
            ("temp", self.temp_bounds()),
            ("heartrate", self.heartrate_bounds()),
            ("ecg", self.ecg_bounds()),
            ("spo2", self.spo2_bounds()),
        ] {
            if !(bounds.low < bounds.high) {
                anyhow::bail!("--{name}-low must be strictly less than --{name}-high");
            }
        }
        if self.worker_count == 0 {
            anyhow::bail!("--worker-count must be at least 1");
        }
        Ok(())
    }

    pub fn temp_bounds(&self) -> VitalBounds {
        VitalBounds { low: self.temp_low, high: self.temp_high }
    }

    pub fn heartrate_bounds(&self) -> VitalBounds {
        VitalBounds { low: self.heartrate_low, high: self.heartrate_high }
    }

    pub fn ecg_bounds(&self) -> VitalBounds {
        VitalBounds { low: self.ecg_low, high: self.ecg_high }
    }

    pub fn spo2_bounds(&self) -> VitalBounds {
        VitalBounds { low: self.spo2_low, high: self.spo2_high }
    }

    pub fn validation_window(&self) -> Duration {
        Duration::from_secs(self.validation_window_secs)
    }

    pub fn notify_flags(&self) -> NotifyFlags {
        NotifyFlags {
            send_created: self.notify_created,
            send_continued: self.notify_continued,
            send_resolved: self.notify_resolved,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
