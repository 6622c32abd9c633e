// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use clap::Parser;
use healthmonitor_core::domain::VitalBounds;

/// Configuration for `healthmonitor-ingest`, the front-end device
/// registration/ingestion surface plus the Cron Emitter (§4.G, §4.H, §6).
#[derive(Debug, Clone, Parser)]
#[command(name = "healthmonitor-ingest", version, about)]
pub struct Config {
    /// Host to bind the HTTP listener on.
    #[arg(long, env = "HEALTHMONITOR_INGEST_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind the HTTP listener on.
    #[arg(long, env = "HEALTHMONITOR_INGEST_PORT", default_value_t = 8080)]
    pub port: u16,

    /// NATS server URL backing the Message Bus Adapter.
    #[arg(long, env = "HEALTHMONITOR_INGEST_NATS_URL", default_value = "nats://127.0.0.1:4222")]
    pub nats_url: String,

    /// Base URL of the Elasticsearch-compatible document store.
    #[arg(long, env = "HEALTHMONITOR_INGEST_ES_HOST", default_value = "http://127.0.0.1:9200")]
    pub es_host: String,

    /// Interval between Cron Emitter ticks, in seconds (§6 default 1h).
    #[arg(long, env = "HEALTHMONITOR_INGEST_CLEANUP_INTERVAL_SECS", default_value_t = 3600)]
    pub cleanup_interval_secs: u64,

    /// Maximum age of a datapoint before it is eligible for cleanup, in
    /// seconds (§6 default 7d). Each cron tick publishes
    /// `cleanup_<now - max_datapoint_age>`.
    #[arg(long, env = "HEALTHMONITOR_INGEST_MAX_DATAPOINT_AGE_SECS", default_value_t = 7 * 24 * 3600)]
    pub max_datapoint_age_secs: u64,

    /// Sanity-check bounds used by the minimalist ingest-side validator
    /// (SPEC_FULL.md Supplemented Feature 5): a batch is rejected with
    /// HTTP 400 only if every vital of every sample in it is simultaneously
    /// out of bound.
    #[arg(long, env = "HEALTHMONITOR_INGEST_TEMP_LOW", default_value_t = 35.0)]
    pub temp_low: f64,
    #[arg(long, env = "HEALTHMONITOR_INGEST_TEMP_HIGH", default_value_t = 38.0)]
    pub temp_high: f64,

    #[arg(long, env = "HEALTHMONITOR_INGEST_HEARTRATE_LOW", default_value_t = 60.0)]
    pub heartrate_low: f64,
    #[arg(long, env = "HEALTHMONITOR_INGEST_HEARTRATE_HIGH", default_value_t = 100.0)]
    pub heartrate_high: f64,

    #[arg(long, env = "HEALTHMONITOR_INGEST_ECG_LOW", default_value_t = 60.0)]
    pub ecg_low: f64,
    #[arg(long, env = "HEALTHMONITOR_INGEST_ECG_HIGH", default_value_t = 100.0)]
    pub ecg_high: f64,

    #[arg(long, env = "HEALTHMONITOR_INGEST_SPO2_LOW", default_value_t = 94.0)]
    pub spo2_low: f64,
    #[arg(long, env = "HEALTHMONITOR_INGEST_SPO2_HIGH", default_value_t = 100.0)]
    pub spo2_high: f64,

    /// Log format (json or text).
    #[arg(long, env = "HEALTHMONITOR_INGEST_LOG_FORMAT", default_value = "json")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "HEALTHMONITOR_INGEST_LOG_LEVEL", default_value = "info")]
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
        if self.cleanup_interval_secs == 0 {
            anyhow::bail!("--cleanup-interval-secs must be at least 1");
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

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    pub fn max_datapoint_age(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.max_datapoint_age_secs as i64)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
