// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron Emitter (§4.H): periodically publishes a `cleanup_<cutoff>`
//! message. Missed ticks during downtime are not compensated — each tick
//! uses `Utc::now()` at fire time, not a schedule accumulated while down.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use healthmonitor_core::bus::Publisher;
use tokio_util::sync::CancellationToken;

pub struct CronEmitter<P> {
    bus: P,
    tick_interval: Duration,
    max_datapoint_age: ChronoDuration,
}

impl<P: Publisher> CronEmitter<P> {
    pub fn new(bus: P, tick_interval: Duration, max_datapoint_age: ChronoDuration) -> Self {
        Self { bus, tick_interval, max_datapoint_age }
    }

    /// Run until `shutdown` fires. On stop, the ticker is halted; this
    /// function returning is the `done` signal (§4.H).
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("cron emitter stopped");
                    return;
                }
                _ = ticker.tick() => {
                    let cutoff = Utc::now() - self.max_datapoint_age;
                    if let Err(e) = self.bus.publish_cleanup(cutoff).await {
                        tracing::warn!(err = %e, "failed to publish cleanup message");
                    } else {
                        tracing::info!(cutoff = %cutoff.to_rfc3339(), "published cleanup message");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
