// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publish side of the Message Bus Adapter (§4.B, §6).
//!
//! Used by `healthmonitor-ingest` to publish `validation_<did>` after a
//! sample batch lands, and `cleanup_<RFC3339>` from the Cron Emitter
//! (§4.H). The report-generation message is published by the out-of-scope
//! front-end, not by anything in this workspace, but the constructor is
//! exposed here too since it's the same subject/shape.

use std::future::Future;

use chrono::{DateTime, Utc};

use super::error::BusError;
use super::message::BusMessage;
use super::subject::{control_subject, device_subject, wildcard_subject};

/// Capability shared by the real NATS producer and test fakes: the three
/// message shapes anything upstream of the bus (ingest's HTTP handlers,
/// its Cron Emitter) can publish.
pub trait Publisher: Send + Sync {
    fn publish_validation(&self, did: &str) -> impl Future<Output = Result<(), BusError>> + Send;

    fn publish_cleanup(&self, cutoff: DateTime<Utc>) -> impl Future<Output = Result<(), BusError>> + Send;

    fn publish_report_generation(
        &self,
        report_name: &str,
    ) -> impl Future<Output = Result<(), BusError>> + Send;
}

/// Thin wrapper over a JetStream publish handle.
pub struct BusProducer {
    jetstream: async_nats::jetstream::Context,
}

impl BusProducer {
    /// Connect to NATS and ensure the stream backing `TOPIC` exists.
    pub async fn connect(nats_url: &str) -> Result<Self, BusError> {
        let client = async_nats::connect(nats_url).await.map_err(|e| BusError::Unavailable(e.to_string()))?;
        let jetstream = async_nats::jetstream::new(client);
        jetstream
            .get_or_create_stream(async_nats::jetstream::stream::Config {
                name: "HEALTHMONITOR_VALIDATION".to_owned(),
                subjects: vec![wildcard_subject()],
                ..Default::default()
            })
            .await
            .map_err(|e| BusError::Unavailable(e.to_string()))?;
        Ok(Self { jetstream })
    }

    async fn publish(&self, subject: &str, payload: String) -> Result<(), BusError> {
        let ack = self
            .jetstream
            .publish(subject.to_owned(), payload.into())
            .await
            .map_err(|e| BusError::Unavailable(e.to_string()))?;
        ack.await.map_err(|e| BusError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

impl Publisher for BusProducer {
    /// Publish `validation_<did>` to the shard `did` hashes to.
    async fn publish_validation(&self, did: &str) -> Result<(), BusError> {
        self.publish(&device_subject(did), BusMessage::validation(did)).await
    }

    /// Publish `cleanup_<cutoff>` to the control shard.
    async fn publish_cleanup(&self, cutoff: DateTime<Utc>) -> Result<(), BusError> {
        self.publish(&control_subject(), BusMessage::cleanup(cutoff)).await
    }

    /// Publish `report-generation_<name>` to the control shard.
    async fn publish_report_generation(&self, report_name: &str) -> Result<(), BusError> {
        self.publish(&control_subject(), BusMessage::report_generation(report_name)).await
    }
}

/// In-memory fake recording every published message, for tests that drive
/// the ingest HTTP handlers or the Cron Emitter without a live NATS server.
#[derive(Default)]
pub struct InMemoryPublisher {
    published: std::sync::Mutex<Vec<String>>,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every payload published so far, in publish order.
    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, payload: String) {
        self.published.lock().unwrap_or_else(|e| e.into_inner()).push(payload);
    }
}

impl Publisher for InMemoryPublisher {
    async fn publish_validation(&self, did: &str) -> Result<(), BusError> {
        self.record(BusMessage::validation(did));
        Ok(())
    }

    async fn publish_cleanup(&self, cutoff: DateTime<Utc>) -> Result<(), BusError> {
        self.record(BusMessage::cleanup(cutoff));
        Ok(())
    }

    async fn publish_report_generation(&self, report_name: &str) -> Result<(), BusError> {
        self.record(BusMessage::report_generation(report_name));
        Ok(())
    }
}

#[cfg(test)]
#[path = "producer_tests.rs"]
mod tests;
