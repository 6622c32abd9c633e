// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fetch side of the Message Bus Adapter (§4.B).
//!
//! A durable JetStream pull consumer plays the role of the source's Kafka
//! consumer group: parallel replicas of `healthmonitor-validator` sharing
//! the same `consumer_group` name compete for messages across the
//! wildcard subject (§6). One fetch task pulls and acks messages, handing
//! each to a bounded channel of capacity `worker_count`; `worker_count`
//! worker tasks drain that channel and classify+dispatch via
//! [`MessageHandler`].
//!
//! Acking happens *before* the message is handed to a worker — the
//! at-most-once choice spec.md §4.B requires: duplicate work (SMS sends,
//! scroll exports) is more expensive than the rare lost message, and every
//! downstream write is idempotent on `docId` anyway.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use super::error::BusError;
use super::message::BusMessage;
use super::subject::wildcard_subject;

/// Capability implemented by the validator binary: one method per message
/// shape the bus dispatches to (§4.B dispatch rule).
pub trait MessageHandler: Send + Sync + 'static {
    fn handle_validation(
        &self,
        did: String,
        cancel: CancellationToken,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    fn handle_cleanup(
        &self,
        cutoff: DateTime<Utc>,
        cancel: CancellationToken,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    fn handle_report(
        &self,
        report_name: String,
        cancel: CancellationToken,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Counters exposed for observability; cheap synchronous updates only, never
/// held across an `.await`.
#[derive(Default)]
pub struct ConsumerMetrics {
    pub dispatched: AtomicU64,
    pub dropped: AtomicU64,
}

pub struct BusConsumer {
    consumer: async_nats::jetstream::consumer::PullConsumer,
    worker_count: usize,
    metrics: Arc<ConsumerMetrics>,
}

impl BusConsumer {
    /// Connect and bind a durable pull consumer named `consumer_group`
    /// (§6: "a consumer group id identifies the validator fleet").
    pub async fn connect(nats_url: &str, consumer_group: &str, worker_count: usize) -> Result<Self, BusError> {
        let client = async_nats::connect(nats_url).await.map_err(|e| BusError::Unavailable(e.to_string()))?;
        let jetstream = async_nats::jetstream::new(client);
        let stream = jetstream
            .get_or_create_stream(async_nats::jetstream::stream::Config {
                name: "HEALTHMONITOR_VALIDATION".to_owned(),
                subjects: vec![wildcard_subject()],
                ..Default::default()
            })
            .await
            .map_err(|e| BusError::Unavailable(e.to_string()))?;

        let consumer = stream
            .get_or_create_consumer(
                consumer_group,
                async_nats::jetstream::consumer::pull::Config {
                    durable_name: Some(consumer_group.to_owned()),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| BusError::Unavailable(e.to_string()))?;

        Ok(Self { consumer, worker_count: worker_count.max(1), metrics: Arc::new(ConsumerMetrics::default()) })
    }

    pub fn metrics(&self) -> Arc<ConsumerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run fetch + dispatch until `shutdown` fires. Shutdown is a two-step
    /// close-then-drain (§4.B, §5): the fetch loop exits first, then the
    /// worker channel is closed and in-flight + already-buffered messages
    /// are allowed to drain before this returns.
    pub async fn run<H: MessageHandler>(self, handler: Arc<H>, shutdown: CancellationToken) -> Result<(), BusError> {
        let (tx, rx) = mpsc::channel::<async_nats::jetstream::Message>(self.worker_count);
        let rx = Arc::new(Mutex::new(rx));

        let mut workers = Vec::with_capacity(self.worker_count);
        for _ in 0..self.worker_count {
            let rx = Arc::clone(&rx);
            let handler = Arc::clone(&handler);
            let shutdown = shutdown.clone();
            let metrics = Arc::clone(&self.metrics);
            workers.push(tokio::spawn(async move {
                loop {
                    let next = rx.lock().await.recv().await;
                    let Some(msg) = next else { break };
                    dispatch(handler.as_ref(), msg, shutdown.clone(), &metrics).await;
                }
            }));
        }

        let mut messages = self
            .consumer
            .messages()
            .await
            .map_err(|e| BusError::Unavailable(e.to_string()))?;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                next = messages.next() => {
                    let Some(received) = next else { break };
                    let msg = match received {
                        Ok(msg) => msg,
                        Err(e) => {
                            tracing::warn!(err = %e, "bus fetch error");
                            continue;
                        }
                    };
                    // Commit before dispatch: at-most-once (§4.B).
                    if let Err(e) = msg.ack().await {
                        tracing::warn!(err = ?e, "failed to ack message, skipping to avoid redelivery ambiguity");
                        continue;
                    }
                    if tx.send(msg).await.is_err() {
                        break;
                    }
                }
            }
        }

        drop(tx);
        for worker in workers {
            let _ = worker.await;
        }
        Ok(())
    }
}

async fn dispatch<H: MessageHandler>(
    handler: &H,
    msg: async_nats::jetstream::Message,
    cancel: CancellationToken,
    metrics: &ConsumerMetrics,
) {
    let payload = match std::str::from_utf8(&msg.payload) {
        Ok(p) => p,
        Err(_) => {
            metrics.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("dropped non-UTF8 bus payload");
            return;
        }
    };

    let parsed = BusMessage::parse(payload);
    metrics.dispatched.fetch_add(1, Ordering::Relaxed);

    let result = match parsed {
        Ok(BusMessage::Validation { did }) => handler.handle_validation(did, cancel).await,
        Ok(BusMessage::Cleanup { cutoff }) => handler.handle_cleanup(cutoff, cancel).await,
        Ok(BusMessage::ReportGeneration { report_name }) => {
            handler.handle_report(report_name, cancel).await
        }
        Err(e) => {
            metrics.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(err = %e, "dropped unrecognized bus message");
            return;
        }
    };

    if let Err(e) = result {
        tracing::warn!(payload, err = %e, "handler returned an error; offset already committed, moving on");
    }
}
