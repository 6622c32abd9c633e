// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validation Orchestrator (§4.E): the per-`validation_<did>` pipeline —
//! debounce, fetch window, fan the four validators out, reconcile against
//! active alerts, persist, notify.
//!
//! The debounce guard is a single process-wide [`tokio::sync::Mutex`], not
//! [`parking_lot`]: the critical section spans the store's `get_device_info`
//! / `update_device_info` calls, both of which `.await`, and a sync mutex
//! cannot be held across an await point without risking a deadlock on a
//! single-threaded executor. This is the one place in the workspace where
//! the teacher's usual `parking_lot::Mutex` would be the wrong tool (see
//! DESIGN.md).

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use healthmonitor_core::domain::{AlertUpdate, DeviceDataset, DeviceInfoPatch, Validator};
use healthmonitor_core::store::{DocumentStore, StoreError};
use tokio::sync::Mutex;

use crate::reconciler::reconcile;
use crate::sms::{SmsError, SmsGateway};

/// Minimum time between two validation runs for the same device (§4.E,
/// §9). Not configurable: it is a debounce window, not a policy knob.
pub const MIN_REVALIDATION_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
pub struct NotifyFlags {
    pub send_created: bool,
    pub send_continued: bool,
    pub send_resolved: bool,
}

pub struct Orchestrator<S> {
    store: Arc<S>,
    validators: Vec<Box<dyn Validator>>,
    sms: SmsGateway,
    validation_window: Duration,
    notify: NotifyFlags,
    debounce: Mutex<()>,
}

impl<S: DocumentStore> Orchestrator<S> {
    pub fn new(
        store: Arc<S>,
        validators: Vec<Box<dyn Validator>>,
        sms: SmsGateway,
        validation_window: Duration,
        notify: NotifyFlags,
    ) -> Self {
        Self { store, validators, sms, validation_window, notify, debounce: Mutex::new(()) }
    }

    /// Drive one `validation_<did>` message through the full pipeline.
    pub async fn handle_validation(&self, did: &str) -> anyhow::Result<()> {
        let now = Utc::now();

        let should_run = {
            // Single process-wide lock (§4.E): independent of any per-device
            // locking the store or bus may do, and held across the
            // read-then-write that enforces the debounce window.
            let _guard = self.debounce.lock().await;
            let info = match self.store.get_device_info(did).await {
                Ok(info) => info,
                Err(StoreError::NotFound) => {
                    tracing::info!(did, "device vanished between publish and consume, skipping");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            let elapsed = now.signed_duration_since(info.last_validation_ts);
            let min_interval = chrono::Duration::from_std(MIN_REVALIDATION_INTERVAL)
                .unwrap_or(chrono::Duration::zero());
            if elapsed <= min_interval {
                false
            } else {
                let patch = DeviceInfoPatch { last_validation_ts: Some(now), ..Default::default() };
                self.store.update_device_info(did, &patch).await?;
                true
            }
        };

        if !should_run {
            tracing::debug!(did, "debounced, skipping this validation run");
            return Ok(());
        }

        let window = chrono::Duration::from_std(self.validation_window).unwrap_or(chrono::Duration::zero());
        let from = now - window;
        let samples = self.store.get_device_data(did, from, now).await?;
        let dataset = DeviceDataset { did: did.to_owned(), samples };

        let mut candidates = Vec::new();
        for validator in &self.validators {
            candidates.extend(validator.check_data(&dataset));
        }

        let active = self.store.get_active_alerts(did).await?;
        let updates = reconcile(did, &active, &candidates);

        if updates.is_empty() {
            return Ok(());
        }

        self.store.apply_alert_updates(&updates).await?;
        self.notify_subscribers(did, &updates).await
    }

    async fn notify_subscribers(&self, did: &str, updates: &[AlertUpdate]) -> anyhow::Result<()> {
        let notify_worthy: Vec<_> = updates
            .iter()
            .filter(|u| self.should_notify(u))
            .map(|u| u.alert().clone())
            .collect();
        if notify_worthy.is_empty() {
            return Ok(());
        }

        let info = self.store.get_device_info(did).await?;
        if info.subscribed_phones.is_empty() {
            return Ok(());
        }

        let mut failed = Vec::new();
        for phone in &info.subscribed_phones {
            if let Err(e) = self.sms.send_alerts(phone, did, &notify_worthy).await {
                tracing::warn!(did, phone, err = %e, "sms send failed");
                failed.push(phone.clone());
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(SmsError::aggregate(failed).into())
        }
    }

    fn should_notify(&self, update: &AlertUpdate) -> bool {
        match update {
            AlertUpdate::Created { .. } => self.notify.send_created,
            AlertUpdate::Continued { .. } => self.notify.send_continued,
            AlertUpdate::Resolved { .. } => self.notify.send_resolved,
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
