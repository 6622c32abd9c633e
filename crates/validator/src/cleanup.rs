// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cleanup Handler (§4.F): delegates straight to the store adapter once the
//! `cleanup_<RFC3339>` payload has already been parsed into a cutoff by
//! [`healthmonitor_core::bus::BusMessage`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use healthmonitor_core::store::DocumentStore;
use tokio_util::sync::CancellationToken;

pub struct CleanupHandler<S> {
    store: Arc<S>,
}

impl<S: DocumentStore> CleanupHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cutoff: DateTime<Utc>, cancel: CancellationToken) -> anyhow::Result<()> {
        tracing::info!(cutoff = %cutoff.to_rfc3339(), "starting cleanup");
        self.store.cleanup_data_before(cutoff, cancel).await?;
        tracing::info!(cutoff = %cutoff.to_rfc3339(), "cleanup complete");
        Ok(())
    }
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
