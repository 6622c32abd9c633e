// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires the three use-case handlers into [`healthmonitor_core::bus::MessageHandler`].

use chrono::{DateTime, Utc};
use healthmonitor_core::bus::MessageHandler;
use healthmonitor_core::store::DocumentStore;
use tokio_util::sync::CancellationToken;

use crate::cleanup::CleanupHandler;
use crate::orchestrator::Orchestrator;
use crate::report::ReportHandler;

pub struct ValidatorHandlers<S> {
    pub orchestrator: Orchestrator<S>,
    pub cleanup: CleanupHandler<S>,
    pub report: ReportHandler<S>,
}

impl<S: DocumentStore + 'static> MessageHandler for ValidatorHandlers<S> {
    async fn handle_validation(&self, did: String, _cancel: CancellationToken) -> anyhow::Result<()> {
        self.orchestrator.handle_validation(&did).await
    }

    async fn handle_cleanup(&self, cutoff: DateTime<Utc>, cancel: CancellationToken) -> anyhow::Result<()> {
        self.cleanup.handle(cutoff, cancel).await
    }

    async fn handle_report(&self, report_name: String, _cancel: CancellationToken) -> anyhow::Result<()> {
        self.report.handle(&report_name).await
    }
}
