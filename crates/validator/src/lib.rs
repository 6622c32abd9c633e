// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! healthmonitor-validator: the asynchronous back-end that consumes the
//! bus and runs the alert pipeline (§4.B-G).

pub mod cleanup;
pub mod config;
pub mod handler;
pub mod orchestrator;
pub mod reconciler;
pub mod report;
pub mod sms;
pub mod validators;

use std::sync::Arc;

use healthmonitor_core::bus::BusConsumer;
use healthmonitor_core::store::EsDocumentStore;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::handler::ValidatorHandlers;
use crate::orchestrator::Orchestrator;
use crate::sms::SmsGateway;

/// Run the validator until `shutdown` fires or a fatal error occurs.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let ctrl_c_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received ctrl-c, shutting down");
            ctrl_c_shutdown.cancel();
        }
    });

    let store = Arc::new(EsDocumentStore::new(config.es_host.clone()));
    let sms = SmsGateway::new(config.sms_account_sid.clone(), config.sms_auth_token.clone(), config.sms_from_number.clone());
    let orchestrator = Orchestrator::new(
        Arc::clone(&store),
        validators::from_config(&config),
        sms,
        config.validation_window(),
        config.notify_flags(),
    );
    let handlers = Arc::new(ValidatorHandlers {
        orchestrator,
        cleanup: cleanup::CleanupHandler::new(Arc::clone(&store)),
        report: report::ReportHandler::new(Arc::clone(&store), config.report_dir.clone()),
    });

    tracing::info!(
        nats_url = %config.nats_url,
        consumer_group = %config.consumer_group,
        worker_count = config.worker_count,
        "starting healthmonitor-validator"
    );

    let consumer = BusConsumer::connect(&config.nats_url, &config.consumer_group, config.worker_count).await?;
    consumer.run(handlers, shutdown).await?;

    tracing::info!("healthmonitor-validator shut down cleanly");
    Ok(())
}
