// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! healthmonitor-ingest: the front-end device registration/sample
//! ingestion surface plus the Cron Emitter (§4.G-H of the distilled
//! spec; "out of scope for deep design" per spec.md §1, but required for
//! the system to have an entry point — see SPEC_FULL.md).

pub mod config;
pub mod cron;
pub mod error;
pub mod http;
pub mod sanity;

use std::sync::Arc;

use healthmonitor_core::bus::BusProducer;
use healthmonitor_core::store::EsDocumentStore;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::cron::CronEmitter;
use crate::http::IngestState;
use crate::sanity::SanityBounds;

/// Run the ingest service until `shutdown` fires (ctrl-c) or a fatal error
/// occurs connecting to a dependency.
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
    let http_bus = BusProducer::connect(&config.nats_url).await?;
    let cron_bus = BusProducer::connect(&config.nats_url).await?;

    let sanity_bounds = SanityBounds {
        temp: config.temp_bounds(),
        heart_rate: config.heartrate_bounds(),
        ecg: config.ecg_bounds(),
        spo2: config.spo2_bounds(),
    };
    let state = Arc::new(IngestState { store, bus: http_bus, sanity_bounds });
    let router = http::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!(addr = %addr, nats_url = %config.nats_url, "starting healthmonitor-ingest");

    let cron = CronEmitter::new(cron_bus, config.cleanup_interval(), config.max_datapoint_age());
    let cron_shutdown = shutdown.clone();
    let cron_handle = tokio::spawn(async move { cron.run(cron_shutdown).await });

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    let _ = cron_handle.await;
    tracing::info!("healthmonitor-ingest shut down cleanly");
    Ok(())
}
