// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Front-end HTTP surface (SPEC_FULL.md Supplemented Features 1-2): device
//! registration, patient-name/subscription edits, and sample ingestion.
//!
//! Routing, JSON (de)serialization, and auth are explicitly out of scope
//! for deep design per spec.md §1 ("treated as external collaborators");
//! this module is the minimal plumbing the system needs to have an entry
//! point at all, built directly to the Document Store Adapter and Message
//! Bus Adapter contracts spec.md §4.A/§4.B already specify in full.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{patch, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use healthmonitor_core::bus::Publisher;
use healthmonitor_core::domain::{DeviceInfoPatch, DeviceSample};
use healthmonitor_core::store::{DocumentStore, StoreError};
use serde::{Deserialize, Serialize};

use crate::error::IngestError;
use crate::sanity::{self, SanityBounds};

pub struct IngestState<S, P> {
    pub store: Arc<S>,
    pub bus: P,
    pub sanity_bounds: SanityBounds,
}

pub fn build_router<S, P>(state: Arc<IngestState<S, P>>) -> Router
where
    S: DocumentStore + 'static,
    P: Publisher + 'static,
{
    Router::new()
        .route("/api/v1/health", axum::routing::get(health))
        .route("/api/v1/devices", post(register_device::<S, P>))
        .route("/api/v1/devices/{did}", patch(update_device::<S, P>))
        .route("/api/v1/devices/{did}/samples", post(ingest_samples::<S, P>))
        .with_state(state)
}

// -- Request/response types ---------------------------------------------------

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Deserialize)]
struct RegisterDeviceRequest {
    did: String,
    patient_name: String,
}

#[derive(Debug, Serialize)]
struct RegisterDeviceResponse {
    did: String,
    registered: bool,
}

#[derive(Debug, Deserialize, Default)]
struct UpdateDeviceRequest {
    #[serde(default)]
    patient_name: Option<String>,
    #[serde(default)]
    subscribed_phones: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct UpdateDeviceResponse {
    did: String,
    updated: bool,
}

#[derive(Debug, Deserialize)]
struct SampleRequest {
    ts: DateTime<Utc>,
    temperature: f64,
    heart_rate: f64,
    ecg: f64,
    spo2: f64,
}

#[derive(Debug, Serialize)]
struct IngestSamplesResponse {
    did: String,
    accepted: usize,
}

// -- Handlers -------------------------------------------------------------------

async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "running" })
}

/// `POST /api/v1/devices` — register a device (SPEC_FULL.md Feature 1).
async fn register_device<S: DocumentStore, P: Publisher>(
    State(state): State<Arc<IngestState<S, P>>>,
    Json(req): Json<RegisterDeviceRequest>,
) -> impl IntoResponse {
    if req.did.is_empty() {
        return IngestError::BadRequest.to_http_response("did must not be empty").into_response();
    }
    match state.store.register_device_info(&req.did, &req.patient_name).await {
        Ok(()) => Json(RegisterDeviceResponse { did: req.did, registered: true }).into_response(),
        Err(StoreError::AlreadyExists) => {
            IngestError::DeviceAlreadyExists.to_http_response(format!("device {} already registered", req.did)).into_response()
        }
        Err(e) => IngestError::from_store_error(&e).to_http_response(e.to_string()).into_response(),
    }
}

/// `PATCH /api/v1/devices/:did` — edit patient name / subscribed phones.
async fn update_device<S: DocumentStore, P: Publisher>(
    State(state): State<Arc<IngestState<S, P>>>,
    Path(did): Path<String>,
    Json(req): Json<UpdateDeviceRequest>,
) -> impl IntoResponse {
    let patch = DeviceInfoPatch {
        patient_name: req.patient_name,
        subscribed_phones: req.subscribed_phones,
        ..Default::default()
    };
    match state.store.update_device_info(&did, &patch).await {
        Ok(()) => Json(UpdateDeviceResponse { did, updated: true }).into_response(),
        Err(e) => IngestError::from_store_error(&e).to_http_response(e.to_string()).into_response(),
    }
}

/// `POST /api/v1/devices/:did/samples` — ingest a batch (SPEC_FULL.md
/// Feature 2). Runs the minimalist sanity check (Feature 5) before
/// persisting, then publishes one `validation_<did>` per batch.
async fn ingest_samples<S: DocumentStore, P: Publisher>(
    State(state): State<Arc<IngestState<S, P>>>,
    Path(did): Path<String>,
    Json(req): Json<Vec<SampleRequest>>,
) -> impl IntoResponse {
    let batch: Vec<DeviceSample> = req
        .into_iter()
        .map(|s| DeviceSample {
            did: did.clone(),
            ts: s.ts,
            temperature: s.temperature,
            heart_rate: s.heart_rate,
            ecg: s.ecg,
            spo2: s.spo2,
        })
        .collect();

    if sanity::batch_is_nonsensical(&batch, &state.sanity_bounds) {
        return IngestError::BadRequest
            .to_http_response("every vital of every sample in this batch is out of bound")
            .into_response();
    }

    if let Err(e) = state.store.append_samples(&batch).await {
        return IngestError::from_store_error(&e).to_http_response(e.to_string()).into_response();
    }

    if let Err(e) = state.bus.publish_validation(&did).await {
        tracing::warn!(did, err = %e, "failed to publish validation message after ingest");
        return IngestError::Upstream.to_http_response(format!("stored samples but failed to publish validation: {e}")).into_response();
    }

    Json(IngestSamplesResponse { did, accepted: batch.len() }).into_response()
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
