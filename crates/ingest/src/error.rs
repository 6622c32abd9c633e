// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Error codes for the ingest HTTP API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngestError {
    BadRequest,
    DeviceNotFound,
    DeviceAlreadyExists,
    Upstream,
    Internal,
}

impl IngestError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::DeviceNotFound => 404,
            Self::DeviceAlreadyExists => 409,
            Self::Upstream => 502,
            Self::Internal => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::DeviceNotFound => "DEVICE_NOT_FOUND",
            Self::DeviceAlreadyExists => "DEVICE_ALREADY_EXISTS",
            Self::Upstream => "UPSTREAM_ERROR",
            Self::Internal => "INTERNAL",
        }
    }

    pub fn to_error_body(&self, message: impl Into<String>) -> ErrorBody {
        ErrorBody { code: self.as_str().to_owned(), message: message.into() }
    }

    pub fn to_http_response(&self, message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
        let status = StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse { error: self.to_error_body(message) };
        (status, Json(body))
    }

    /// Classify a [`StoreError`](healthmonitor_core::store::StoreError) the
    /// way §7 prescribes: not-found/already-exists are request-level
    /// outcomes, everything else is an upstream or internal failure.
    pub fn from_store_error(err: &healthmonitor_core::store::StoreError) -> Self {
        use healthmonitor_core::store::StoreError;
        match err {
            StoreError::NotFound => Self::DeviceNotFound,
            StoreError::AlreadyExists => Self::DeviceAlreadyExists,
            StoreError::Conflict | StoreError::Unavailable(_) => Self::Upstream,
            StoreError::Other(_) => Self::Internal,
        }
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error body with machine-readable code and human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
