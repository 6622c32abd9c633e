// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// Classification of Document Store Adapter failures (§7).
///
/// Plain enum with a `Display` impl, matching the rest of the workspace's
/// error style rather than pulling in a derive-macro error crate.
#[derive(Debug)]
pub enum StoreError {
    /// The requested document does not exist.
    NotFound,
    /// `register_device_info` found a document already present.
    AlreadyExists,
    /// A version/routing conflict that the caller should treat as transient.
    Conflict,
    /// The store could not be reached or returned a server error.
    Unavailable(String),
    /// Anything else: malformed response body, serialization failure, etc.
    Other(String),
}

impl StoreError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::Conflict => "CONFLICT",
            Self::Unavailable(_) => "UNAVAILABLE",
            Self::Other(_) => "OTHER",
        }
    }

    /// Whether the failure is worth logging-and-continuing rather than
    /// treated as a programming error (§7: store-unavailable / not-found are
    /// both expected-in-production conditions, not bugs).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "{}", self.as_str()),
            Self::AlreadyExists => write!(f, "{}", self.as_str()),
            Self::Conflict => write!(f, "{}", self.as_str()),
            Self::Unavailable(msg) => write!(f, "{}: {msg}", self.as_str()),
            Self::Other(msg) => write!(f, "{}: {msg}", self.as_str()),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::Unavailable(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
