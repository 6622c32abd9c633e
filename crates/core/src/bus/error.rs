// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

#[derive(Debug)]
pub enum BusError {
    /// Payload didn't match any of the three recognized prefixes.
    UnknownPrefix(String),
    /// Matched a prefix but the remainder didn't parse (bad did/RFC3339/name triple).
    MalformedPayload(String),
    /// The underlying transport could not be reached.
    Unavailable(String),
}

impl BusError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownPrefix(_) => "UNKNOWN_PREFIX",
            Self::MalformedPayload(_) => "MALFORMED_PAYLOAD",
            Self::Unavailable(_) => "UNAVAILABLE",
        }
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPrefix(p) => write!(f, "{}: {p}", self.as_str()),
            Self::MalformedPayload(p) => write!(f, "{}: {p}", self.as_str()),
            Self::Unavailable(msg) => write!(f, "{}: {msg}", self.as_str()),
        }
    }
}

impl std::error::Error for BusError {}

impl From<async_nats::Error> for BusError {
    fn from(err: async_nats::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}
