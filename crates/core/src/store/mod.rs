// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Document Store Adapter: a typed surface over the three Elasticsearch
//! indices this pipeline uses, plus an in-memory fake for tests.

mod client;
mod error;
mod model;

pub use client::{DocumentStore, EsDocumentStore, InMemoryStore};
pub use error::StoreError;
