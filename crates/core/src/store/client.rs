// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Document Store Adapter (§4.A): typed access to the `device-info`,
//! `device-data`, and `device-alerts` indices, routed by `did`.
//!
//! `DocumentStore` is implemented by [`EsDocumentStore`] against a real
//! Elasticsearch cluster over its HTTP API (no Elasticsearch client crate
//! exists anywhere in this workspace's dependency stack, so requests are
//! issued directly with `reqwest`, the same pattern `UpstreamClient` uses
//! for plain upstream HTTP calls) and by [`InMemoryStore`] for tests.
//!
//! Scroll contexts are point-in-time snapshots of the index as of scroll
//! initiation: `scroll_data`/`scroll_alerts` never observe writes that land
//! after the scroll starts, matching Elasticsearch's own scroll semantics.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::domain::{Alert, AlertUpdate, DeviceInfo, DeviceInfoPatch, DeviceSample};

use super::error::StoreError;
use super::model::{
    AlertEs, DeviceInfoEs, DeviceSampleEs, DEVICE_ALERTS_INDEX, DEVICE_DATA_INDEX,
    DEVICE_INFO_INDEX,
};

const SCROLL_KEEPALIVE: &str = "1m";
const SCROLL_PAGE_SIZE: usize = 500;
const CLEANUP_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DATA_QUERY_CAP: usize = 1000;

/// Typed surface over the three indices. Implementations own connection
/// pooling; callers never see the wire format.
pub trait DocumentStore: Send + Sync {
    fn get_device_info(
        &self,
        did: &str,
    ) -> impl Future<Output = Result<DeviceInfo, StoreError>> + Send;

    fn register_device_info(
        &self,
        did: &str,
        patient_name: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn update_device_info(
        &self,
        did: &str,
        patch: &DeviceInfoPatch,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn get_device_data(
        &self,
        did: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<DeviceSample>, StoreError>> + Send;

    fn append_samples(
        &self,
        batch: &[DeviceSample],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn get_active_alerts(
        &self,
        did: &str,
    ) -> impl Future<Output = Result<Vec<Alert>, StoreError>> + Send;

    fn apply_alert_updates(
        &self,
        updates: &[AlertUpdate],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn scroll_data(&self, did: &str) -> impl Future<Output = Result<Vec<DeviceSample>, StoreError>> + Send;

    fn scroll_alerts(&self, did: &str) -> impl Future<Output = Result<Vec<Alert>, StoreError>> + Send;

    fn cleanup_data_before(
        &self,
        cutoff: DateTime<Utc>,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Thin REST client speaking the Elasticsearch HTTP API directly.
pub struct EsDocumentStore {
    base_url: String,
    client: reqwest::Client,
}

impl EsDocumentStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self { base_url: base_url.into(), client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> Result<Value, StoreError> {
        let resp = self.client.get(self.url(path)).send().await?;
        Self::decode(resp).await
    }

    async fn put_json(&self, path: &str, body: &Value) -> Result<Value, StoreError> {
        let resp = self.client.put(self.url(path)).json(body).send().await?;
        Self::decode(resp).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, StoreError> {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        Self::decode(resp).await
    }

    async fn decode(resp: reqwest::Response) -> Result<Value, StoreError> {
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        if status == StatusCode::CONFLICT {
            return Err(StoreError::Conflict);
        }
        if status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Unavailable(body));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Other(format!("{status}: {body}")));
        }
        Ok(resp.json().await?)
    }
}

impl DocumentStore for EsDocumentStore {
    async fn get_device_info(&self, did: &str) -> Result<DeviceInfo, StoreError> {
        let path = format!("/{DEVICE_INFO_INDEX}/_doc/{did}?routing={did}");
        let value = self.get_json(&path).await?;
        let source = value
            .get("_source")
            .cloned()
            .ok_or_else(|| StoreError::Other("missing _source".to_owned()))?;
        let es: DeviceInfoEs = serde_json::from_value(source)?;
        Ok(es.into())
    }

    async fn register_device_info(&self, did: &str, patient_name: &str) -> Result<(), StoreError> {
        let info = DeviceInfo::new(did, patient_name);
        let es = DeviceInfoEs::from(&info);
        let path = format!("/{DEVICE_INFO_INDEX}/_create/{did}?routing={did}");
        match self.put_json(&path, &serde_json::to_value(es)?).await {
            Ok(_) => Ok(()),
            Err(StoreError::Conflict) => Err(StoreError::AlreadyExists),
            Err(e) => Err(e),
        }
    }

    async fn update_device_info(&self, did: &str, patch: &DeviceInfoPatch) -> Result<(), StoreError> {
        let mut doc = serde_json::Map::new();
        if let Some(ts) = patch.last_seen_ts {
            doc.insert("last_seen_ts".to_owned(), json!(ts));
        }
        if let Some(ts) = patch.last_validation_ts {
            doc.insert("last_validation_ts".to_owned(), json!(ts));
        }
        if let Some(ref name) = patch.patient_name {
            doc.insert("patient_name".to_owned(), json!(name));
        }
        if let Some(ref phones) = patch.subscribed_phones {
            doc.insert("subscribed_phones".to_owned(), json!(phones));
        }
        let path = format!("/{DEVICE_INFO_INDEX}/_update/{did}?routing={did}");
        self.post_json(&path, &json!({ "doc": Value::Object(doc) })).await?;
        Ok(())
    }

    async fn get_device_data(
        &self,
        did: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DeviceSample>, StoreError> {
        let path = format!("/{DEVICE_DATA_INDEX}/_search?routing={did}");
        let body = json!({
            "size": DATA_QUERY_CAP,
            "sort": [{ "timestamp": "asc" }],
            "query": {
                "bool": {
                    "filter": [
                        { "term": { "did": did } },
                        { "range": { "timestamp": { "gte": from.to_rfc3339(), "lte": to.to_rfc3339() } } },
                    ]
                }
            }
        });
        let value = self.post_json(&path, &body).await?;
        hits_to::<DeviceSampleEs, DeviceSample>(value)
    }

    async fn append_samples(&self, batch: &[DeviceSample]) -> Result<(), StoreError> {
        let Some(did) = batch.first().map(|s| s.did.clone()) else {
            return Ok(());
        };
        // Fail fast if the device has never registered, per §4.A.
        self.get_device_info(&did).await?;

        let mut bulk = String::new();
        for sample in batch {
            let es = DeviceSampleEs::from(sample);
            let meta = json!({
                "index": { "_index": DEVICE_DATA_INDEX, "_id": sample.doc_id(), "routing": did }
            });
            bulk.push_str(&serde_json::to_string(&meta)?);
            bulk.push('\n');
            bulk.push_str(&serde_json::to_string(&es)?);
            bulk.push('\n');
        }
        let resp = self
            .client
            .post(self.url("/_bulk"))
            .header("Content-Type", "application/x-ndjson")
            .body(bulk)
            .send()
            .await?;
        Self::decode(resp).await?;

        let Some(max_ts) = batch.iter().map(|s| s.ts).max() else {
            return Ok(());
        };
        let patch = DeviceInfoPatch { last_seen_ts: Some(max_ts), ..Default::default() };
        self.update_device_info(&did, &patch).await
    }

    async fn get_active_alerts(&self, did: &str) -> Result<Vec<Alert>, StoreError> {
        let path = format!("/{DEVICE_ALERTS_INDEX}/_search?routing={did}");
        let body = json!({
            "size": DATA_QUERY_CAP,
            "query": {
                "bool": {
                    "filter": [
                        { "term": { "did": did } },
                        { "term": { "status": "ACTIVE" } },
                    ]
                }
            }
        });
        let value = self.post_json(&path, &body).await?;
        let es_hits = hits_to_es::<AlertEs>(value)?;
        es_hits.into_iter().map(Alert::try_from).collect()
    }

    async fn apply_alert_updates(&self, updates: &[AlertUpdate]) -> Result<(), StoreError> {
        for update in updates {
            let did = &update.alert().did;
            let doc_id = update.doc_id();
            match update {
                AlertUpdate::Created { alert, .. } => {
                    let path = format!("/{DEVICE_ALERTS_INDEX}/_create/{doc_id}?routing={did}");
                    let es = AlertEs::from(alert);
                    match self.put_json(&path, &serde_json::to_value(es)?).await {
                        Ok(_) => {}
                        // Already applied by an earlier run of this idempotent batch.
                        Err(StoreError::Conflict) => {}
                        Err(e) => return Err(e),
                    }
                }
                AlertUpdate::Continued { alert, .. } => {
                    let path = format!("/{DEVICE_ALERTS_INDEX}/_update/{doc_id}?routing={did}");
                    let doc = json!({ "last_active_ts": alert.last_active_ts });
                    self.post_json(&path, &json!({ "doc": doc })).await?;
                }
                AlertUpdate::Resolved { alert, .. } => {
                    let path = format!("/{DEVICE_ALERTS_INDEX}/_update/{doc_id}?routing={did}");
                    let doc = json!({ "status": "RESOLVED", "resolved_ts": alert.resolved_ts });
                    self.post_json(&path, &json!({ "doc": doc })).await?;
                }
            }
        }
        Ok(())
    }

    async fn scroll_data(&self, did: &str) -> Result<Vec<DeviceSample>, StoreError> {
        let es_items = self.scroll::<DeviceSampleEs>(DEVICE_DATA_INDEX, did).await?;
        Ok(es_items.into_iter().map(Into::into).collect())
    }

    async fn scroll_alerts(&self, did: &str) -> Result<Vec<Alert>, StoreError> {
        let es_items = self.scroll::<AlertEs>(DEVICE_ALERTS_INDEX, did).await?;
        es_items.into_iter().map(Alert::try_from).collect()
    }

    async fn cleanup_data_before(
        &self,
        cutoff: DateTime<Utc>,
        cancel: CancellationToken,
    ) -> Result<(), StoreError> {
        let path = format!("/{DEVICE_DATA_INDEX}/_delete_by_query?conflicts=proceed&wait_for_completion=false");
        let body = json!({ "query": { "range": { "timestamp": { "lte": cutoff.to_rfc3339() } } } });
        let value = self.post_json(&path, &body).await?;
        let task_id = value
            .get("task")
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::Other("delete_by_query did not return a task id".to_owned()))?
            .to_owned();

        loop {
            if cancel.is_cancelled() {
                return Err(StoreError::Unavailable("cleanup cancelled before completion".to_owned()));
            }
            let status = self.get_json(&format!("/_tasks/{task_id}")).await?;
            if status.get("completed").and_then(Value::as_bool).unwrap_or(false) {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(CLEANUP_POLL_INTERVAL) => {}
                _ = cancel.cancelled() => {
                    return Err(StoreError::Unavailable("cleanup cancelled before completion".to_owned()));
                }
            }
        }

        // Best-effort: delete the task bookkeeping document.
        let _ = self
            .client
            .delete(self.url(&format!("/.tasks/_doc/{task_id}")))
            .send()
            .await;
        Ok(())
    }
}

impl EsDocumentStore {
    /// Scroll an entire index for one device. Elasticsearch scroll contexts
    /// are point-in-time: writes after the initial `_search?scroll=` request
    /// are invisible to this iteration.
    async fn scroll<Wire>(&self, index: &str, did: &str) -> Result<Vec<Wire>, StoreError>
    where
        Wire: serde::de::DeserializeOwned,
    {
        let path = format!("/{index}/_search?scroll={SCROLL_KEEPALIVE}&routing={did}");
        let body = json!({ "size": SCROLL_PAGE_SIZE, "query": { "term": { "did": did } } });
        let mut value = self.post_json(&path, &body).await?;
        let mut out = Vec::new();
        let mut scroll_id = value
            .get("_scroll_id")
            .and_then(Value::as_str)
            .map(str::to_owned);

        loop {
            let hits = hits_to_es::<Wire>(value)?;
            if hits.is_empty() {
                break;
            }
            out.extend(hits);
            let Some(ref id) = scroll_id else { break };
            let next = self
                .post_json("/_search/scroll", &json!({ "scroll": SCROLL_KEEPALIVE, "scroll_id": id }))
                .await?;
            scroll_id = next.get("_scroll_id").and_then(Value::as_str).map(str::to_owned);
            value = next;
        }

        if let Some(id) = scroll_id {
            let _ = self
                .client
                .delete(self.url("/_search/scroll"))
                .json(&json!({ "scroll_id": id }))
                .send()
                .await;
        }
        Ok(out)
    }
}

fn hits_to_es<Wire>(value: Value) -> Result<Vec<Wire>, StoreError>
where
    Wire: serde::de::DeserializeOwned,
{
    let hits = value
        .get("hits")
        .and_then(|h| h.get("hits"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    hits.into_iter()
        .map(|hit| {
            let source = hit
                .get("_source")
                .cloned()
                .ok_or_else(|| StoreError::Other("missing _source".to_owned()))?;
            Ok(serde_json::from_value(source)?)
        })
        .collect()
}

fn hits_to<Wire, Out>(value: Value) -> Result<Vec<Out>, StoreError>
where
    Wire: serde::de::DeserializeOwned + Into<Out>,
{
    Ok(hits_to_es::<Wire>(value)?.into_iter().map(Into::into).collect())
}

/// In-memory fake used by unit tests and `tests/specs`. Not a realistic
/// model of Elasticsearch's eventual consistency, only of the adapter's
/// documented contract.
#[derive(Default)]
pub struct InMemoryStore {
    info: Mutex<HashMap<String, DeviceInfo>>,
    data: Mutex<HashMap<String, Vec<DeviceSample>>>,
    alerts: Mutex<HashMap<String, Alert>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_info(&self) -> std::sync::MutexGuard<'_, HashMap<String, DeviceInfo>> {
        self.info.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_data(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<DeviceSample>>> {
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_alerts(&self) -> std::sync::MutexGuard<'_, HashMap<String, Alert>> {
        self.alerts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DocumentStore for InMemoryStore {
    async fn get_device_info(&self, did: &str) -> Result<DeviceInfo, StoreError> {
        self.lock_info().get(did).cloned().ok_or(StoreError::NotFound)
    }

    async fn register_device_info(&self, did: &str, patient_name: &str) -> Result<(), StoreError> {
        let mut info = self.lock_info();
        if info.contains_key(did) {
            return Err(StoreError::AlreadyExists);
        }
        info.insert(did.to_owned(), DeviceInfo::new(did, patient_name));
        Ok(())
    }

    async fn update_device_info(&self, did: &str, patch: &DeviceInfoPatch) -> Result<(), StoreError> {
        let mut info = self.lock_info();
        let entry = info.get_mut(did).ok_or(StoreError::NotFound)?;
        if let Some(ts) = patch.last_seen_ts {
            entry.last_seen_ts = ts;
        }
        if let Some(ts) = patch.last_validation_ts {
            entry.last_validation_ts = ts;
        }
        if let Some(ref name) = patch.patient_name {
            entry.patient_name = name.clone();
        }
        if let Some(ref phones) = patch.subscribed_phones {
            entry.subscribed_phones = phones.clone();
        }
        Ok(())
    }

    async fn get_device_data(
        &self,
        did: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DeviceSample>, StoreError> {
        let mut samples: Vec<DeviceSample> = self
            .lock_data()
            .get(did)
            .map(|v| v.iter().filter(|s| s.ts >= from && s.ts <= to).cloned().collect())
            .unwrap_or_default();
        samples.sort_by_key(|s| s.ts);
        samples.truncate(DATA_QUERY_CAP);
        Ok(samples)
    }

    async fn append_samples(&self, batch: &[DeviceSample]) -> Result<(), StoreError> {
        let Some(did) = batch.first().map(|s| s.did.clone()) else {
            return Ok(());
        };
        if !self.lock_info().contains_key(&did) {
            return Err(StoreError::NotFound);
        }
        self.lock_data().entry(did.clone()).or_default().extend(batch.iter().cloned());
        let Some(max_ts) = batch.iter().map(|s| s.ts).max() else {
            return Ok(());
        };
        let mut info = self.lock_info();
        let entry = info.get_mut(&did).ok_or(StoreError::NotFound)?;
        entry.observe_sample_ts(max_ts);
        Ok(())
    }

    async fn get_active_alerts(&self, did: &str) -> Result<Vec<Alert>, StoreError> {
        Ok(self
            .lock_alerts()
            .values()
            .filter(|a| a.did == did && matches!(a.status, crate::domain::AlertStatus::Active))
            .cloned()
            .collect())
    }

    async fn apply_alert_updates(&self, updates: &[AlertUpdate]) -> Result<(), StoreError> {
        let mut alerts = self.lock_alerts();
        for update in updates {
            match update {
                AlertUpdate::Created { doc_id, alert } => {
                    alerts.entry(doc_id.clone()).or_insert_with(|| alert.clone());
                }
                AlertUpdate::Continued { doc_id, alert } => {
                    let entry = alerts.get_mut(doc_id).ok_or(StoreError::NotFound)?;
                    entry.last_active_ts = alert.last_active_ts;
                }
                AlertUpdate::Resolved { doc_id, alert } => {
                    let entry = alerts.get_mut(doc_id).ok_or(StoreError::NotFound)?;
                    entry.status = alert.status;
                    entry.resolved_ts = alert.resolved_ts;
                }
            }
        }
        Ok(())
    }

    async fn scroll_data(&self, did: &str) -> Result<Vec<DeviceSample>, StoreError> {
        Ok(self.lock_data().get(did).cloned().unwrap_or_default())
    }

    async fn scroll_alerts(&self, did: &str) -> Result<Vec<Alert>, StoreError> {
        Ok(self.lock_alerts().values().filter(|a| a.did == did).cloned().collect())
    }

    async fn cleanup_data_before(
        &self,
        cutoff: DateTime<Utc>,
        _cancel: CancellationToken,
    ) -> Result<(), StoreError> {
        let mut data = self.lock_data();
        for samples in data.values_mut() {
            samples.retain(|s| s.ts > cutoff);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
