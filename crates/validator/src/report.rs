// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Report Handler (§4.G): `report-generation_<username>_<did>_<uuid>` fans
//! out three concurrent writers — device info, full sample history, full
//! alert history — each producing its own file under the report directory.
//!
//! Report names split on the first two underscores (Open Question
//! decision, SPEC_FULL.md): usernames and device ids registered through
//! this workspace may not themselves contain `_`.

use std::path::PathBuf;
use std::sync::Arc;

use healthmonitor_core::domain::{Alert, DeviceSample};
use healthmonitor_core::store::DocumentStore;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

pub struct ReportHandler<S> {
    store: Arc<S>,
    output_dir: PathBuf,
}

impl<S: DocumentStore + 'static> ReportHandler<S> {
    pub fn new(store: Arc<S>, output_dir: PathBuf) -> Self {
        Self { store, output_dir }
    }

    pub async fn handle(&self, report_name: &str) -> anyhow::Result<()> {
        let (_username, did, _uuid) = parse_report_name(report_name)?;

        tokio::fs::create_dir_all(&self.output_dir).await?;

        let info_path = self.output_dir.join(format!("{report_name}_info"));
        let data_path = self.output_dir.join(format!("{report_name}_data"));
        let alerts_path = self.output_dir.join(format!("{report_name}_alerts"));

        let info_task = {
            let store = Arc::clone(&self.store);
            let did = did.clone();
            tokio::spawn(async move {
                let info = store.get_device_info(&did).await?;
                write_blob(info_path, &info).await
            })
        };

        let data_task = {
            let store = Arc::clone(&self.store);
            let did = did.clone();
            tokio::spawn(async move {
                let samples: Vec<DeviceSample> = store.scroll_data(&did).await?;
                write_stream(data_path, &samples).await
            })
        };

        let alerts_task = {
            let store = Arc::clone(&self.store);
            let did = did.clone();
            tokio::spawn(async move {
                let alerts: Vec<Alert> = store.scroll_alerts(&did).await?;
                write_stream(alerts_path, &alerts).await
            })
        };

        let (info_res, data_res, alerts_res) = tokio::join!(info_task, data_task, alerts_task);
        info_res??;
        data_res??;
        alerts_res??;
        Ok(())
    }
}

fn parse_report_name(name: &str) -> anyhow::Result<(String, String, uuid::Uuid)> {
    let mut parts = name.splitn(3, '_');
    let username = parts.next().filter(|s| !s.is_empty()).ok_or_else(|| anyhow::anyhow!("report name missing username: {name}"))?;
    let did = parts.next().filter(|s| !s.is_empty()).ok_or_else(|| anyhow::anyhow!("report name missing did: {name}"))?;
    let uuid_str = parts.next().ok_or_else(|| anyhow::anyhow!("report name missing uuid: {name}"))?;
    let uuid = uuid::Uuid::parse_str(uuid_str).map_err(|e| anyhow::anyhow!("report name has invalid uuid {uuid_str}: {e}"))?;
    Ok((username.to_owned(), did.to_owned(), uuid))
}

async fn write_blob<T: Serialize>(path: PathBuf, value: &T) -> anyhow::Result<()> {
    let mut file = tokio::fs::OpenOptions::new().append(true).create(true).open(&path).await?;
    file.write_all(&serde_json::to_vec(value)?).await?;
    Ok(())
}

async fn write_stream<T: Serialize>(path: PathBuf, items: &[T]) -> anyhow::Result<()> {
    let mut file = tokio::fs::OpenOptions::new().append(true).create(true).open(&path).await?;
    for item in items {
        file.write_all(&serde_json::to_vec(item)?).await?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
