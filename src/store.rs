//! File-backed store for everything that must survive a restart.
//!
//! One JSON document holds the location mappings, the appointment data, the
//! request log, the schedule id and the cookie-permission flag. Every
//! mutation happens under a single async mutex and is flushed to the backing
//! file before the lock is released, so a merge for one location can never
//! drop a concurrent update to another.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::constants::default_location_mappings;
use crate::models::appointment::{AppointmentRecord, AppointmentStore};
use crate::models::request_log::{RequestLog, RequestLogEntry, RequestStatus};

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoreData {
    location_mappings: BTreeMap<String, String>,
    appointment_data: AppointmentStore,
    request_log: RequestLog,
    schedule_id: Option<String>,
    cookie_permission_granted: bool,
}

pub struct Store {
    backing_file: PathBuf,
    data: Mutex<StoreData>,
}

impl Store {
    /// Opens the store at `path`, reading the existing document if there is
    /// one and seeding the default location mappings otherwise.
    pub fn open(path: &Path) -> Result<Self> {
        let data = if path.exists() {
            let file = std::fs::File::open(path)
                .with_context(|| format!("unable to open store file {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("store file {} is not valid", path.display()))?
        } else {
            StoreData {
                location_mappings: default_location_mappings(),
                ..StoreData::default()
            }
        };

        Ok(Store {
            backing_file: path.to_path_buf(),
            data: Mutex::new(data),
        })
    }

    fn save(&self, data: &StoreData) -> Result<()> {
        let file = std::fs::File::create(&self.backing_file).with_context(|| {
            format!("unable to write store file {}", self.backing_file.display())
        })?;
        serde_json::to_writer(file, data).context("unable to serialize store")?;
        Ok(())
    }

    pub async fn location_mappings(&self) -> BTreeMap<String, String> {
        self.data.lock().await.location_mappings.clone()
    }

    pub async fn set_location_mappings(
        &self,
        mappings: BTreeMap<String, String>,
    ) -> Result<()> {
        let mut data = self.data.lock().await;
        data.location_mappings = mappings;
        self.save(&data)
    }

    pub async fn appointment_data(&self) -> AppointmentStore {
        self.data.lock().await.appointment_data.clone()
    }

    /// Writes one location's record, leaving every other key untouched, and
    /// returns the updated snapshot for broadcasting.
    pub async fn merge_record(
        &self,
        location_id: &str,
        record: AppointmentRecord,
    ) -> Result<AppointmentStore> {
        let mut data = self.data.lock().await;
        data.appointment_data.insert(location_id.to_string(), record);
        self.save(&data)?;
        Ok(data.appointment_data.clone())
    }

    pub async fn clear_appointments(&self) -> Result<()> {
        let mut data = self.data.lock().await;
        data.appointment_data.clear();
        self.save(&data)
    }

    pub async fn schedule_id(&self) -> Option<String> {
        self.data.lock().await.schedule_id.clone()
    }

    pub async fn set_schedule_id(&self, schedule_id: &str) -> Result<()> {
        let mut data = self.data.lock().await;
        data.schedule_id = Some(schedule_id.to_string());
        self.save(&data)
    }

    pub async fn cookie_permission_granted(&self) -> bool {
        self.data.lock().await.cookie_permission_granted
    }

    pub async fn set_cookie_permission(&self, granted: bool) -> Result<()> {
        let mut data = self.data.lock().await;
        data.cookie_permission_granted = granted;
        self.save(&data)
    }

    pub async fn request_log(&self) -> Vec<RequestLogEntry> {
        self.data.lock().await.request_log.entries().to_vec()
    }

    pub async fn log_started(&self, entry: RequestLogEntry) -> Result<()> {
        let mut data = self.data.lock().await;
        data.request_log.push(entry);
        self.save(&data)
    }

    pub async fn log_resolved(
        &self,
        location_id: &str,
        timestamp: DateTime<Utc>,
        status: RequestStatus,
        error: Option<String>,
    ) -> Result<()> {
        let mut data = self.data.lock().await;
        data.request_log.resolve(location_id, timestamp, status, error);
        self.save(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn record(name: &str, date: &str) -> AppointmentRecord {
        AppointmentRecord {
            name: name.to_string(),
            available_dates: vec![date.parse().unwrap()],
            last_updated: Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn merge_preserves_every_other_location() {
        let dir = tempdir().unwrap();
        let store = Store::open(&dir.path().join("store.json")).unwrap();

        store.merge_record("94", record("Toronto", "2025-06-01")).await.unwrap();
        store.merge_record("92", record("Ottawa", "2025-07-01")).await.unwrap();
        let updated = store
            .merge_record("94", record("Toronto", "2025-05-15"))
            .await
            .unwrap();

        assert_eq!(updated.len(), 2);
        assert_eq!(updated["92"], record("Ottawa", "2025-07-01"));
        assert_eq!(updated["94"], record("Toronto", "2025-05-15"));
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let store = Store::open(&path).unwrap();
            store.merge_record("94", record("Toronto", "2025-06-01")).await.unwrap();
            store.set_schedule_id("12345").await.unwrap();
        }

        let reopened = Store::open(&path).unwrap();
        assert_eq!(
            reopened.appointment_data().await["94"],
            record("Toronto", "2025-06-01")
        );
        assert_eq!(reopened.schedule_id().await.as_deref(), Some("12345"));
    }

    #[tokio::test]
    async fn fresh_store_seeds_default_mappings() {
        let dir = tempdir().unwrap();
        let store = Store::open(&dir.path().join("store.json")).unwrap();

        let mappings = store.location_mappings().await;
        assert_eq!(mappings.get("94").map(String::as_str), Some("Toronto"));
        assert_eq!(mappings.get("92").map(String::as_str), Some("Ottawa"));
    }

    #[tokio::test]
    async fn clear_empties_appointments_but_keeps_mappings() {
        let dir = tempdir().unwrap();
        let store = Store::open(&dir.path().join("store.json")).unwrap();

        store.merge_record("94", record("Toronto", "2025-06-01")).await.unwrap();
        store.clear_appointments().await.unwrap();

        assert!(store.appointment_data().await.is_empty());
        assert!(!store.location_mappings().await.is_empty());
    }

    #[tokio::test]
    async fn concurrent_merges_of_different_locations_both_land() {
        let dir = tempdir().unwrap();
        let store = std::sync::Arc::new(Store::open(&dir.path().join("store.json")).unwrap());

        let a = {
            let store = store.clone();
            tokio::spawn(async move {
                store.merge_record("94", record("Toronto", "2025-06-01")).await
            })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move {
                store.merge_record("92", record("Ottawa", "2025-07-01")).await
            })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        assert_eq!(store.appointment_data().await.len(), 2);
    }
}
