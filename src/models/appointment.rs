use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Result of the most recent successful fetch for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRecord {
    pub name: String,
    pub available_dates: Vec<NaiveDate>,
    pub last_updated: DateTime<Utc>,
}

/// Everything we know, keyed by location id. Updating one key must never
/// drop another key's record.
pub type AppointmentStore = BTreeMap<String, AppointmentRecord>;

/// One element of the upstream days endpoint payload. The endpoint sends
/// more fields, only the date matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotDay {
    pub date: NaiveDate,
}

/// Shape shared by `getAppointmentData` responses and the data-bearing
/// broadcasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationsPayload {
    pub locations: Vec<AppointmentRecord>,
}

impl LocationsPayload {
    pub fn from_store(store: &AppointmentStore) -> Self {
        LocationsPayload {
            locations: store.values().cloned().collect(),
        }
    }
}
