use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_LOG_ENTRIES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Started,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLogEntry {
    pub timestamp: DateTime<Utc>,
    pub location_id: String,
    pub location: String,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Newest-first ring buffer of request outcomes, capped at 20 entries.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestLog(Vec<RequestLogEntry>);

impl RequestLog {
    pub fn push(&mut self, entry: RequestLogEntry) {
        self.0.insert(0, entry);
        self.0.truncate(MAX_LOG_ENTRIES);
    }

    /// Flip a `started` entry to its final status. Entries are matched by
    /// `(location_id, timestamp)` so two overlapping fetches for the same
    /// location resolve independently.
    pub fn resolve(
        &mut self,
        location_id: &str,
        timestamp: DateTime<Utc>,
        status: RequestStatus,
        error: Option<String>,
    ) {
        if let Some(entry) = self
            .0
            .iter_mut()
            .find(|e| e.location_id == location_id && e.timestamp == timestamp)
        {
            entry.status = status;
            if error.is_some() {
                entry.error = error;
            }
        }
    }

    pub fn entries(&self) -> &[RequestLogEntry] {
        &self.0
    }
}
