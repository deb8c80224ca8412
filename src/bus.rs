//! Typed event bus fanning fetch outcomes out to every listening surface.
//!
//! Delivery is at-most-once per subscriber with no acknowledgment; a slow
//! subscriber that lags simply skips to the newest events.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::constants::EVENT_BUS_CAPACITY;
use crate::models::appointment::LocationsPayload;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Event {
    FetchStarted {
        location_id: String,
        location_name: String,
    },
    FetchCompleted {
        location_id: String,
        location_name: String,
        data: LocationsPayload,
    },
    FetchError {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        location_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        location_name: Option<String>,
        error: String,
    },
    FetchInfo {
        message: String,
    },
    PermissionDenied {
        permission: String,
        message: String,
    },
    UpdateAppointmentTable {
        data: LocationsPayload,
    },
    ToggleTable,
}

#[derive(Clone)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_BUS_CAPACITY);
        Bus { tx }
    }

    /// Fire-and-forget. An error here only means nobody is listening.
    pub fn publish(&self, event: Event) {
        if self.tx.send(event).is_err() {
            debug!("event published with no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Bus::new()
    }
}
