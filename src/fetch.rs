//! Fetch orchestrator: one authenticated GET per configured location, each
//! outcome merged into the store, logged, and broadcast.

use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{NaiveDate, Utc};
use reqwest::header;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::bus::{Bus, Event};
use crate::constants::USER_AGENT;
use crate::models::appointment::{AppointmentRecord, LocationsPayload, SlotDay};
use crate::models::request_log::{RequestLogEntry, RequestStatus};
use crate::models::session::{PageSnapshot, SessionMaterial};
use crate::session::extract_session;
use crate::store::Store;

#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    base_url: String,
    store: Arc<Store>,
    bus: Bus,
}

impl Fetcher {
    pub fn new(base_url: &str, store: Arc<Store>, bus: Bus) -> Self {
        Fetcher {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            bus,
        }
    }

    fn days_url(&self, schedule_id: &str, location_id: &str) -> String {
        format!(
            "{}/en-ca/niv/schedule/{}/appointment/days/{}.json?appointments[expedite]=false",
            self.base_url, schedule_id, location_id
        )
    }

    fn referer_url(&self, schedule_id: &str) -> String {
        format!(
            "{}/en-ca/niv/schedule/{}/appointment",
            self.base_url, schedule_id
        )
    }

    /// One refresh cycle over every configured location. Resolves session
    /// material from the page snapshot, then fires an independent task per
    /// location; responses land in whatever order they land.
    pub async fn force_refresh(&self, page: &PageSnapshot) -> Result<()> {
        let session = self.resolve_session(page).await?;
        let Some(schedule_id) = session.schedule_id.clone() else {
            let error =
                "No schedule ID available. Please visit the visa appointment page first."
                    .to_string();
            self.bus.publish(Event::FetchError {
                location_id: None,
                location_name: None,
                error: error.clone(),
            });
            bail!(error);
        };

        let mappings = self.store.location_mappings().await;
        if mappings.is_empty() {
            self.bus.publish(Event::FetchInfo {
                message: "No locations configured. Add locations before refreshing."
                    .to_string(),
            });
        }

        for location_id in mappings.keys() {
            self.spawn_fetch(location_id, &schedule_id, &session.cookie_header, &mappings);
        }

        Ok(())
    }

    /// Refresh a single location on demand.
    pub async fn check_location(&self, location_id: &str, page: &PageSnapshot) -> Result<()> {
        let session = self.resolve_session(page).await?;
        let schedule_id = session
            .schedule_id
            .clone()
            .ok_or_else(|| anyhow!("No schedule ID available"))?;

        let mappings = self.store.location_mappings().await;
        self.spawn_fetch(location_id, &schedule_id, &session.cookie_header, &mappings);
        Ok(())
    }

    /// Derives cookies and a schedule id for this cycle: cookies always come
    /// fresh from the page, the schedule id falls back to the stored one. A
    /// schedule id seen in the page URL is persisted for later cycles.
    async fn resolve_session(&self, page: &PageSnapshot) -> Result<SessionMaterial> {
        let Some(mut session) = extract_session(page) else {
            let error = "No authentication cookies available. Please ensure you're logged in \
                         to the visa appointment site."
                .to_string();
            self.bus.publish(Event::FetchError {
                location_id: None,
                location_name: None,
                error: error.clone(),
            });
            bail!(error);
        };

        match session.schedule_id.as_deref() {
            Some(id) => self.store.set_schedule_id(id).await?,
            None => session.schedule_id = self.store.schedule_id().await,
        }

        Ok(session)
    }

    fn spawn_fetch(
        &self,
        location_id: &str,
        schedule_id: &str,
        cookie_header: &str,
        mappings: &BTreeMap<String, String>,
    ) {
        let name = mappings
            .get(location_id)
            .cloned()
            .unwrap_or_else(|| format!("Location ID {location_id}"));

        let fetcher = self.clone();
        let location_id = location_id.to_string();
        let schedule_id = schedule_id.to_string();
        let cookie_header = cookie_header.to_string();

        tokio::spawn(async move {
            if let Err(e) = fetcher
                .fetch_location(&location_id, &name, &schedule_id, &cookie_header)
                .await
            {
                warn!("Fetch for location {} failed: {:#}", location_id, e);
            }
        });
    }

    /// The full pipeline for one location: announce, log, request, merge,
    /// broadcast. On any failure the stored record is left untouched.
    pub async fn fetch_location(
        &self,
        location_id: &str,
        location_name: &str,
        schedule_id: &str,
        cookie_header: &str,
    ) -> Result<()> {
        self.bus.publish(Event::FetchStarted {
            location_id: location_id.to_string(),
            location_name: location_name.to_string(),
        });

        let started_at = Utc::now();
        self.store
            .log_started(RequestLogEntry {
                timestamp: started_at,
                location_id: location_id.to_string(),
                location: location_name.to_string(),
                status: RequestStatus::Started,
                error: None,
            })
            .await?;

        match self
            .request_days(schedule_id, location_id, cookie_header)
            .await
        {
            Ok(available_dates) => {
                info!(
                    "Fetched {} available dates for location {}",
                    available_dates.len(),
                    location_id
                );

                let record = AppointmentRecord {
                    name: location_name.to_string(),
                    available_dates,
                    last_updated: Utc::now(),
                };
                let updated = self.store.merge_record(location_id, record).await?;
                self.store
                    .log_resolved(location_id, started_at, RequestStatus::Success, None)
                    .await?;

                let payload = LocationsPayload::from_store(&updated);
                self.bus.publish(Event::UpdateAppointmentTable {
                    data: payload.clone(),
                });
                self.bus.publish(Event::FetchCompleted {
                    location_id: location_id.to_string(),
                    location_name: location_name.to_string(),
                    data: payload,
                });
                Ok(())
            }
            Err(e) => {
                let error = format!("{e:#}");
                self.store
                    .log_resolved(
                        location_id,
                        started_at,
                        RequestStatus::Error,
                        Some(error.clone()),
                    )
                    .await?;
                self.bus.publish(Event::FetchError {
                    location_id: Some(location_id.to_string()),
                    location_name: Some(location_name.to_string()),
                    error,
                });
                Err(e)
            }
        }
    }

    async fn request_days(
        &self,
        schedule_id: &str,
        location_id: &str,
        cookie_header: &str,
    ) -> Result<Vec<NaiveDate>> {
        let url = self.days_url(schedule_id, location_id);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
            .header(header::COOKIE, cookie_header)
            .header(header::REFERER, self.referer_url(schedule_id))
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read response body")?;

        if !status.is_success() {
            bail!("HTTP error, status {status}: {body}");
        }

        extract_dates(&body)
    }
}

/// Pulls the `date` out of every element of a days payload. Anything other
/// than an array of objects carrying a date is rejected wholesale.
pub fn extract_dates(body: &str) -> Result<Vec<NaiveDate>> {
    let value: Value = serde_json::from_str(body).context("response body is not JSON")?;
    if !value.is_array() {
        bail!("unexpected data format, expected array");
    }
    let days: Vec<SlotDay> = serde_json::from_value(value)
        .context("unexpected data format, expected objects with a date field")?;
    Ok(days.into_iter().map(|day| day.date).collect())
}
