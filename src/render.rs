//! Shared presentation logic for the availability table.
//!
//! All date math happens on `NaiveDate` components, so a given date string
//! produces the same day count on every machine regardless of its UTC
//! offset.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::appointment::AppointmentStore;

const URGENT_WINDOW_DAYS: i64 = 30;
const MODERATE_WINDOW_DAYS: i64 = 90;
const ADDITIONAL_DATES_SHOWN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    Moderate,
    Neutral,
}

/// One rendered row. `earliest_date == None` is the "no availability" state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub location_id: String,
    pub name: String,
    pub earliest_date: Option<NaiveDate>,
    pub days_from_now: Option<i64>,
    pub additional_dates: Vec<NaiveDate>,
    pub urgency: Option<Urgency>,
    pub last_updated: DateTime<Utc>,
}

pub fn days_from_now(date: NaiveDate, today: NaiveDate) -> i64 {
    date.signed_duration_since(today).num_days()
}

pub fn classify(days: i64) -> Urgency {
    if days <= URGENT_WINDOW_DAYS {
        Urgency::Urgent
    } else if days <= MODERATE_WINDOW_DAYS {
        Urgency::Moderate
    } else {
        Urgency::Neutral
    }
}

/// Renders a store snapshot into display rows, sorted by location name.
pub fn render_table(data: &AppointmentStore, today: NaiveDate) -> Vec<TableRow> {
    let mut rows: Vec<TableRow> = data
        .iter()
        .map(|(location_id, record)| {
            let mut dates = record.available_dates.clone();
            dates.sort();

            let earliest = dates.first().copied();
            let days = earliest.map(|date| days_from_now(date, today));

            TableRow {
                location_id: location_id.clone(),
                name: record.name.clone(),
                earliest_date: earliest,
                days_from_now: days,
                additional_dates: dates
                    .iter()
                    .skip(1)
                    .take(ADDITIONAL_DATES_SHOWN)
                    .copied()
                    .collect(),
                urgency: days.map(classify),
                last_updated: record.last_updated,
            }
        })
        .collect();

    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::appointment::AppointmentRecord;
    use chrono::TimeZone;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn record(name: &str, dates: &[&str]) -> AppointmentRecord {
        AppointmentRecord {
            name: name.to_string(),
            available_dates: dates.iter().map(|d| date(d)).collect(),
            last_updated: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn earliest_date_wins_regardless_of_input_order() {
        let mut store = AppointmentStore::new();
        store.insert(
            "94".to_string(),
            record("Toronto", &["2024-03-15", "2024-01-10", "2024-02-20"]),
        );

        let rows = render_table(&store, date("2024-01-01"));
        assert_eq!(rows[0].earliest_date, Some(date("2024-01-10")));
        assert_eq!(
            rows[0].additional_dates,
            vec![date("2024-02-20"), date("2024-03-15")]
        );
    }

    #[test]
    fn days_from_now_is_pure_component_math() {
        // No clocks, no offsets: the same strings always give the same count.
        assert_eq!(days_from_now(date("2024-01-10"), date("2024-01-01")), 9);
        assert_eq!(days_from_now(date("2024-01-01"), date("2024-01-10")), -9);
        // Across a DST boundary in any local timezone.
        assert_eq!(days_from_now(date("2024-04-01"), date("2024-03-01")), 31);
    }

    #[test]
    fn urgency_bucket_boundaries() {
        assert_eq!(classify(0), Urgency::Urgent);
        assert_eq!(classify(30), Urgency::Urgent);
        assert_eq!(classify(31), Urgency::Moderate);
        assert_eq!(classify(90), Urgency::Moderate);
        assert_eq!(classify(91), Urgency::Neutral);
    }

    #[test]
    fn empty_dates_render_as_no_availability() {
        let mut store = AppointmentStore::new();
        store.insert("94".to_string(), record("Toronto", &[]));

        let rows = render_table(&store, date("2024-01-01"));
        assert_eq!(rows[0].earliest_date, None);
        assert_eq!(rows[0].days_from_now, None);
        assert_eq!(rows[0].urgency, None);
        assert!(rows[0].additional_dates.is_empty());
    }

    #[test]
    fn rows_sort_by_display_name() {
        let mut store = AppointmentStore::new();
        store.insert("94".to_string(), record("Toronto", &["2024-05-01"]));
        store.insert("92".to_string(), record("Ottawa", &["2024-05-01"]));

        let rows = render_table(&store, date("2024-01-01"));
        assert_eq!(rows[0].name, "Ottawa");
        assert_eq!(rows[1].name, "Toronto");
    }

    #[test]
    fn at_most_three_additional_dates() {
        let mut store = AppointmentStore::new();
        store.insert(
            "94".to_string(),
            record(
                "Toronto",
                &["2024-05-01", "2024-05-02", "2024-05-03", "2024-05-04", "2024-05-05"],
            ),
        );

        let rows = render_table(&store, date("2024-01-01"));
        assert_eq!(rows[0].additional_dates.len(), 3);
        assert_eq!(
            rows[0].additional_dates,
            vec![date("2024-05-02"), date("2024-05-03"), date("2024-05-04")]
        );
    }
}
