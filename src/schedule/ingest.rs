//! Ingests an exported schedule document into the local cache.
//!
//! The upstream provider (an Aladhan calendar export) spells keys in its
//! own transliteration and suffixes timings with a timezone tag, e.g.
//! "04:38 (WIB)". Everything is normalized here, including the configurable
//! minute offset that corrects provider skew, so the mode selector only
//! ever sees clean local "HH:mm" values.

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, NaiveDate, NaiveTime};
use log::debug;
use rusqlite::Connection;
use serde::Deserialize;

use crate::db::repository::ScheduleRepo;
use crate::models::schedule::{canonical_key, parse_time};
use crate::models::PrayerTimes;

#[derive(Debug, Deserialize)]
struct ScheduleDocument {
    #[serde(default)]
    location: Option<String>,
    schedule: Vec<ScheduleDay>,
}

#[derive(Debug, Deserialize)]
struct ScheduleDay {
    date: String,
    timings: HashMap<String, String>,
}

#[derive(Debug)]
pub struct ImportSummary {
    pub days: usize,
    pub location: Option<String>,
}

/// Parse a schedule JSON document and cache every day it contains.
/// `offset_minutes` is applied to each timing at ingestion.
pub fn import_document(
    conn: &Connection,
    json: &str,
    offset_minutes: i32,
) -> Result<ImportSummary> {
    let doc: ScheduleDocument =
        serde_json::from_str(json).context("Parsing schedule document")?;

    let mut days = 0;
    for day in &doc.schedule {
        let date = NaiveDate::parse_from_str(&day.date, "%Y-%m-%d")
            .map_err(|e| anyhow!("Bad schedule date '{}': {}", day.date, e))?;
        let times = build_times(&day.timings, offset_minutes)
            .with_context(|| format!("Timings for {}", day.date))?;
        let date_str = date.format("%Y-%m-%d").to_string();
        ScheduleRepo::store(conn, &date_str, &times)?;
        debug!("cached schedule for {}", date_str);
        days += 1;
    }

    Ok(ImportSummary { days, location: doc.location })
}

fn build_times(timings: &HashMap<String, String>, offset_minutes: i32) -> Result<PrayerTimes> {
    let mut normalized: HashMap<&'static str, NaiveTime> = HashMap::new();
    for (key, raw) in timings {
        let Some(name) = canonical_key(key) else {
            continue; // providers include extras like Sunrise and Midnight
        };
        let time = parse_time(strip_suffix(raw))?;
        normalized.insert(name, shift(time, offset_minutes));
    }

    let get = |name: &'static str| {
        normalized
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!("Missing timing '{}'", name))
    };

    Ok(PrayerTimes {
        imsak: get("Imsak")?,
        subuh: get("Subuh")?,
        dzuhur: get("Dzuhur")?,
        ashar: get("Ashar")?,
        maghrib: get("Maghrib")?,
        isya: get("Isya")?,
        firstthird: get("Firstthird")?,
        lastthird: get("Lastthird")?,
    })
}

/// Drop a trailing timezone tag: "04:38 (WIB)" → "04:38".
fn strip_suffix(raw: &str) -> &str {
    raw.split_whitespace().next().unwrap_or(raw)
}

fn shift(t: NaiveTime, minutes: i32) -> NaiveTime {
    t.overflowing_add_signed(Duration::minutes(minutes as i64)).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    const SAMPLE: &str = r#"{
        "location": "Jakarta",
        "schedule": [
            {
                "date": "2026-02-19",
                "timings": {
                    "Imsak": "04:28 (WIB)",
                    "Fajr": "04:38 (WIB)",
                    "Sunrise": "05:54 (WIB)",
                    "Dhuhr": "12:07 (WIB)",
                    "Asr": "15:21 (WIB)",
                    "Maghrib": "18:14 (WIB)",
                    "Isha": "19:24 (WIB)",
                    "Firstthird": "22:05 (WIB)",
                    "Lastthird": "02:24 (WIB)"
                }
            }
        ]
    }"#;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn imports_aladhan_style_export() {
        let conn = test_conn();
        let summary = import_document(&conn, SAMPLE, 0).unwrap();
        assert_eq!(summary.days, 1);
        assert_eq!(summary.location.as_deref(), Some("Jakarta"));
        // Summaries surface in logs and assertion failures.
        assert!(format!("{:?}", summary).contains("Jakarta"));

        let times = ScheduleRepo::get_for_date(&conn, "2026-02-19").unwrap().unwrap();
        assert_eq!(times.subuh, NaiveTime::from_hms_opt(4, 38, 0).unwrap());
        assert_eq!(times.maghrib, NaiveTime::from_hms_opt(18, 14, 0).unwrap());
        assert_eq!(times.lastthird, NaiveTime::from_hms_opt(2, 24, 0).unwrap());
    }

    #[test]
    fn offset_is_applied_at_ingestion() {
        let conn = test_conn();
        import_document(&conn, SAMPLE, 3).unwrap();
        let times = ScheduleRepo::get_for_date(&conn, "2026-02-19").unwrap().unwrap();
        assert_eq!(times.subuh, NaiveTime::from_hms_opt(4, 41, 0).unwrap());
        assert_eq!(times.isya, NaiveTime::from_hms_opt(19, 27, 0).unwrap());
    }

    #[test]
    fn missing_timing_is_rejected() {
        let conn = test_conn();
        let json = r#"{
            "schedule": [
                { "date": "2026-02-19", "timings": { "Fajr": "04:38" } }
            ]
        }"#;
        let err = import_document(&conn, json, 0).unwrap_err();
        assert!(format!("{:#}", err).contains("Missing timing"));
    }

    #[test]
    fn bad_date_is_rejected() {
        let conn = test_conn();
        let json = r#"{
            "schedule": [
                { "date": "19-02-2026", "timings": {} }
            ]
        }"#;
        assert!(import_document(&conn, json, 0).is_err());
    }
}
