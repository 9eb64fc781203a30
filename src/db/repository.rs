use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::schedule::{format_time, parse_time};
use crate::models::{KhatamPlan, PrayerTimes};

// ─── Schedule cache ──────────────────────────────────────────────────────────

pub struct ScheduleRepo;

impl ScheduleRepo {
    /// Missing rows are a loading state for callers, not an error.
    pub fn get_for_date(conn: &Connection, date: &str) -> Result<Option<PrayerTimes>> {
        let row = conn
            .query_row(
                "SELECT imsak, subuh, dzuhur, ashar, maghrib, isya, firstthird, lastthird
                 FROM schedule_cache WHERE date = ?1",
                params![date],
                |row| {
                    Ok([
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                        row.get::<_, String>(7)?,
                    ])
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some([imsak, subuh, dzuhur, ashar, maghrib, isya, firstthird, lastthird]) => {
                Ok(Some(PrayerTimes {
                    imsak: parse_time(&imsak)?,
                    subuh: parse_time(&subuh)?,
                    dzuhur: parse_time(&dzuhur)?,
                    ashar: parse_time(&ashar)?,
                    maghrib: parse_time(&maghrib)?,
                    isya: parse_time(&isya)?,
                    firstthird: parse_time(&firstthird)?,
                    lastthird: parse_time(&lastthird)?,
                }))
            }
        }
    }

    pub fn store(conn: &Connection, date: &str, times: &PrayerTimes) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO schedule_cache
                (date, imsak, subuh, dzuhur, ashar, maghrib, isya, firstthird, lastthird)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                date,
                format_time(times.imsak),
                format_time(times.subuh),
                format_time(times.dzuhur),
                format_time(times.ashar),
                format_time(times.maghrib),
                format_time(times.isya),
                format_time(times.firstthird),
                format_time(times.lastthird),
            ],
        )?;
        Ok(())
    }

    pub fn clear_all(conn: &Connection) -> Result<()> {
        conn.execute("DELETE FROM schedule_cache", [])?;
        Ok(())
    }
}

// ─── Khatam plan row ─────────────────────────────────────────────────────────

pub struct KhatamRepo;

impl KhatamRepo {
    pub fn get(conn: &Connection) -> Result<Option<KhatamPlan>> {
        let row = conn
            .query_row(
                "SELECT target_days, start_date, progress_ayat FROM khatam_plan WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, u32>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, u32>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((target_days, start_date, progress_ayat)) => {
                let start_date = NaiveDate::parse_from_str(&start_date, "%Y-%m-%d")
                    .map_err(|e| anyhow!("Bad plan start date '{}': {}", start_date, e))?;
                Ok(Some(KhatamPlan { target_days, start_date, progress_ayat }))
            }
        }
    }

    pub fn save(conn: &Connection, plan: &KhatamPlan) -> Result<()> {
        conn.execute(
            "INSERT INTO khatam_plan (id, target_days, start_date, progress_ayat)
             VALUES (1, ?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                target_days = ?1, start_date = ?2, progress_ayat = ?3",
            params![
                plan.target_days,
                plan.start_date.format("%Y-%m-%d").to_string(),
                plan.progress_ayat,
            ],
        )?;
        Ok(())
    }

    pub fn clear(conn: &Connection) -> Result<()> {
        conn.execute("DELETE FROM khatam_plan WHERE id = 1", [])?;
        Ok(())
    }
}

// ─── Reading-time history ────────────────────────────────────────────────────

pub struct ReadingRepo;

impl ReadingRepo {
    /// Write = add seconds onto whatever the day already holds.
    pub fn add_seconds(conn: &Connection, date: &str, seconds: i64) -> Result<()> {
        conn.execute(
            "INSERT INTO reading_log (date, seconds) VALUES (?1, ?2)
             ON CONFLICT(date) DO UPDATE SET seconds = seconds + ?2",
            params![date, seconds],
        )?;
        Ok(())
    }

    pub fn get_day(conn: &Connection, date: &str) -> Result<i64> {
        conn.query_row(
            "SELECT seconds FROM reading_log WHERE date = ?1",
            params![date],
            |row| row.get(0),
        )
        .optional()
        .map(|v| v.unwrap_or(0))
        .map_err(anyhow::Error::from)
    }

    pub fn get_range(conn: &Connection, start: &str, end: &str) -> Result<Vec<(String, i64)>> {
        let mut stmt = conn.prepare(
            "SELECT date, seconds FROM reading_log
             WHERE date >= ?1 AND date <= ?2 ORDER BY date",
        )?;
        let rows = stmt.query_map(params![start, end], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(anyhow::Error::from)
    }

    pub fn total_range(conn: &Connection, start: &str, end: &str) -> Result<i64> {
        conn.query_row(
            "SELECT COALESCE(SUM(seconds), 0) FROM reading_log WHERE date >= ?1 AND date <= ?2",
            params![start, end],
            |row| row.get(0),
        )
        .map_err(anyhow::Error::from)
    }
}

// ─── Bookmarks ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Bookmark {
    pub id: i64,
    pub surah: u32,
    pub ayah: u32,
    pub note: Option<String>,
}

pub struct BookmarkRepo;

impl BookmarkRepo {
    pub fn add(conn: &Connection, surah: u32, ayah: u32, note: Option<&str>) -> Result<i64> {
        conn.execute(
            "INSERT INTO bookmarks (surah, ayah, note) VALUES (?1, ?2, ?3)",
            params![surah, ayah, note],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn list(conn: &Connection) -> Result<Vec<Bookmark>> {
        let mut stmt =
            conn.prepare("SELECT id, surah, ayah, note FROM bookmarks ORDER BY created_at, id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Bookmark {
                id: row.get(0)?,
                surah: row.get(1)?,
                ayah: row.get(2)?,
                note: row.get(3)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(anyhow::Error::from)
    }

    pub fn remove(conn: &Connection, id: i64) -> Result<bool> {
        let affected = conn.execute("DELETE FROM bookmarks WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

// ─── App meta ────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn delete(conn: &Connection, key: &str) -> Result<()> {
        conn.execute("DELETE FROM app_meta WHERE key = ?1", params![key])?;
        Ok(())
    }
}
