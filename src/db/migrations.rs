use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schedule_cache (
            date       TEXT PRIMARY KEY,
            imsak      TEXT NOT NULL,
            subuh      TEXT NOT NULL,
            dzuhur     TEXT NOT NULL,
            ashar      TEXT NOT NULL,
            maghrib    TEXT NOT NULL,
            isya       TEXT NOT NULL,
            firstthird TEXT NOT NULL,
            lastthird  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS khatam_plan (
            id            INTEGER PRIMARY KEY CHECK(id = 1),
            target_days   INTEGER NOT NULL,
            start_date    TEXT NOT NULL,
            progress_ayat INTEGER NOT NULL DEFAULT 0,
            created_at    TEXT DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS reading_log (
            date    TEXT PRIMARY KEY,
            seconds INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS bookmarks (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            surah      INTEGER NOT NULL,
            ayah       INTEGER NOT NULL,
            note       TEXT,
            created_at TEXT DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS app_meta (
            key   TEXT PRIMARY KEY,
            value TEXT
        );
    ",
    )?;
    Ok(())
}
