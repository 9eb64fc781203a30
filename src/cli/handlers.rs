use anyhow::{Context, Result};
use chrono::Local;
use log::debug;
use rusqlite::Connection;

use crate::cli::args::{BookmarkCommands, KhatamCommands, ScheduleCommands};
use crate::config::AppConfig;
use crate::db::repository::{BookmarkRepo, MetaRepo, ReadingRepo, ScheduleRepo};
use crate::hero::{select_mode, HeroView};
use crate::khatam::KhatamStore;
use crate::models::quran::{self, TOTAL_AYAT};
use crate::models::{KhatamStats, PaceStatus};
use crate::schedule::ingest;
use crate::utils::format::{format_duration_secs, progress_bar};
use crate::utils::hijri;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

const LAST_READ_KEY: &str = "last_read";

fn today_string() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(conn: &Connection, config: &AppConfig) -> Result<()> {
    let now = Local::now().naive_local();
    let today = now.date();
    let today_str = today.format("%Y-%m-%d").to_string();

    println!();
    println_colored!(
        GOLD,
        "  {} — {}  ({})",
        config.location.city,
        today_str,
        hijri::hijri_heading(today, config.schedule.hijri_offset)
    );
    println!();

    let Some(times) = ScheduleRepo::get_for_date(conn, &today_str)? else {
        println_colored!(
            AMBER,
            "  No schedule cached for today. Import one with `iftar schedule import <file>`."
        );
        println!();
        return Ok(());
    };

    for (name, time) in times.rows() {
        let time_str = time.format("%H:%M").to_string();
        if time < now.time() {
            println_colored!(DIM, "  {:<12}  {}", name, time_str);
        } else {
            println_colored!(BOLD, "  {:<12}  {}", name, time_str);
        }
    }

    let view = select_mode(&times, now);
    println!();
    match &view.time_left {
        Some(left) => println_colored!(
            view.mode.accent(),
            "  {} — {}",
            view.label,
            left
        ),
        None => println_colored!(view.mode.accent(), "  {}", view.label),
    }
    println!();
    Ok(())
}

// ─── Hero card ───────────────────────────────────────────────────────────────

pub fn handle_hero(conn: &Connection, watch: bool, interval: u64) -> Result<()> {
    if !watch {
        return print_hero_once(conn);
    }

    // The recurring tick lives here, owned by the command; the selector
    // itself is pure and re-evaluated from scratch on every iteration.
    // Interrupting the process is how the owner cancels the timer.
    let interval = interval.max(1);
    loop {
        print!("\x1b[2J\x1b[H");
        print_hero_once(conn)?;
        println_colored!(DIM, "  refreshing every {}s — Ctrl+C to stop", interval);
        std::thread::sleep(std::time::Duration::from_secs(interval));
    }
}

fn print_hero_once(conn: &Connection) -> Result<()> {
    let now = Local::now().naive_local();
    let today_str = now.date().format("%Y-%m-%d").to_string();

    println!();
    let Some(times) = ScheduleRepo::get_for_date(conn, &today_str)? else {
        println_colored!(
            AMBER,
            "  Loading... no schedule cached for today. Run `iftar schedule import <file>`."
        );
        println!();
        return Ok(());
    };

    render_hero(&select_mode(&times, now));
    Ok(())
}

fn render_hero(view: &HeroView) {
    let accent = view.mode.accent();
    println_colored!(accent, "  {}", view.label);
    println_colored!(DIM, "  {}", view.sublabel);
    println!();

    if let (Some(label), Some(left)) = (view.countdown_label, &view.time_left) {
        println_colored!(BOLD, "  {}: {}", label, left);
    }

    if let Some(progress) = &view.progress {
        println!(
            "  {}  {:.0}%",
            progress_bar(progress.value, 24),
            progress.value
        );
        println_colored!(DIM, "  {} → {}", progress.start_label, progress.end_label);
    }
    println!();
}

// ─── Schedule cache ──────────────────────────────────────────────────────────

pub fn handle_schedule(
    conn: &Connection,
    config: &AppConfig,
    action: &ScheduleCommands,
) -> Result<()> {
    match action {
        ScheduleCommands::Import { file } => {
            let json = std::fs::read_to_string(file)
                .with_context(|| format!("Reading schedule file '{}'", file))?;
            let summary = ingest::import_document(conn, &json, config.schedule.offset_minutes)?;
            let location = summary.location.as_deref().unwrap_or(&config.location.city);
            println_colored!(
                GREEN,
                "  ✓ Imported {} days for {} (offset {:+} min)",
                summary.days,
                location,
                config.schedule.offset_minutes
            );
        }
        ScheduleCommands::Clear => {
            ScheduleRepo::clear_all(conn)?;
            println_colored!(AMBER, "  Schedule cache cleared");
        }
    }
    Ok(())
}

// ─── Khatam plan ─────────────────────────────────────────────────────────────

pub fn handle_khatam(
    conn: &Connection,
    config: &AppConfig,
    action: &KhatamCommands,
) -> Result<()> {
    let today = Local::now().date_naive();
    let mut store = KhatamStore::new(conn);
    store.subscribe(|plan| debug!("khatam plan updated: {:?}", plan));

    match action {
        KhatamCommands::Start { days } => {
            let days = days.unwrap_or(config.khatam.default_target_days);
            if store.get()?.is_some() {
                println_colored!(AMBER, "  Replacing the existing plan");
            }
            let plan = store.create(days, today)?;
            let stats = KhatamStats::compute(&plan, today);
            println_colored!(
                GREEN,
                "  ✓ Khatam plan started: {} ayat in {} days (~{} ayat/day)",
                TOTAL_AYAT,
                days,
                stats.target_ayat_per_day
            );
        }
        KhatamCommands::Status => match store.get()? {
            None => {
                println_colored!(
                    DIM,
                    "  No khatam plan. Start one with `iftar khatam start 30`."
                );
            }
            Some(plan) => {
                let stats = KhatamStats::compute(&plan, today);
                println!();
                println_colored!(GOLD, "  Khatam Plan — {} days", plan.target_days);
                println!();
                println!(
                    "  {}  {}%",
                    progress_bar(stats.percentage, 24),
                    stats.percentage_display()
                );
                println!(
                    "  Progress:   {} / {} ayat ({} remaining)",
                    plan.progress_ayat, TOTAL_AYAT, stats.ayat_remaining
                );
                println!(
                    "  Days:       {} elapsed, {} remaining",
                    stats.days_elapsed, stats.days_remaining
                );
                println!("  Pace:       {} ayat/day needed", stats.target_ayat_per_day);

                let status_color = match stats.status {
                    PaceStatus::Behind => RED,
                    PaceStatus::OnTrack => GREEN,
                    PaceStatus::Ahead => GOLD,
                };
                println_colored!(status_color, "  Status:     {}", stats.status.display_name());
                println!();
                println_colored!(DIM, "  {}", stats.recommendation);
                if plan.is_complete() {
                    println!();
                    println_colored!(
                        GOLD,
                        "  🎉 Khatam complete! Run `iftar khatam reset` to begin again."
                    );
                }
                println!();
            }
        },
        KhatamCommands::Mark { surah, ayah } => {
            let absolute = quran::absolute_ayah(*surah, *ayah)?;
            match store.set_progress(absolute)? {
                None => println_colored!(
                    DIM,
                    "  No khatam plan. Start one with `iftar khatam start 30`."
                ),
                Some(plan) => {
                    MetaRepo::set(conn, LAST_READ_KEY, &format!("{}:{}", surah, ayah))?;
                    if plan.is_complete() {
                        println_colored!(GOLD, "  🎉 Khatam complete! MashaAllah.");
                    } else {
                        println_colored!(
                            GREEN,
                            "  ✓ Marked {}:{} — {} / {} ayat",
                            surah,
                            ayah,
                            plan.progress_ayat,
                            TOTAL_AYAT
                        );
                    }
                }
            }
        }
        KhatamCommands::Add { ayat } => match store.add_progress(*ayat)? {
            None => println_colored!(
                DIM,
                "  No khatam plan. Start one with `iftar khatam start 30`."
            ),
            Some(plan) => {
                if plan.is_complete() {
                    println_colored!(GOLD, "  🎉 Khatam complete! MashaAllah.");
                } else {
                    println_colored!(
                        GREEN,
                        "  ✓ Added {} ayat — {} / {}",
                        ayat,
                        plan.progress_ayat,
                        TOTAL_AYAT
                    );
                }
            }
        },
        KhatamCommands::Reset => {
            store.clear()?;
            MetaRepo::delete(conn, LAST_READ_KEY)?;
            println_colored!(AMBER, "  Khatam plan cleared");
        }
    }
    Ok(())
}

// ─── Reading time ────────────────────────────────────────────────────────────

pub fn handle_read(conn: &Connection, minutes: u32) -> Result<()> {
    let today = today_string();
    ReadingRepo::add_seconds(conn, &today, minutes as i64 * 60)?;
    let total = ReadingRepo::get_day(conn, &today)?;
    println_colored!(
        GREEN,
        "  ✓ Logged {}m — today's total: {}",
        minutes,
        format_duration_secs(total)
    );
    Ok(())
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn handle_stats(conn: &Connection, week: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let today_str = today.format("%Y-%m-%d").to_string();
    let week_start = today - chrono::Duration::days(6);
    let week_start_str = week_start.format("%Y-%m-%d").to_string();

    let today_secs = ReadingRepo::get_day(conn, &today_str)?;
    let weekly_secs = ReadingRepo::total_range(conn, &week_start_str, &today_str)?;

    println!();
    println_colored!(GOLD, "  Reading Statistics");
    println!();
    println!("  Today:       {}", format_duration_secs(today_secs));
    println!("  Last 7 days: {}", format_duration_secs(weekly_secs));

    if let Some(last_read) = MetaRepo::get(conn, LAST_READ_KEY)? {
        println!("  Last read:   {}", last_read);
    }

    let store = KhatamStore::new(conn);
    if let Some(stats) = store.stats(today)? {
        println!();
        println_colored!(
            BOLD,
            "  Khatam:      {}% — {} ayat/day needed",
            stats.percentage_display(),
            stats.target_ayat_per_day
        );
    }

    if week {
        println!();
        println_colored!(DIM, "  Last 7 days  (● ≥ 30m, ◕ ≥ 15m, ◑ > 0, ○ none)");
        println!();
        let logged = ReadingRepo::get_range(conn, &week_start_str, &today_str)?;
        print!("  ");
        for i in 0..7 {
            let date = (week_start + chrono::Duration::days(i)).format("%Y-%m-%d").to_string();
            let secs = logged.iter().find(|(d, _)| *d == date).map(|(_, s)| *s).unwrap_or(0);
            let icon = match secs {
                s if s >= 1800 => format!("{}●\x1b[0m ", GREEN),
                s if s >= 900 => format!("{}◕\x1b[0m ", AMBER),
                s if s > 0 => format!("{}◑\x1b[0m ", AMBER),
                _ => format!("{}○\x1b[0m ", DIM),
            };
            print!("{}", icon);
        }
        println!();
    }

    println!();
    Ok(())
}

// ─── Bookmarks ───────────────────────────────────────────────────────────────

pub fn handle_bookmark(conn: &Connection, action: &BookmarkCommands) -> Result<()> {
    match action {
        BookmarkCommands::Add { surah, ayah, note } => {
            // Range-check before storing; the indexer rejects bad positions.
            quran::absolute_ayah(*surah, *ayah)?;
            BookmarkRepo::add(conn, *surah, *ayah, note.as_deref())?;
            println_colored!(GREEN, "  ✓ Bookmarked {}:{}", surah, ayah);
        }
        BookmarkCommands::List => {
            let bookmarks = BookmarkRepo::list(conn)?;
            println!();
            if bookmarks.is_empty() {
                println_colored!(DIM, "  No bookmarks yet");
            } else {
                println_colored!(GOLD, "  Bookmarks");
                println!();
                for b in &bookmarks {
                    match &b.note {
                        Some(note) => println!("  [{}]  {}:{} — {}", b.id, b.surah, b.ayah, note),
                        None => println!("  [{}]  {}:{}", b.id, b.surah, b.ayah),
                    }
                }
            }
            println!();
        }
        BookmarkCommands::Remove { id } => {
            if BookmarkRepo::remove(conn, *id)? {
                println_colored!(AMBER, "  Bookmark {} removed", id);
            } else {
                println_colored!(DIM, "  No bookmark with id {}", id);
            }
        }
    }
    Ok(())
}

// ─── Config ──────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
struct ConfigChanges {
    saved: bool,
    offset_changed: bool,
}

fn apply_config_updates(
    config: &mut AppConfig,
    city: Option<String>,
    offset: Option<i32>,
    hijri_offset: Option<i32>,
) -> ConfigChanges {
    let mut saved = false;
    let offset_changed = offset.is_some();
    if let Some(city) = city {
        config.location.city = city;
        saved = true;
    }
    if let Some(offset) = offset {
        config.schedule.offset_minutes = offset;
        saved = true;
    }
    if let Some(hijri_offset) = hijri_offset {
        config.schedule.hijri_offset = hijri_offset;
        saved = true;
    }
    ConfigChanges { saved, offset_changed }
}

pub fn handle_config(
    config: &mut AppConfig,
    city: Option<String>,
    offset: Option<i32>,
    hijri_offset: Option<i32>,
) -> Result<()> {
    let changes = apply_config_updates(config, city, offset, hijri_offset);

    if changes.saved {
        config.save()?;
        println_colored!(GREEN, "  ✓ Configuration saved");
    }

    println!();
    println!("  City:          {}", config.location.city);
    println!("  Country:       {}", config.location.country);
    println!("  Time offset:   {:+} min", config.schedule.offset_minutes);
    println!("  Hijri offset:  {:+} days", config.schedule.hijri_offset);
    println!("  Khatam target: {} days", config.khatam.default_target_days);
    println!();

    // Cached days keep the offset they were imported with, so any offset
    // change needs a reimport — regardless of the value it lands on.
    if changes.offset_changed {
        println_colored!(
            DIM,
            "  Offset changes apply at import time — run `iftar schedule clear` and reimport."
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_offset_change_needs_a_reimport_hint() {
        let mut config = AppConfig::default();
        config.schedule.offset_minutes = 5;

        // Switching back to the default value still invalidates the cache.
        let changes = apply_config_updates(&mut config, None, Some(3), None);
        assert_eq!(config.schedule.offset_minutes, 3);
        assert_eq!(changes, ConfigChanges { saved: true, offset_changed: true });
    }

    #[test]
    fn city_only_change_does_not_hint_reimport() {
        let mut config = AppConfig::default();
        config.schedule.offset_minutes = 5;

        let changes =
            apply_config_updates(&mut config, Some("Bandung".to_string()), None, None);
        assert_eq!(config.location.city, "Bandung");
        assert_eq!(config.schedule.offset_minutes, 5);
        assert_eq!(changes, ConfigChanges { saved: true, offset_changed: false });
    }

    #[test]
    fn no_arguments_saves_nothing() {
        let mut config = AppConfig::default();
        let changes = apply_config_updates(&mut config, None, None, None);
        assert_eq!(changes, ConfigChanges { saved: false, offset_changed: false });
    }
}
