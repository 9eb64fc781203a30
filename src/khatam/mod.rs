//! Single owner of the persisted khatam plan.
//!
//! All mutations go through the store so that progress stays clamped to
//! [0, TOTAL_AYAT] and every write notifies subscribers. Reads are
//! synchronous; stats are derived on demand and never stored.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use log::info;
use rusqlite::Connection;

use crate::db::repository::KhatamRepo;
use crate::models::quran::TOTAL_AYAT;
use crate::models::{KhatamPlan, KhatamStats};

type Subscriber = Box<dyn Fn(Option<&KhatamPlan>)>;

pub struct KhatamStore<'c> {
    conn: &'c Connection,
    subscribers: Vec<Subscriber>,
}

impl<'c> KhatamStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn, subscribers: Vec::new() }
    }

    /// Register an observer called after every mutation with the new plan
    /// state (None after a clear). Single-threaded; callbacks run inline.
    pub fn subscribe<F>(&mut self, f: F)
    where
        F: Fn(Option<&KhatamPlan>) + 'static,
    {
        self.subscribers.push(Box::new(f));
    }

    fn notify(&self, plan: Option<&KhatamPlan>) {
        for sub in &self.subscribers {
            sub(plan);
        }
    }

    pub fn get(&self) -> Result<Option<KhatamPlan>> {
        KhatamRepo::get(self.conn)
    }

    /// Create a fresh plan starting today. Replaces any existing plan.
    pub fn create(&self, target_days: u32, today: NaiveDate) -> Result<KhatamPlan> {
        if target_days == 0 {
            bail!("Khatam target must be at least 1 day");
        }
        let plan = KhatamPlan { target_days, start_date: today, progress_ayat: 0 };
        KhatamRepo::save(self.conn, &plan)?;
        info!("khatam plan created: {} days from {}", target_days, today);
        self.notify(Some(&plan));
        Ok(plan)
    }

    /// Overwrite progress with an absolute ayah count, clamped to
    /// [0, TOTAL_AYAT]. Used when the reader jumps to a position.
    pub fn set_progress(&self, absolute_ayat: u32) -> Result<Option<KhatamPlan>> {
        let Some(mut plan) = KhatamRepo::get(self.conn)? else {
            return Ok(None);
        };
        plan.progress_ayat = absolute_ayat.min(TOTAL_AYAT);
        KhatamRepo::save(self.conn, &plan)?;
        self.notify(Some(&plan));
        Ok(Some(plan))
    }

    /// Sequential increment, clamped at the TOTAL_AYAT upper bound.
    pub fn add_progress(&self, delta_ayat: u32) -> Result<Option<KhatamPlan>> {
        let Some(mut plan) = KhatamRepo::get(self.conn)? else {
            return Ok(None);
        };
        plan.progress_ayat = plan.progress_ayat.saturating_add(delta_ayat).min(TOTAL_AYAT);
        KhatamRepo::save(self.conn, &plan)?;
        self.notify(Some(&plan));
        Ok(Some(plan))
    }

    pub fn clear(&self) -> Result<()> {
        KhatamRepo::clear(self.conn)?;
        info!("khatam plan cleared");
        self.notify(None);
        Ok(())
    }

    /// Derived stats for the current plan, or None when no plan exists.
    pub fn stats(&self, today: NaiveDate) -> Result<Option<KhatamStats>> {
        Ok(self.get()?.map(|plan| KhatamStats::compute(&plan, today)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use std::cell::Cell;
    use std::rc::Rc;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 19).unwrap()
    }

    #[test]
    fn create_then_clear_leaves_no_plan() {
        let conn = test_conn();
        let store = KhatamStore::new(&conn);
        store.create(30, today()).unwrap();
        assert!(store.get().unwrap().is_some());
        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());
        assert!(store.stats(today()).unwrap().is_none());
    }

    #[test]
    fn rejects_zero_day_target() {
        let conn = test_conn();
        let store = KhatamStore::new(&conn);
        assert!(store.create(0, today()).is_err());
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn progress_clamps_at_total() {
        let conn = test_conn();
        let store = KhatamStore::new(&conn);
        store.create(30, today()).unwrap();

        let plan = store.set_progress(9999).unwrap().unwrap();
        assert_eq!(plan.progress_ayat, TOTAL_AYAT);
        assert!(plan.is_complete());

        // Further increments never exceed the bound.
        let plan = store.add_progress(100).unwrap().unwrap();
        assert_eq!(plan.progress_ayat, TOTAL_AYAT);
    }

    #[test]
    fn add_progress_accumulates() {
        let conn = test_conn();
        let store = KhatamStore::new(&conn);
        store.create(30, today()).unwrap();
        store.add_progress(7).unwrap();
        let plan = store.add_progress(286).unwrap().unwrap();
        assert_eq!(plan.progress_ayat, 293);
    }

    #[test]
    fn mutations_without_a_plan_are_noops() {
        let conn = test_conn();
        let store = KhatamStore::new(&conn);
        assert!(store.set_progress(10).unwrap().is_none());
        assert!(store.add_progress(10).unwrap().is_none());
    }

    #[test]
    fn every_mutation_notifies_subscribers() {
        let conn = test_conn();
        let mut store = KhatamStore::new(&conn);
        let seen = Rc::new(Cell::new(0u32));
        let last_progress = Rc::new(Cell::new(0u32));
        {
            let seen = Rc::clone(&seen);
            let last = Rc::clone(&last_progress);
            store.subscribe(move |plan| {
                seen.set(seen.get() + 1);
                last.set(plan.map(|p| p.progress_ayat).unwrap_or(0));
            });
        }

        store.create(30, today()).unwrap();
        store.add_progress(50).unwrap();
        store.set_progress(200).unwrap();
        store.clear().unwrap();

        assert_eq!(seen.get(), 4);
        assert_eq!(last_progress.get(), 0); // clear reported None
    }

    #[test]
    fn fresh_plan_stats_match_spec_example() {
        let conn = test_conn();
        let store = KhatamStore::new(&conn);
        store.create(30, today()).unwrap();
        let stats = store.stats(today()).unwrap().unwrap();
        assert_eq!(stats.days_remaining, 30);
        assert_eq!(stats.ayat_remaining, 6236);
        assert_eq!(stats.percentage_display(), "0.0");
    }
}
