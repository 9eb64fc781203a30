use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::quran::TOTAL_AYAT;

/// A complete-reading plan. Single instance per device; owned by the
/// khatam store, which clamps all mutations to [0, TOTAL_AYAT].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KhatamPlan {
    pub target_days: u32,
    pub start_date: NaiveDate,
    pub progress_ayat: u32,
}

impl KhatamPlan {
    pub fn is_complete(&self) -> bool {
        self.progress_ayat >= TOTAL_AYAT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaceStatus {
    Behind,
    OnTrack,
    Ahead,
}

impl PaceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaceStatus::Behind => "BEHIND",
            PaceStatus::OnTrack => "ON_TRACK",
            PaceStatus::Ahead => "AHEAD",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaceStatus::Behind => "Behind schedule",
            PaceStatus::OnTrack => "On track",
            PaceStatus::Ahead => "Ahead of schedule",
        }
    }
}

/// Derived pace statistics. Recomputed from the plan on every read,
/// never persisted.
#[derive(Debug, Clone)]
pub struct KhatamStats {
    pub days_elapsed: u32,
    pub days_remaining: u32,
    pub ayat_remaining: u32,
    pub target_ayat_per_day: u32,
    pub status: PaceStatus,
    pub recommendation: String,
    pub percentage: f64,
}

/// Ayat either side of the ideal linear pace that still count as on track.
/// Prevents the status from flapping on small daily variance.
const PACE_DEAD_BAND: i64 = 50;

impl KhatamStats {
    pub fn compute(plan: &KhatamPlan, today: NaiveDate) -> KhatamStats {
        let days_elapsed = (today - plan.start_date).num_days().max(0) as u32;
        // Floor at 1 so the pace division below can never divide by zero,
        // even after the deadline has passed.
        let days_remaining = plan.target_days.saturating_sub(days_elapsed).max(1);
        let ayat_remaining = TOTAL_AYAT.saturating_sub(plan.progress_ayat);
        let target_ayat_per_day = ayat_remaining.div_ceil(days_remaining);

        // Idealized linear-pace checkpoint for the days elapsed so far.
        let expected = (TOTAL_AYAT as u64 * days_elapsed as u64)
            .div_ceil(plan.target_days.max(1) as u64) as i64;
        let progress = plan.progress_ayat as i64;

        let status = if progress < expected - PACE_DEAD_BAND {
            PaceStatus::Behind
        } else if progress > expected + PACE_DEAD_BAND {
            PaceStatus::Ahead
        } else {
            PaceStatus::OnTrack
        };

        let recommendation = match status {
            PaceStatus::Behind => format!(
                "Your daily target is now {} ayat. Try splitting it across the five \
                 daily prayers (about {} ayat after each).",
                target_ayat_per_day,
                target_ayat_per_day.div_ceil(5)
            ),
            PaceStatus::Ahead => {
                "MashaAllah, you are reading faster than the target! Keep this relaxed rhythm."
                    .to_string()
            }
            PaceStatus::OnTrack => format!(
                "Great consistency! Keep reading about {} ayat every day.",
                target_ayat_per_day
            ),
        };

        KhatamStats {
            days_elapsed,
            days_remaining,
            ayat_remaining,
            target_ayat_per_day,
            status,
            recommendation,
            percentage: plan.progress_ayat as f64 / TOTAL_AYAT as f64 * 100.0,
        }
    }

    /// Percentage rendered to one decimal place, e.g. "42.7".
    pub fn percentage_display(&self) -> String {
        format!("{:.1}", self.percentage)
    }
}
