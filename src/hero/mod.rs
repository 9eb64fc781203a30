//! Classifies "now" into a hero-card display mode from today's schedule.
//!
//! The rules below form an ordered decision list with first-match-wins
//! semantics. The windows overlap on purpose (for example a pre-dawn time
//! is both "past Lastthird" and "before Subuh"); the evaluation order is
//! the tie-break, so the rules must not be reordered or merged into a
//! non-overlapping partition.

use chrono::{Duration, NaiveDateTime, Timelike};

use crate::models::schedule::{format_time, PrayerTimes};
use crate::utils::format::format_countdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroMode {
    Berbuka,
    Tarawih,
    Tahajud,
    PuasaDimulai,
    Dzuhur,
    Ashar,
    Buka,
}

impl HeroMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeroMode::Berbuka => "berbuka",
            HeroMode::Tarawih => "tarawih",
            HeroMode::Tahajud => "tahajud",
            HeroMode::PuasaDimulai => "puasa-dimulai",
            HeroMode::Dzuhur => "dzuhur",
            HeroMode::Ashar => "ashar",
            HeroMode::Buka => "buka",
        }
    }

    /// Opaque per-mode style tag; the CLI renderer maps it to an ANSI colour.
    pub fn accent(&self) -> &'static str {
        match self {
            HeroMode::Berbuka => "\x1b[38;5;204m",
            HeroMode::Tarawih => "\x1b[38;5;135m",
            HeroMode::Tahajud => "\x1b[38;5;245m",
            HeroMode::PuasaDimulai => "\x1b[38;5;214m",
            HeroMode::Dzuhur => "\x1b[38;5;208m",
            HeroMode::Ashar => "\x1b[38;5;221m",
            HeroMode::Buka => "\x1b[38;5;69m",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeroProgress {
    /// 0-100, clamped.
    pub value: f64,
    pub start_label: String,
    pub end_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeroView {
    pub mode: HeroMode,
    pub label: String,
    pub sublabel: String,
    pub countdown_label: Option<&'static str>,
    /// Live "HH:MM:SS" countdown, when the mode has one.
    pub time_left: Option<String>,
    pub progress: Option<HeroProgress>,
}

/// Progress percentage of `elapsed` through `span`, clamped to [0, 100].
fn window_pct(elapsed: Duration, span: Duration) -> f64 {
    if span.num_seconds() <= 0 {
        return 0.0;
    }
    (elapsed.num_seconds() as f64 / span.num_seconds() as f64 * 100.0).clamp(0.0, 100.0)
}

/// Select the hero mode for `now`. Every timing string is interpreted as a
/// time-of-day on now's calendar date; each invocation is independent, so
/// this is safe to call on a once-per-second timer.
pub fn select_mode(times: &PrayerTimes, now: NaiveDateTime) -> HeroView {
    let now_t = now.time();
    let hour = now_t.hour();

    // The Isya window opens slightly before the literal Isya time.
    let isya_start = times.isya.overflowing_sub_signed(Duration::minutes(15)).0;
    let subuh_grace_end = times.subuh.overflowing_add_signed(Duration::minutes(5)).0;

    // 1. Breaking fast: [Maghrib, Isya - 15m)
    if now_t >= times.maghrib && now_t < isya_start {
        return HeroView {
            mode: HeroMode::Berbuka,
            label: "Time to break your fast! 🎉".to_string(),
            sublabel: "Alhamdulillah, today's fast is complete".to_string(),
            countdown_label: None,
            time_left: None,
            progress: None,
        };
    }

    // 2. Night prayer window; the post-midnight hour still counts.
    let late_evening = hour >= 19 && now_t >= isya_start;
    if late_evening || hour == 0 {
        let value = if now_t < times.isya {
            0.0
        } else {
            window_pct(now_t - times.isya, times.firstthird - times.isya)
        };
        return HeroView {
            mode: HeroMode::Tarawih,
            label: "Tarawih time 🕌".to_string(),
            sublabel: "Spirit for tonight's tarawih prayer".to_string(),
            countdown_label: Some("Tarawih window"),
            time_left: None,
            progress: Some(HeroProgress {
                value,
                start_label: format!("Isya {}", format_time(times.isya)),
                end_label: format!("Tahajud {}", format_time(times.firstthird)),
            }),
        };
    }

    // 3. Last third of the night: [Firstthird, Lastthird)
    if now_t >= times.firstthird && now_t < times.lastthird {
        return HeroView {
            mode: HeroMode::Tahajud,
            label: "Tahajud time 🌙".to_string(),
            sublabel: "The last third of the night, the best time for prayer".to_string(),
            countdown_label: Some("Tahajud window"),
            time_left: None,
            progress: Some(HeroProgress {
                value: window_pct(now_t - times.firstthird, times.lastthird - times.firstthird),
                start_label: format!("Tahajud {}", format_time(times.firstthird)),
                end_label: format!("Tahajud {}", format_time(times.lastthird)),
            }),
        };
    }

    // 4. Pre-dawn: [Lastthird, Subuh + 5m). The countdown goes silent once
    //    Subuh has passed but the grace display window is still open.
    if now_t >= times.lastthird && now_t < subuh_grace_end {
        let time_left = if now_t < times.subuh {
            Some(format_countdown(times.subuh - now_t))
        } else {
            None
        };
        return HeroView {
            mode: HeroMode::PuasaDimulai,
            label: "The fast is about to begin 🌅".to_string(),
            sublabel: format!(
                "Subuh at {} — set your fasting intention!",
                format_time(times.subuh)
            ),
            countdown_label: Some("Fast begins in"),
            time_left,
            progress: None,
        };
    }

    // 5. Morning, counting down to Dzuhur.
    if now_t < times.dzuhur {
        let value = if now_t < times.subuh {
            0.0
        } else {
            window_pct(now_t - times.subuh, times.dzuhur - times.subuh)
        };
        return HeroView {
            mode: HeroMode::Dzuhur,
            label: "Towards Dzuhur 🌞".to_string(),
            sublabel: format!("Dzuhur at {}", format_time(times.dzuhur)),
            countdown_label: Some("Towards Dzuhur"),
            time_left: Some(format_countdown(times.dzuhur - now_t)),
            progress: Some(HeroProgress {
                value,
                start_label: format!("Subuh {}", format_time(times.subuh)),
                end_label: format!("Dzuhur {}", format_time(times.dzuhur)),
            }),
        };
    }

    // 6. Early afternoon, counting down to Ashar.
    if now_t < times.ashar {
        let value = if now_t < times.dzuhur {
            0.0
        } else {
            window_pct(now_t - times.dzuhur, times.ashar - times.dzuhur)
        };
        return HeroView {
            mode: HeroMode::Ashar,
            label: "Towards Ashar 🌤".to_string(),
            sublabel: format!("Ashar at {}", format_time(times.ashar)),
            countdown_label: Some("Towards Ashar"),
            time_left: Some(format_countdown(times.ashar - now_t)),
            progress: Some(HeroProgress {
                value,
                start_label: format!("Dzuhur {}", format_time(times.dzuhur)),
                end_label: format!("Ashar {}", format_time(times.ashar)),
            }),
        };
    }

    // 7. Default: counting down to breaking fast at Maghrib.
    let passed = now_t - times.ashar;
    let value = if passed <= Duration::zero() {
        0.0
    } else {
        window_pct(passed, times.maghrib - times.ashar)
    };
    HeroView {
        mode: HeroMode::Buka,
        label: "Towards Iftar".to_string(),
        sublabel: format!("Maghrib at {}", format_time(times.maghrib)),
        countdown_label: Some("Towards Iftar"),
        time_left: Some(format_countdown(times.maghrib - now_t)),
        progress: Some(HeroProgress {
            value,
            start_label: format!("Ashar {}", format_time(times.ashar)),
            end_label: format!("Maghrib {}", format_time(times.maghrib)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn schedule() -> PrayerTimes {
        PrayerTimes {
            imsak: t(4, 20),
            subuh: t(4, 30),
            dzuhur: t(12, 0),
            ashar: t(15, 15),
            maghrib: t(18, 0),
            isya: t(19, 0),
            firstthird: t(22, 6),
            lastthird: t(2, 52),
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap().and_time(t(h, m))
    }

    #[test]
    fn afternoon_counts_down_to_iftar() {
        let view = select_mode(&schedule(), at(17, 0));
        assert_eq!(view.mode, HeroMode::Buka);
        assert_eq!(view.time_left.as_deref(), Some("01:00:00"));
        // (17:00 - 15:15) / (18:00 - 15:15) = 105 / 165
        let expected = 105.0 / 165.0 * 100.0;
        let value = view.progress.unwrap().value;
        assert!((value - expected).abs() < 1e-9, "value was {}", value);
    }

    #[test]
    fn maghrib_boundary_is_inclusive() {
        let view = select_mode(&schedule(), at(18, 0));
        assert_eq!(view.mode, HeroMode::Berbuka);
        assert_eq!(view.time_left, None);
        assert_eq!(view.progress, None);
    }

    #[test]
    fn berbuka_ends_before_isya_window_opens() {
        // isya_start = 18:45
        assert_eq!(select_mode(&schedule(), at(18, 44)).mode, HeroMode::Berbuka);
        assert_eq!(select_mode(&schedule(), at(18, 45)).mode, HeroMode::Buka);
    }

    #[test]
    fn midnight_is_always_tarawih() {
        let view = select_mode(&schedule(), at(0, 0));
        assert_eq!(view.mode, HeroMode::Tarawih);
        // Post-midnight is before today's Isya instant, so progress resets.
        assert_eq!(view.progress.unwrap().value, 0.0);
    }

    #[test]
    fn evening_tarawih_progress_spans_isya_to_firstthird() {
        // isya 19:00, firstthird 22:06 → at 20:33 exactly half the window
        let view = select_mode(&schedule(), at(20, 33));
        assert_eq!(view.mode, HeroMode::Tarawih);
        let value = view.progress.unwrap().value;
        assert!((value - 50.0).abs() < 1e-9, "value was {}", value);
    }

    #[test]
    fn pre_dawn_counts_down_to_subuh() {
        let view = select_mode(&schedule(), at(3, 30));
        assert_eq!(view.mode, HeroMode::PuasaDimulai);
        assert_eq!(view.time_left.as_deref(), Some("01:00:00"));
    }

    #[test]
    fn grace_window_after_subuh_has_no_countdown() {
        // Subuh 04:30, grace until 04:35
        let view = select_mode(&schedule(), at(4, 32));
        assert_eq!(view.mode, HeroMode::PuasaDimulai);
        assert_eq!(view.time_left, None);
        assert_eq!(select_mode(&schedule(), at(4, 35)).mode, HeroMode::Dzuhur);
    }

    #[test]
    fn morning_spans_subuh_to_dzuhur() {
        let view = select_mode(&schedule(), at(9, 0));
        assert_eq!(view.mode, HeroMode::Dzuhur);
        assert_eq!(view.time_left.as_deref(), Some("03:00:00"));
        let progress = view.progress.unwrap();
        // (09:00 - 04:30) / (12:00 - 04:30) = 270 / 450
        assert!((progress.value - 60.0).abs() < 1e-9);
        assert_eq!(progress.start_label, "Subuh 04:30");
    }

    #[test]
    fn early_afternoon_counts_down_to_ashar() {
        let view = select_mode(&schedule(), at(13, 0));
        assert_eq!(view.mode, HeroMode::Ashar);
        assert_eq!(view.time_left.as_deref(), Some("02:15:00"));
    }

    #[test]
    fn late_maghrib_gap_clamps_to_default_mode() {
        // 18:50 is past isya_start (18:45) but before hour 19, so no rule
        // matches until the default; its countdown clamps at zero.
        let view = select_mode(&schedule(), at(18, 50));
        assert_eq!(view.mode, HeroMode::Buka);
        assert_eq!(view.time_left.as_deref(), Some("00:00:00"));
        assert_eq!(view.progress.unwrap().value, 100.0);
    }

    #[test]
    fn tahajud_window_fires_when_thirds_are_same_day() {
        // A schedule whose night thirds both land pre-dawn on the clock.
        let mut s = schedule();
        s.firstthird = t(1, 0);
        s.lastthird = t(2, 52);
        let view = select_mode(&s, at(1, 56));
        assert_eq!(view.mode, HeroMode::Tahajud);
        let value = view.progress.unwrap().value;
        assert!((value - 50.0).abs() < 1e-9, "value was {}", value);
    }

    #[test]
    fn mode_tags_are_stable() {
        assert_eq!(HeroMode::PuasaDimulai.as_str(), "puasa-dimulai");
        assert_eq!(HeroMode::Buka.as_str(), "buka");
    }
}
