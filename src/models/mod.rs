pub mod khatam;
pub mod quran;
pub mod schedule;

pub use khatam::{KhatamPlan, KhatamStats, PaceStatus};
pub use schedule::PrayerTimes;
