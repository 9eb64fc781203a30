use anyhow::{anyhow, Result};
use chrono::NaiveTime;

/// The eight named times of one day's schedule, already normalized to the
/// local "HH:mm" clock by the ingestion layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrayerTimes {
    pub imsak: NaiveTime,
    pub subuh: NaiveTime,
    pub dzuhur: NaiveTime,
    pub ashar: NaiveTime,
    pub maghrib: NaiveTime,
    pub isya: NaiveTime,
    /// End of the first third of the night.
    pub firstthird: NaiveTime,
    /// Start of the last third of the night.
    pub lastthird: NaiveTime,
}

impl PrayerTimes {
    /// Display order for schedule listings.
    pub fn rows(&self) -> [(&'static str, NaiveTime); 8] {
        [
            ("Imsak", self.imsak),
            ("Subuh", self.subuh),
            ("Dzuhur", self.dzuhur),
            ("Ashar", self.ashar),
            ("Maghrib", self.maghrib),
            ("Isya", self.isya),
            ("Firstthird", self.firstthird),
            ("Lastthird", self.lastthird),
        ]
    }
}

pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| anyhow!("Bad time '{}': {}", s, e))
}

pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Maps a provider timing key onto our canonical name. Providers disagree
/// on the Arabic transliteration (Fajr vs Subuh, Asr vs Ashar, ...).
pub fn canonical_key(key: &str) -> Option<&'static str> {
    match key.to_ascii_lowercase().as_str() {
        "imsak" => Some("Imsak"),
        "subuh" | "fajr" => Some("Subuh"),
        "dzuhur" | "dhuhr" | "zuhr" => Some("Dzuhur"),
        "ashar" | "asr" => Some("Ashar"),
        "maghrib" => Some("Maghrib"),
        "isya" | "isha" => Some("Isya"),
        "firstthird" => Some("Firstthird"),
        "lastthird" => Some("Lastthird"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_clock_strings() {
        assert_eq!(parse_time("04:41").unwrap(), NaiveTime::from_hms_opt(4, 41, 0).unwrap());
        assert!(parse_time("4h41").is_err());
    }

    #[test]
    fn provider_aliases_normalize() {
        assert_eq!(canonical_key("Fajr"), Some("Subuh"));
        assert_eq!(canonical_key("Dhuhr"), Some("Dzuhur"));
        assert_eq!(canonical_key("Asr"), Some("Ashar"));
        assert_eq!(canonical_key("Isha"), Some("Isya"));
        assert_eq!(canonical_key("Lastthird"), Some("Lastthird"));
        assert_eq!(canonical_key("Sunset"), None);
    }
}
