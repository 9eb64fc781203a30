use thiserror::Error;

/// Total ayat in the Quran; a khatam plan is complete at this count.
pub const TOTAL_AYAT: u32 = 6236;

pub const SURAH_COUNT: u32 = 114;

/// Ayah count per surah, from 1 (Al-Fatihah) to 114 (An-Nas).
pub const SURAH_AYAH_COUNTS: [u32; 114] = [
    7, 286, 200, 176, 120, 165, 206, 75, 129, 109, 123, 111, 43, 52, 99, 128, 111, 110, 98, 135,
    112, 78, 118, 64, 77, 227, 93, 88, 69, 60, 34, 30, 73, 54, 45, 83, 182, 88, 75, 85, 54, 53,
    89, 59, 37, 35, 38, 29, 18, 45, 60, 49, 62, 55, 78, 96, 29, 22, 24, 13, 14, 11, 11, 18, 12,
    12, 30, 52, 52, 44, 28, 28, 20, 56, 40, 31, 50, 40, 46, 42, 29, 19, 36, 25, 22, 17, 19, 26,
    30, 20, 15, 21, 11, 8, 8, 19, 5, 8, 8, 11, 11, 8, 3, 9, 5, 4, 7, 3, 6, 3, 5, 4, 5, 6,
];

const fn build_prefix_sums() -> [u32; 114] {
    let mut table = [0u32; 114];
    let mut i = 1;
    while i < 114 {
        table[i] = table[i - 1] + SURAH_AYAH_COUNTS[i - 1];
        i += 1;
    }
    table
}

/// AYAT_BEFORE[i] = total ayat in all surahs strictly before surah i+1.
const AYAT_BEFORE: [u32; 114] = build_prefix_sums();

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuranError {
    #[error("surah {0} out of range (expected 1-114)")]
    SurahOutOfRange(u32),
    #[error("ayah {ayah} out of range for surah {surah} (expected 1-{max})")]
    AyahOutOfRange { surah: u32, ayah: u32, max: u32 },
}

pub fn ayah_count(surah: u32) -> Result<u32, QuranError> {
    if surah < 1 || surah > SURAH_COUNT {
        return Err(QuranError::SurahOutOfRange(surah));
    }
    Ok(SURAH_AYAH_COUNTS[(surah - 1) as usize])
}

/// Maps a (surah, ayah) position onto the absolute 1..=6236 scale.
///
/// Out-of-range input is rejected rather than clamped so that upstream
/// bookkeeping bugs surface early.
pub fn absolute_ayah(surah: u32, ayah: u32) -> Result<u32, QuranError> {
    let max = ayah_count(surah)?;
    if ayah < 1 || ayah > max {
        return Err(QuranError::AyahOutOfRange { surah, ayah, max });
    }
    Ok(AYAT_BEFORE[(surah - 1) as usize] + ayah)
}

/// Completion check on the absolute scale.
pub fn is_khatam(absolute: u32) -> bool {
    absolute >= TOTAL_AYAT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_sum_to_total() {
        let sum: u32 = SURAH_AYAH_COUNTS.iter().sum();
        assert_eq!(sum, TOTAL_AYAT);
    }

    #[test]
    fn first_ayah_is_one() {
        assert_eq!(absolute_ayah(1, 1).unwrap(), 1);
    }

    #[test]
    fn last_ayah_is_total() {
        assert_eq!(absolute_ayah(114, 6).unwrap(), TOTAL_AYAT);
        assert!(is_khatam(absolute_ayah(114, 6).unwrap()));
    }

    #[test]
    fn consecutive_surahs_are_adjacent() {
        for surah in 2..=SURAH_COUNT {
            let prev_last = absolute_ayah(surah - 1, ayah_count(surah - 1).unwrap()).unwrap();
            let first = absolute_ayah(surah, 1).unwrap();
            assert_eq!(first - prev_last, 1, "gap between surah {} and {}", surah - 1, surah);
        }
    }

    #[test]
    fn rejects_out_of_range_surah() {
        assert_eq!(absolute_ayah(0, 1), Err(QuranError::SurahOutOfRange(0)));
        assert_eq!(absolute_ayah(115, 1), Err(QuranError::SurahOutOfRange(115)));
    }

    #[test]
    fn rejects_out_of_range_ayah() {
        // Al-Fatihah has 7 ayat
        assert_eq!(
            absolute_ayah(1, 8),
            Err(QuranError::AyahOutOfRange { surah: 1, ayah: 8, max: 7 })
        );
        assert_eq!(
            absolute_ayah(2, 0),
            Err(QuranError::AyahOutOfRange { surah: 2, ayah: 0, max: 286 })
        );
    }
}
