//! The result value returned by every save

use crate::strategy::SaveStrategy;
use std::time::Duration;

/// Outcome of one save call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveLog {
    /// Elapsed time as `MM:SS:mmm`
    pub save_time: String,
    pub elapsed: Duration,
    /// Strategy used for a path save; `None` for sink saves
    pub strategy: Option<SaveStrategy>,
    /// Bytes that reached the destination
    pub bytes_written: u64,
    /// Length of the compressed output, when a codec ran
    pub compressed_size: Option<u64>,
}

impl SaveLog {
    pub(crate) fn new(
        elapsed: Duration,
        strategy: Option<SaveStrategy>,
        bytes_written: u64,
        compressed_size: Option<u64>,
    ) -> Self {
        Self {
            save_time: format_elapsed(elapsed),
            elapsed,
            strategy,
            bytes_written,
            compressed_size,
        }
    }

    #[must_use]
    pub fn save_time(&self) -> &str {
        &self.save_time
    }
}

/// Format a duration as zero-padded `MM:SS:mmm`.
///
/// Minutes are not wrapped at the hour, so long saves widen the first field.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    let millis = elapsed.subsec_millis();
    format!("{minutes:02}:{seconds:02}:{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_zero() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00:000");
    }

    #[test]
    fn test_format_components() {
        assert_eq!(format_elapsed(Duration::from_millis(61_007)), "01:01:007");
        assert_eq!(format_elapsed(Duration::from_millis(754_250)), "12:34:250");
        assert_eq!(format_elapsed(Duration::from_secs(3 * 3600)), "180:00:000");
    }

    proptest! {
        #[test]
        fn format_matches_pattern(millis in 0u64..(100 * 60 * 1000)) {
            let text = format_elapsed(Duration::from_millis(millis));
            let parts: Vec<&str> = text.split(':').collect();
            prop_assert_eq!(parts.len(), 3);
            prop_assert_eq!(parts[0].len(), 2);
            prop_assert_eq!(parts[1].len(), 2);
            prop_assert_eq!(parts[2].len(), 3);
            prop_assert!(parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())));

            let minutes: u64 = parts[0].parse().unwrap();
            let seconds: u64 = parts[1].parse().unwrap();
            let ms: u64 = parts[2].parse().unwrap();
            prop_assert!(seconds < 60);
            prop_assert_eq!(minutes * 60_000 + seconds * 1000 + ms, millis);
        }
    }
}
