//! Utilities for the deploy scripts

use crate::errors::ScriptError;

/// Returns the smallest multiple of `period` strictly greater than
/// `current_timestamp`.
///
/// Used to pick epoch-aligned start times for the time-bucketed contracts so
/// that recurring rounds begin exactly on a period boundary. Integer
/// arithmetic only; timestamps are seconds since epoch and fit in a `u64`.
pub fn next_aligned(current_timestamp: u64, period: u64) -> Result<u64, ScriptError> {
    if period == 0 {
        return Err(ScriptError::InvalidArgument(
            "period must be positive".to_string(),
        ));
    }

    (current_timestamp / period)
        .checked_add(1)
        .and_then(|n| n.checked_mul(period))
        .ok_or_else(|| {
            ScriptError::InvalidArgument("aligned timestamp overflows u64".to_string())
        })
}

pub const fn days_to_seconds(days: u64) -> u64 {
    hours_to_seconds(days * 24)
}

pub const fn hours_to_seconds(hours: u64) -> u64 {
    minutes_to_seconds(hours * 60)
}

pub const fn minutes_to_seconds(minutes: u64) -> u64 {
    minutes * 60
}

#[cfg(test)]
mod tests {
    use quickcheck::TestResult;

    use super::*;

    #[test]
    fn test_next_aligned_basic() {
        assert_eq!(next_aligned(0, 3600).unwrap(), 3600);
        assert_eq!(next_aligned(3599, 3600).unwrap(), 3600);
        // An already-aligned timestamp moves to the next boundary
        assert_eq!(next_aligned(3600, 3600).unwrap(), 7200);
        assert_eq!(next_aligned(3601, 3600).unwrap(), 7200);
    }

    #[test]
    fn test_next_aligned_zero_period() {
        assert!(matches!(
            next_aligned(1_700_000_000, 0),
            Err(ScriptError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_next_aligned_props() {
        fn prop(t: u32, p: u32) -> TestResult {
            if p == 0 {
                return TestResult::discard();
            }
            let (t, p) = (t as u64, p as u64);
            let next = next_aligned(t, p).unwrap();
            TestResult::from_bool(next > t && next % p == 0 && next - p <= t)
        }
        quickcheck::quickcheck(prop as fn(u32, u32) -> TestResult);
    }

    #[test]
    fn test_duration_helpers() {
        assert_eq!(minutes_to_seconds(1), 60);
        assert_eq!(hours_to_seconds(1), 3600);
        assert_eq!(days_to_seconds(7), 604_800);
    }
}
