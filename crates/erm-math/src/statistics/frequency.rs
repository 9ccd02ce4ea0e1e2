//! Sampling frequency detection.

use chrono::NaiveDate;
use erm_core::types::DataFrequency;

use crate::error::{MathError, MathResult};

/// Detects the sampling frequency from the median gap between dates.
///
/// Median gap of at most 4 calendar days is daily (weekends and holidays
/// included), at most 10 is weekly, anything longer is monthly.
pub fn detect_frequency(dates: &[NaiveDate]) -> MathResult<DataFrequency> {
    if dates.len() < 2 {
        return Err(MathError::insufficient_data(2, dates.len()));
    }

    let mut gaps: Vec<i64> = dates
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days())
        .collect();
    gaps.sort_unstable();
    let median = gaps[gaps.len() / 2];

    Ok(if median <= 4 {
        DataFrequency::Daily
    } else if median <= 10 {
        DataFrequency::Weekly
    } else {
        DataFrequency::Monthly
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn series(step_days: i64, n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        (0..n).map(|i| start + Duration::days(step_days * i as i64)).collect()
    }

    #[test]
    fn test_business_days_are_daily() {
        // Mon-Fri with weekend gaps of 3 days.
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates: Vec<_> = (0..30)
            .map(|i| start + Duration::days(i))
            .filter(|d| chrono::Datelike::weekday(d).number_from_monday() <= 5)
            .collect();
        assert_eq!(detect_frequency(&dates).unwrap(), DataFrequency::Daily);
    }

    #[test]
    fn test_weekly_and_monthly() {
        assert_eq!(detect_frequency(&series(7, 20)).unwrap(), DataFrequency::Weekly);
        assert_eq!(detect_frequency(&series(30, 20)).unwrap(), DataFrequency::Monthly);
    }

    #[test]
    fn test_needs_two_dates() {
        assert!(detect_frequency(&series(1, 1)).is_err());
    }
}
