//! Period-over-period trend comparison.

use chrono::NaiveDate;

use super::period::{period_key, previous_period_anchor, Granularity};

/// Change between the current period and the one before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendDelta {
    /// Current minus previous count
    pub absolute: i64,
    /// Percent change against the previous period. When the previous
    /// count is zero: 100.0 if anything happened this period, else 0.0.
    pub percentage: f64,
    /// True when the count did not drop
    pub is_increase: bool,
}

impl TrendDelta {
    /// Compare a current count against the previous period's count.
    pub fn between(current: i64, previous: i64) -> Self {
        let absolute = current - previous;
        let percentage = if previous == 0 {
            if current > 0 {
                100.0
            } else {
                0.0
            }
        } else {
            ((absolute as f64) / (previous as f64) * 100.0).round()
        };
        Self {
            absolute,
            percentage,
            is_increase: absolute >= 0,
        }
    }

    /// Format for display (e.g. "+23%" or "-15%").
    pub fn format_percentage(&self) -> String {
        if self.percentage >= 0.0 {
            format!("+{:.0}%", self.percentage)
        } else {
            format!("{:.0}%", self.percentage)
        }
    }
}

/// Counts of dated records in `today`'s period and the period before it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodPair {
    pub current: i64,
    pub previous: i64,
}

impl PeriodPair {
    pub fn delta(&self) -> TrendDelta {
        TrendDelta::between(self.current, self.previous)
    }
}

/// Count records falling into the current period vs the immediately
/// preceding equivalent period (yesterday / last week / last month /
/// last year).
pub fn count_period_pair<I>(dates: I, granularity: Granularity, today: NaiveDate) -> PeriodPair
where
    I: IntoIterator<Item = NaiveDate>,
{
    let current_key = period_key(today, granularity);
    let previous_key = period_key(previous_period_anchor(today, granularity), granularity);

    let mut pair = PeriodPair::default();
    for date in dates {
        let key = period_key(date, granularity);
        if key == current_key {
            pair.current += 1;
        } else if key == previous_key {
            pair.previous += 1;
        }
    }
    pair
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_delta_basic() {
        let delta = TrendDelta::between(123, 100);
        assert_eq!(delta.absolute, 23);
        assert_eq!(delta.percentage, 23.0);
        assert!(delta.is_increase);

        let delta = TrendDelta::between(80, 100);
        assert_eq!(delta.absolute, -20);
        assert_eq!(delta.percentage, -20.0);
        assert!(!delta.is_increase);
    }

    #[test]
    fn test_delta_zero_previous() {
        let delta = TrendDelta::between(5, 0);
        assert_eq!(delta.absolute, 5);
        assert_eq!(delta.percentage, 100.0);
        assert!(delta.is_increase);

        let delta = TrendDelta::between(0, 0);
        assert_eq!(delta.absolute, 0);
        assert_eq!(delta.percentage, 0.0);
        assert!(delta.is_increase);
    }

    #[test]
    fn test_delta_formatting() {
        assert_eq!(TrendDelta::between(123, 100).format_percentage(), "+23%");
        assert_eq!(TrendDelta::between(85, 100).format_percentage(), "-15%");
        assert_eq!(TrendDelta::between(0, 0).format_percentage(), "+0%");
    }

    #[test]
    fn test_count_period_pair_by_day() {
        let today = date(2024, 4, 10);
        let dates = vec![
            today,
            today,
            date(2024, 4, 9),
            date(2024, 4, 8), // neither period
        ];
        let pair = count_period_pair(dates, Granularity::Day, today);
        assert_eq!(pair.current, 2);
        assert_eq!(pair.previous, 1);
        assert_eq!(pair.delta().absolute, 1);
    }

    #[test]
    fn test_count_period_pair_by_month() {
        let today = date(2024, 4, 10);
        let dates = vec![
            date(2024, 4, 1),
            date(2024, 3, 31),
            date(2024, 3, 1),
            date(2024, 2, 29),
        ];
        let pair = count_period_pair(dates, Granularity::Month, today);
        assert_eq!(pair.current, 1);
        assert_eq!(pair.previous, 2);
        assert!(!pair.delta().is_increase);
        assert_eq!(pair.delta().percentage, -50.0);
    }
}
