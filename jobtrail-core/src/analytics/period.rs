//! Calendar bucketing for analytics.
//!
//! Every chart and trend in jobtrail works on canonical period keys:
//! two dates land in the same bucket iff they produce the same key for
//! the chosen granularity. Weeks use ISO-8601 numbering (weeks start
//! Monday; week 1 contains the year's first Thursday), including the
//! ISO week-year, so Dec 31 can belong to week 1 of the next year.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::error::{Error, Result};

/// Time bucket granularity for analytics windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    /// All granularities in selector order.
    pub const ALL: [Granularity; 4] = [
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Granularity::Day => "Day",
            Granularity::Week => "Week",
            Granularity::Month => "Month",
            Granularity::Year => "Year",
        }
    }

    /// Length of the trailing window for this granularity:
    /// 30 days, 12 weeks, 12 months, or 5 years.
    pub fn window_len(&self) -> usize {
        match self {
            Granularity::Day => 30,
            Granularity::Week => 12,
            Granularity::Month => 12,
            Granularity::Year => 5,
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            "month" | "monthly" => Ok(Granularity::Month),
            "year" | "yearly" => Ok(Granularity::Year),
            _ => Err(format!("unknown granularity: {}", s)),
        }
    }
}

/// Parse a `YYYY-MM-DD` date string, rejecting anything malformed.
///
/// All user-supplied dates pass through here before they reach the
/// store or the bucketing functions, so an invalid date surfaces as a
/// validation error instead of a garbage bucket key.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::Validation(format!("invalid date (expected YYYY-MM-DD): {}", s)))
}

/// Canonical bucket key for a date at the given granularity.
///
/// - Day   -> `YYYY-MM-DD`
/// - Week  -> `YYYY-Www` (ISO week number and ISO week-year)
/// - Month -> `YYYY-MM`
/// - Year  -> `YYYY`
pub fn period_key(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => date.format("%Y-%m-%d").to_string(),
        Granularity::Week => {
            let iso = date.iso_week();
            format!("{:04}-W{:02}", iso.year(), iso.week())
        }
        Granularity::Month => date.format("%Y-%m").to_string(),
        Granularity::Year => format!("{:04}", date.year()),
    }
}

/// Cosmetic label for a period key (e.g. "Mar 15", "W11 2024").
pub fn period_label(key: &str, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => NaiveDate::parse_from_str(key, "%Y-%m-%d")
            .map(|d| d.format("%b %-d").to_string())
            .unwrap_or_else(|_| key.to_string()),
        Granularity::Week => match key.split_once("-W") {
            Some((year, week)) => format!("W{} {}", week, year),
            None => key.to_string(),
        },
        Granularity::Month => NaiveDate::parse_from_str(&format!("{}-01", key), "%Y-%m-%d")
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|_| key.to_string()),
        Granularity::Year => key.to_string(),
    }
}

/// Period keys for the trailing window ending at `today`, oldest first.
///
/// Always exactly [`Granularity::window_len`] entries; the last key is
/// `today`'s own period.
pub fn trailing_periods(today: NaiveDate, granularity: Granularity) -> Vec<String> {
    let len = granularity.window_len() as u64;
    (0..len)
        .rev()
        .map(|i| {
            let date = match granularity {
                Granularity::Day => today
                    .checked_sub_days(Days::new(i))
                    .unwrap_or(NaiveDate::MIN),
                Granularity::Week => today
                    .checked_sub_days(Days::new(i * 7))
                    .unwrap_or(NaiveDate::MIN),
                Granularity::Month => today
                    .checked_sub_months(Months::new(i as u32))
                    .unwrap_or(NaiveDate::MIN),
                Granularity::Year => today
                    .checked_sub_months(Months::new(i as u32 * 12))
                    .unwrap_or(NaiveDate::MIN),
            };
            period_key(date, granularity)
        })
        .collect()
}

/// A date inside the period immediately before `today`'s period:
/// yesterday, one week back, one calendar month back, or one calendar
/// year back. Day-of-month is clamped when the previous month is short.
pub fn previous_period_anchor(today: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Day => today.checked_sub_days(Days::new(1)),
        Granularity::Week => today.checked_sub_days(Days::new(7)),
        Granularity::Month => today.checked_sub_months(Months::new(1)),
        Granularity::Year => today.checked_sub_months(Months::new(12)),
    }
    .unwrap_or(NaiveDate::MIN)
}

/// Whether two dates share a bucket at the given granularity.
pub fn same_period(a: NaiveDate, b: NaiveDate, granularity: Granularity) -> bool {
    period_key(a, granularity) == period_key(b, granularity)
}

/// Advance `days` working days (Mon-Fri) past `start`.
///
/// Weekends are skipped; holidays are not accounted for.
pub fn add_working_days(start: NaiveDate, days: u32) -> NaiveDate {
    let mut result = start;
    let mut added = 0;
    while added < days {
        result = result.succ_opt().unwrap_or(result);
        if !matches!(result.weekday(), Weekday::Sat | Weekday::Sun) {
            added += 1;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_keys() {
        let d = date(2024, 3, 15);
        assert_eq!(period_key(d, Granularity::Day), "2024-03-15");
        assert_eq!(period_key(d, Granularity::Week), "2024-W11");
        assert_eq!(period_key(d, Granularity::Month), "2024-03");
        assert_eq!(period_key(d, Granularity::Year), "2024");
    }

    #[test]
    fn test_same_day_same_key() {
        for g in Granularity::ALL {
            assert_eq!(
                period_key(date(2024, 3, 15), g),
                period_key(date(2024, 3, 15), g)
            );
        }
        // Same ISO week, different days
        assert!(same_period(
            date(2024, 3, 11),
            date(2024, 3, 17),
            Granularity::Week
        ));
        // Monday of the next week is a different bucket
        assert!(!same_period(
            date(2024, 3, 17),
            date(2024, 3, 18),
            Granularity::Week
        ));
    }

    #[test]
    fn test_iso_week_year_boundaries() {
        // Jan 1, 2024 is a Monday and starts ISO week 1
        assert_eq!(period_key(date(2024, 1, 1), Granularity::Week), "2024-W01");
        // Dec 31, 2024 (Tuesday) belongs to week 1 of ISO year 2025
        assert_eq!(period_key(date(2024, 12, 31), Granularity::Week), "2025-W01");
        // Jan 1, 2023 (Sunday) still belongs to 2022's last week
        assert_eq!(period_key(date(2023, 1, 1), Granularity::Week), "2022-W52");
        // 2020 had 53 ISO weeks
        assert_eq!(period_key(date(2020, 12, 31), Granularity::Week), "2020-W53");
    }

    #[test]
    fn test_invalid_dates_fail_fast() {
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("not-a-date").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert_eq!(parse_date(" 2024-02-29 ").unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn test_trailing_window_lengths() {
        let today = date(2024, 4, 10);
        assert_eq!(trailing_periods(today, Granularity::Day).len(), 30);
        assert_eq!(trailing_periods(today, Granularity::Week).len(), 12);
        assert_eq!(trailing_periods(today, Granularity::Month).len(), 12);
        assert_eq!(trailing_periods(today, Granularity::Year).len(), 5);
    }

    #[test]
    fn test_trailing_window_order_and_bounds() {
        let today = date(2024, 4, 10);

        let days = trailing_periods(today, Granularity::Day);
        assert_eq!(days.first().unwrap(), "2024-03-12");
        assert_eq!(days.last().unwrap(), "2024-04-10");

        let months = trailing_periods(today, Granularity::Month);
        assert_eq!(months.first().unwrap(), "2023-05");
        assert_eq!(months.last().unwrap(), "2024-04");

        let years = trailing_periods(today, Granularity::Year);
        assert_eq!(years, vec!["2020", "2021", "2022", "2023", "2024"]);
    }

    #[test]
    fn test_previous_period_anchor() {
        let today = date(2024, 3, 31);
        assert_eq!(
            previous_period_anchor(today, Granularity::Day),
            date(2024, 3, 30)
        );
        assert_eq!(
            previous_period_anchor(today, Granularity::Week),
            date(2024, 3, 24)
        );
        // Clamped to the end of the shorter month
        assert_eq!(
            previous_period_anchor(today, Granularity::Month),
            date(2024, 2, 29)
        );
        assert_eq!(
            previous_period_anchor(today, Granularity::Year),
            date(2023, 3, 31)
        );
    }

    #[test]
    fn test_period_labels() {
        assert_eq!(period_label("2024-03-15", Granularity::Day), "Mar 15");
        assert_eq!(period_label("2024-03-05", Granularity::Day), "Mar 5");
        assert_eq!(period_label("2024-W11", Granularity::Week), "W11 2024");
        assert_eq!(period_label("2024-03", Granularity::Month), "Mar 2024");
        assert_eq!(period_label("2024", Granularity::Year), "2024");
    }

    #[test]
    fn test_add_working_days_skips_weekends() {
        // Friday + 1 working day = Monday
        assert_eq!(add_working_days(date(2024, 3, 15), 1), date(2024, 3, 18));
        // Wednesday + 3 working days = Monday
        assert_eq!(add_working_days(date(2024, 3, 13), 3), date(2024, 3, 18));
        // Zero days is a no-op
        assert_eq!(add_working_days(date(2024, 3, 16), 0), date(2024, 3, 16));
        // Saturday start: counting begins from the next weekday
        assert_eq!(add_working_days(date(2024, 3, 16), 1), date(2024, 3, 18));
    }
}
