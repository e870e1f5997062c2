//! Formatting helpers shared across UIs.

use chrono::{DateTime, NaiveDate, Utc};

/// Format a timestamp as relative time (e.g., "2m ago").
pub fn format_relative_time(ts: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(ts);

    if duration.num_seconds() < 0 {
        "just now".to_string()
    } else if duration.num_seconds() < 60 {
        format!("{}s ago", duration.num_seconds())
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else {
        ts.format("%b %d").to_string()
    }
}

/// Format an optional date as "Applied Mar 15"-style text, or an empty
/// string if missing.
pub fn format_applied_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!("Applied {}", date.format("%b %-d")),
        None => String::new(),
    }
}

/// Format an optional date as `YYYY-MM-DD`, or an em dash if missing.
pub fn format_date_opt(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(format_relative_time(now + Duration::seconds(5)), "just now");
        assert_eq!(format_relative_time(now - Duration::seconds(30)), "30s ago");
        assert_eq!(format_relative_time(now - Duration::minutes(5)), "5m ago");
        assert_eq!(format_relative_time(now - Duration::hours(3)), "3h ago");
        assert_eq!(format_relative_time(now - Duration::days(2)), "2d ago");
    }

    #[test]
    fn test_applied_date() {
        assert_eq!(
            format_applied_date(NaiveDate::from_ymd_opt(2024, 3, 5)),
            "Applied Mar 5"
        );
        assert_eq!(format_applied_date(None), "");
    }

    #[test]
    fn test_date_opt() {
        assert_eq!(
            format_date_opt(NaiveDate::from_ymd_opt(2024, 3, 5)),
            "2024-03-05"
        );
        assert_eq!(format_date_opt(None), "—");
    }
}
