//! Trailing-window series for the analytics charts.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::types::{Application, ApplicationStatus};

use super::period::{period_key, period_label, trailing_periods, Granularity};

/// One bucket of a time series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodCount {
    /// Canonical bucket key (e.g. `2024-W11`)
    pub period_key: String,
    /// Display label (e.g. `W11 2024`)
    pub label: String,
    /// Records in this bucket
    pub count: i64,
}

/// Cumulative series for one application status.
#[derive(Debug, Clone)]
pub struct StatusTrend {
    pub status: ApplicationStatus,
    pub points: Vec<PeriodCount>,
}

/// Statuses charted in the trends view. Withdrawn is left out; it is a
/// terminal bookkeeping state, not a funnel stage.
pub const TREND_STATUSES: [ApplicationStatus; 5] = [
    ApplicationStatus::Applied,
    ApplicationStatus::Screening,
    ApplicationStatus::Interview,
    ApplicationStatus::Offer,
    ApplicationStatus::Rejected,
];

/// Tally dated records into the trailing window ending at `today`.
///
/// The result always covers the full window (30/12/12/5 buckets),
/// oldest first, with zero counts where nothing landed. Records outside
/// the window are dropped silently.
pub fn build_time_series<I>(
    dates: I,
    granularity: Granularity,
    today: NaiveDate,
) -> Vec<PeriodCount>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let window = trailing_periods(today, granularity);
    let positions: HashMap<&str, usize> = window
        .iter()
        .enumerate()
        .map(|(i, key)| (key.as_str(), i))
        .collect();

    let mut counts = vec![0i64; window.len()];
    for date in dates {
        let key = period_key(date, granularity);
        if let Some(&i) = positions.get(key.as_str()) {
            counts[i] += 1;
        }
    }

    window
        .into_iter()
        .zip(counts)
        .map(|(key, count)| PeriodCount {
            label: period_label(&key, granularity),
            period_key: key,
            count,
        })
        .collect()
}

/// Cumulative per-status series over the same trailing window.
///
/// The value at index i is the number of applications with that status
/// whose own period is at or before period i: a non-decreasing "seen by
/// this point" curve, not a per-period delta. Applications dated before
/// the window contribute to every bucket; undated ones and dates past
/// the window contribute to none.
pub fn build_status_trends(
    applications: &[Application],
    granularity: Granularity,
    today: NaiveDate,
) -> Vec<StatusTrend> {
    let window = trailing_periods(today, granularity);
    let positions: HashMap<&str, usize> = window
        .iter()
        .enumerate()
        .map(|(i, key)| (key.as_str(), i))
        .collect();
    // Period keys are fixed-width per granularity, so lexicographic
    // order is chronological order.
    let first_key = window.first().cloned().unwrap_or_default();

    TREND_STATUSES
        .iter()
        .map(|&status| {
            let mut deltas = vec![0i64; window.len()];
            for app in applications {
                if app.status != status {
                    continue;
                }
                let Some(date) = app.applied_date else {
                    continue;
                };
                let key = period_key(date, granularity);
                let position = positions
                    .get(key.as_str())
                    .copied()
                    .or_else(|| (key < first_key).then_some(0));
                if let Some(i) = position {
                    deltas[i] += 1;
                }
            }

            let mut running = 0i64;
            let points = window
                .iter()
                .zip(&deltas)
                .map(|(key, delta)| {
                    running += delta;
                    PeriodCount {
                        period_key: key.clone(),
                        label: period_label(key, granularity),
                        count: running,
                    }
                })
                .collect();

            StatusTrend { status, points }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app(status: ApplicationStatus, applied: Option<NaiveDate>) -> Application {
        let now = Utc::now();
        Application {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: "u1".to_string(),
            job_title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: None,
            job_url: None,
            description: None,
            work_mode: Default::default(),
            status,
            salary: None,
            notes: None,
            applied_date: applied,
            interview_date: None,
            offer_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_series_covers_full_window() {
        let series = build_time_series(std::iter::empty(), Granularity::Day, date(2024, 4, 10));
        assert_eq!(series.len(), 30);
        assert!(series.iter().all(|p| p.count == 0));
    }

    #[test]
    fn test_monthly_bucket_assignment() {
        let dates = vec![date(2024, 3, 1), date(2024, 3, 15), date(2024, 4, 1)];
        let series = build_time_series(dates, Granularity::Month, date(2024, 4, 10));

        assert_eq!(series.len(), 12);
        let march = series.iter().find(|p| p.period_key == "2024-03").unwrap();
        let april = series.iter().find(|p| p.period_key == "2024-04").unwrap();
        assert_eq!(march.count, 2);
        assert_eq!(april.count, 1);
        assert_eq!(march.label, "Mar 2024");
    }

    #[test]
    fn test_out_of_window_records_dropped() {
        let dates = vec![date(2020, 1, 1), date(2024, 4, 10)];
        let series = build_time_series(dates, Granularity::Day, date(2024, 4, 10));
        let total: i64 = series.iter().map(|p| p.count).sum();
        assert_eq!(total, 1);
        assert_eq!(series.last().unwrap().count, 1);
    }

    #[test]
    fn test_boundary_date_lands_in_its_own_bucket() {
        // Sunday vs Monday across an ISO week boundary
        let series = build_time_series(
            vec![date(2024, 3, 17), date(2024, 3, 18)],
            Granularity::Week,
            date(2024, 3, 20),
        );
        let w11 = series.iter().find(|p| p.period_key == "2024-W11").unwrap();
        let w12 = series.iter().find(|p| p.period_key == "2024-W12").unwrap();
        assert_eq!(w11.count, 1);
        assert_eq!(w12.count, 1);
    }

    #[test]
    fn test_status_trends_are_cumulative_and_monotonic() {
        let apps = vec![
            app(ApplicationStatus::Applied, Some(date(2024, 2, 5))),
            app(ApplicationStatus::Applied, Some(date(2024, 3, 10))),
            app(ApplicationStatus::Offer, Some(date(2024, 4, 1))),
            app(ApplicationStatus::Applied, None),
        ];
        let trends = build_status_trends(&apps, Granularity::Month, date(2024, 4, 10));

        assert_eq!(trends.len(), TREND_STATUSES.len());
        for trend in &trends {
            assert_eq!(trend.points.len(), 12);
            for pair in trend.points.windows(2) {
                assert!(pair[1].count >= pair[0].count, "series must not decrease");
            }
        }

        let applied = trends
            .iter()
            .find(|t| t.status == ApplicationStatus::Applied)
            .unwrap();
        // Both dated Applied records are in by the final bucket; the
        // undated one never counts.
        assert_eq!(applied.points.last().unwrap().count, 2);
        // Only the February record has landed by 2024-02.
        let feb = applied
            .points
            .iter()
            .find(|p| p.period_key == "2024-02")
            .unwrap();
        assert_eq!(feb.count, 1);
    }

    #[test]
    fn test_records_before_window_count_from_the_start() {
        let apps = vec![app(ApplicationStatus::Applied, Some(date(2020, 6, 1)))];
        let trends = build_status_trends(&apps, Granularity::Month, date(2024, 4, 10));
        let applied = trends
            .iter()
            .find(|t| t.status == ApplicationStatus::Applied)
            .unwrap();
        assert!(applied.points.iter().all(|p| p.count == 1));
    }
}
