//! Analytics for jobtrail
//!
//! Everything here is a pure computation over store snapshots:
//! - Calendar bucketing (canonical period keys, trailing windows)
//! - Time series and cumulative status trends for the charts
//! - Period-over-period trend deltas
//! - Chart geometry (line/area layout, pie slices)
//! - The derived activity feed and its per-period metrics
//! - Dashboard aggregates (stat cards, distributions, rankings)
//!
//! Nothing in this module touches the database or the clock; callers
//! pass in records and a `today`, which keeps every function
//! deterministic and snapshot-testable.

pub mod activity;
pub mod chart;
pub mod dashboard;
pub mod period;
pub mod series;
pub mod trend;

pub use activity::{
    activity_metrics, activity_trend, build_activity_feed, filter_activity, ActivityAction,
    ActivityFilter, ActivityItem, ActivityKind, ActivityMetrics, TaskActivityMetrics,
};
pub use chart::{
    line_layout, pie_slices, y_axis_ticks, ChartFrame, LineLayout, PieGeometry, PieSlice, Point,
};
pub use dashboard::{
    pending_task_count, recent_applications, status_distribution, top_companies, ApplicationStats,
    CompanyCount,
};
pub use period::{
    add_working_days, parse_date, period_key, period_label, previous_period_anchor, same_period,
    trailing_periods, Granularity,
};
pub use series::{
    build_status_trends, build_time_series, PeriodCount, StatusTrend, TREND_STATUSES,
};
pub use trend::{count_period_pair, PeriodPair, TrendDelta};
