//! `jobtrail activity` - the derived activity feed.

use anyhow::{bail, Result};
use chrono::Local;
use clap::Args;

use jobtrail_core::analytics::{
    activity_metrics, activity_trend, build_activity_feed, filter_activity, ActivityFilter,
    Granularity,
};
use jobtrail_core::format::format_relative_time;
use jobtrail_core::Database;

use super::current_user_id;

#[derive(Args)]
pub struct ActivityArgs {
    /// Scope: day (today), week, month, or year
    #[arg(short, long, default_value = "day")]
    period: String,

    /// Filter: all, applications, tasks, reminders, contacts,
    /// documents, or skills
    #[arg(long, default_value = "all")]
    filter: String,

    /// Output format: text (default) or json
    #[arg(short, long, default_value = "text")]
    format: String,
}

pub fn run(db: &Database, args: ActivityArgs) -> Result<()> {
    let granularity: Granularity = match args.period.parse() {
        Ok(g) => g,
        Err(e) => bail!("{}", e),
    };
    let filter: ActivityFilter = match args.filter.parse() {
        Ok(f) => f,
        Err(e) => bail!("{}", e),
    };

    let user_id = current_user_id(db)?;
    let snapshot = db.snapshot(&user_id)?;
    let today = Local::now().date_naive();

    let feed = build_activity_feed(
        &snapshot.applications,
        &snapshot.tasks,
        &snapshot.contacts,
        &snapshot.documents,
        &snapshot.skills,
    );
    let visible = filter_activity(&feed, filter, granularity, today);
    let metrics = activity_metrics(&feed, granularity, today);
    let trend = activity_trend(&feed, granularity, today);

    match args.format.as_str() {
        "json" => {
            let json = serde_json::json!({
                "period": granularity.as_str(),
                "filter": filter.display_name(),
                "metrics": {
                    "total": metrics.total,
                    "applications": metrics.applications,
                    "tasks": metrics.tasks,
                    "reminders": metrics.reminders,
                    "contacts": metrics.contacts,
                    "documents": metrics.documents,
                    "skills": metrics.skills,
                    "completed": metrics.completed,
                },
                "trend": {
                    "absolute": trend.absolute,
                    "percentage": trend.percentage,
                    "is_increase": trend.is_increase,
                },
                "items": visible.iter().map(|item| {
                    serde_json::json!({
                        "id": item.id,
                        "kind": item.kind.display_name(),
                        "action": item.action.display_name(),
                        "title": item.title,
                        "description": item.description,
                        "timestamp": item.timestamp.to_rfc3339(),
                        "reminder": item.reminder,
                    })
                }).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        "text" => {
            println!();
            println!(
                "ACTIVITY ({}, {})",
                period_heading(granularity),
                filter.display_name()
            );
            println!(
                "   {} events | {} completed | vs previous {}: {:+} ({})",
                metrics.total,
                metrics.completed,
                granularity.as_str(),
                trend.absolute,
                trend.format_percentage()
            );
            println!();

            if visible.is_empty() {
                println!("   No activity in this period.");
            }
            for item in &visible {
                println!(
                    "   [{:<9}] {:<10} {}",
                    item.action.display_name(),
                    format_relative_time(item.timestamp),
                    item.title
                );
                if !item.description.is_empty() {
                    println!("               {}", item.description);
                }
            }
            println!();
        }
        other => bail!("unknown output format: {}. Use 'text' or 'json'", other),
    }

    Ok(())
}

fn period_heading(granularity: Granularity) -> &'static str {
    match granularity {
        Granularity::Day => "Today",
        Granularity::Week => "This Week",
        Granularity::Month => "This Month",
        Granularity::Year => "This Year",
    }
}
