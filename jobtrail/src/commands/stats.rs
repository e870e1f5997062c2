//! `jobtrail stats` - analytics report.

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Args;
use std::path::PathBuf;

use jobtrail_core::analytics::{
    build_status_trends, build_time_series, count_period_pair, line_layout, pie_slices,
    status_distribution, top_companies, y_axis_ticks, ApplicationStats, ChartFrame, Granularity,
    PeriodCount, PieGeometry,
};
use jobtrail_core::Database;

use super::current_user_id;

#[derive(Args)]
pub struct StatsArgs {
    /// Bucket granularity: day, week, month, or year
    #[arg(short, long, default_value = "month")]
    period: String,

    /// Output format: text (default) or json
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Also render the charts to an SVG file
    #[arg(long)]
    svg: Option<PathBuf>,
}

pub fn run(db: &Database, args: StatsArgs) -> Result<()> {
    let granularity: Granularity = match args.period.parse() {
        Ok(g) => g,
        Err(e) => bail!("{}", e),
    };

    let user_id = current_user_id(db)?;
    let applications = db.list_applications(&user_id)?;
    let tasks = db.list_tasks(&user_id)?;
    let today = Local::now().date_naive();

    let stats = ApplicationStats::from_applications(&applications);
    let distribution = status_distribution(&applications);
    let companies = top_companies(&applications, 5);
    let applied_dates = || applications.iter().filter_map(|a| a.applied_date);
    let series = build_time_series(applied_dates(), granularity, today);
    let trends = build_status_trends(&applications, granularity, today);
    let delta = count_period_pair(applied_dates(), granularity, today).delta();
    let pending = jobtrail_core::analytics::pending_task_count(&tasks);

    match args.format.as_str() {
        "json" => {
            let json = serde_json::json!({
                "period": granularity.as_str(),
                "totals": {
                    "applications": stats.total,
                    "active": stats.active,
                    "interviews": stats.interviews,
                    "offers": stats.offers,
                    "success_rate": stats.success_rate(),
                    "pending_tasks": pending,
                },
                "status_distribution": distribution.iter().map(|(status, count)| {
                    serde_json::json!({"status": status.display_name(), "count": count})
                }).collect::<Vec<_>>(),
                "applications_over_time": series.iter().map(|p| {
                    serde_json::json!({
                        "period": p.period_key,
                        "label": p.label,
                        "count": p.count,
                    })
                }).collect::<Vec<_>>(),
                "status_trends": trends.iter().map(|t| {
                    serde_json::json!({
                        "status": t.status.display_name(),
                        "cumulative": t.points.iter().map(|p| p.count).collect::<Vec<_>>(),
                    })
                }).collect::<Vec<_>>(),
                "trend_vs_previous_period": {
                    "absolute": delta.absolute,
                    "percentage": delta.percentage,
                    "is_increase": delta.is_increase,
                },
                "top_companies": companies.iter().map(|c| {
                    serde_json::json!({"name": c.name, "count": c.count})
                }).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        "text" => print_text(
            granularity,
            &stats,
            pending,
            &distribution,
            &series,
            delta,
            &companies,
        ),
        other => bail!("unknown output format: {}. Use 'text' or 'json'", other),
    }

    if let Some(path) = args.svg {
        let svg = render_svg(&series, &distribution, granularity);
        std::fs::write(&path, svg)
            .with_context(|| format!("failed to write SVG to {}", path.display()))?;
        println!("Wrote charts to {}", path.display());
    }

    Ok(())
}

/// Status slice colors, matching the web palette the charts had.
const PIE_COLORS: [&str; 6] = [
    "#3B82F6", "#10B981", "#F59E0B", "#8B5CF6", "#EF4444", "#6B7280",
];

/// Render the applications-over-time line chart and the status pie to
/// a standalone SVG.
fn render_svg(
    series: &[PeriodCount],
    distribution: &[(jobtrail_core::types::ApplicationStatus, i64)],
    granularity: Granularity,
) -> String {
    let frame = ChartFrame::default();
    let layout = line_layout(
        &series.iter().map(|p| p.count).collect::<Vec<_>>(),
        &frame,
    );

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {} 620\">\n",
        frame.width
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"40\" font-size=\"18\" text-anchor=\"middle\">Applications over time (by {})</text>\n",
        frame.width / 2.0,
        granularity.as_str()
    ));

    // Gridlines with count labels
    for (value, y) in y_axis_ticks(layout.max_count, &frame, 5) {
        svg.push_str(&format!(
            "  <line x1=\"{}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" stroke=\"#E5E7EB\" stroke-dasharray=\"3,3\"/>\n",
            frame.padding,
            frame.padding + frame.plot_width,
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"11\" text-anchor=\"end\">{}</text>\n",
            frame.padding - 10.0,
            y + 4.0,
            value
        ));
    }

    // Area fill under the line
    if !layout.area.is_empty() {
        let area_path: Vec<String> = layout
            .area
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{} {} {}", if i == 0 { "M" } else { "L" }, p.x, p.y))
            .collect();
        svg.push_str(&format!(
            "  <path d=\"{} Z\" fill=\"#3B82F6\" fill-opacity=\"0.15\"/>\n",
            area_path.join(" ")
        ));
    }

    // The line itself plus its data points
    if !layout.points.is_empty() {
        let line_path: Vec<String> = layout
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{} {} {}", if i == 0 { "M" } else { "L" }, p.x, p.y))
            .collect();
        svg.push_str(&format!(
            "  <path d=\"{}\" fill=\"none\" stroke=\"#3B82F6\" stroke-width=\"3\" stroke-linecap=\"round\"/>\n",
            line_path.join(" ")
        ));
        for (point, bucket) in layout.points.iter().zip(series) {
            svg.push_str(&format!(
                "  <circle cx=\"{}\" cy=\"{}\" r=\"4\" fill=\"#3B82F6\"><title>{}: {}</title></circle>\n",
                point.x, point.y, bucket.label, bucket.count
            ));
        }
    }

    // Status distribution pie, below the line chart
    let geometry = PieGeometry::default();
    let values: Vec<i64> = distribution.iter().map(|(_, count)| *count).collect();
    let slices = pie_slices(&values, &geometry);
    svg.push_str("  <g transform=\"translate(70, 380)\">\n");
    svg.push_str(
        "    <text x=\"100\" y=\"-10\" font-size=\"18\" text-anchor=\"middle\">Status distribution</text>\n",
    );
    for slice in &slices {
        let color = PIE_COLORS[slice.index % PIE_COLORS.len()];
        svg.push_str(&format!(
            "    <path d=\"M {cx} {cy} L {x1} {y1} A {r} {r} 0 {large} 1 {x2} {y2} Z\" fill=\"{color}\" stroke=\"white\" stroke-width=\"3\"/>\n",
            cx = geometry.center.x,
            cy = geometry.center.y,
            x1 = slice.start_point.x,
            y1 = slice.start_point.y,
            r = geometry.radius,
            large = if slice.large_arc { 1 } else { 0 },
            x2 = slice.end_point.x,
            y2 = slice.end_point.y,
        ));
    }
    // Legend
    for (i, slice) in slices.iter().enumerate() {
        let (status, count) = distribution[slice.index];
        let y = 20 + i * 22;
        let color = PIE_COLORS[slice.index % PIE_COLORS.len()];
        svg.push_str(&format!(
            "    <rect x=\"220\" y=\"{}\" width=\"14\" height=\"14\" fill=\"{}\"/>\n",
            y, color
        ));
        svg.push_str(&format!(
            "    <text x=\"242\" y=\"{}\" font-size=\"13\">{} - {} ({:.1}%)</text>\n",
            y + 12,
            status.display_name(),
            count,
            slice.percentage()
        ));
    }
    svg.push_str("  </g>\n");
    svg.push_str("</svg>\n");
    svg
}

#[allow(clippy::too_many_arguments)]
fn print_text(
    granularity: Granularity,
    stats: &ApplicationStats,
    pending_tasks: i64,
    distribution: &[(jobtrail_core::types::ApplicationStatus, i64)],
    series: &[jobtrail_core::analytics::PeriodCount],
    delta: jobtrail_core::analytics::TrendDelta,
    companies: &[jobtrail_core::analytics::CompanyCount],
) {
    println!();
    println!("JOB SEARCH STATS");
    println!(
        "   Applications: {:<6} Active pipeline: {}",
        stats.total, stats.active
    );
    println!(
        "   Interviews:   {:<6} Offers: {} (success rate {}%)",
        stats.interviews,
        stats.offers,
        stats.success_rate()
    );
    println!("   Pending tasks: {}", pending_tasks);
    println!();

    println!("BY STATUS");
    let max = distribution.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1);
    for (status, count) in distribution {
        let width = ((*count as f64 / max as f64) * 24.0).round() as usize;
        println!(
            "   {:<11} {:>4}  {}",
            status.display_name(),
            count,
            "#".repeat(width)
        );
    }
    println!();

    println!(
        "APPLICATIONS OVER TIME ({} trailing {}s)",
        series.len(),
        granularity.as_str()
    );
    let max = series.iter().map(|p| p.count).max().unwrap_or(0).max(1);
    for point in series {
        if point.count == 0 && series.len() > 12 {
            continue; // keep the daily view readable
        }
        let width = ((point.count as f64 / max as f64) * 24.0).round() as usize;
        println!("   {:<10} {:>3}  {}", point.label, point.count, "#".repeat(width));
    }
    println!(
        "   vs previous {}: {:+} ({})",
        granularity.as_str(),
        delta.absolute,
        delta.format_percentage()
    );
    println!();

    if !companies.is_empty() {
        println!("TOP COMPANIES");
        for (i, company) in companies.iter().enumerate() {
            println!("   {}. {} - {}", i + 1, company.name, company.count);
        }
        println!();
    }
}
