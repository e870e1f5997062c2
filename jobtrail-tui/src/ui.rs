//! UI rendering for the TUI.

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, BorderType, Borders, Cell, List, ListItem, Paragraph, Row, Table,
    },
    Frame,
};

use jobtrail_core::analytics::{
    activity_metrics, activity_trend, build_status_trends, build_time_series, filter_activity,
    line_layout, pending_task_count, pie_slices, recent_applications, status_distribution,
    ApplicationStats, ChartFrame, Granularity, PieGeometry,
};
use jobtrail_core::format::{format_applied_date, format_date_opt, format_relative_time};
use jobtrail_core::types::{ApplicationStatus, Priority, TaskStatus};

use crate::app::{App, Tab};

// ========== Palette ==========
// Mirrors the status colors the web charts used

const STATUS_APPLIED: Color = Color::Rgb(59, 130, 246);
const STATUS_SCREENING: Color = Color::Rgb(16, 185, 129);
const STATUS_INTERVIEW: Color = Color::Rgb(245, 158, 11);
const STATUS_OFFER: Color = Color::Rgb(139, 92, 246);
const STATUS_REJECTED: Color = Color::Rgb(239, 68, 68);
const STATUS_WITHDRAWN: Color = Color::Rgb(107, 114, 128);

/// Accent for selected rows and the active tab
const ACCENT: Color = Color::Rgb(0, 180, 180);
/// Dim gray for secondary text
const DIM: Color = Color::Rgb(128, 128, 128);
/// Chart line color
const CHART_LINE: Color = Color::Rgb(59, 130, 246);

fn status_color(status: ApplicationStatus) -> Color {
    match status {
        ApplicationStatus::Applied => STATUS_APPLIED,
        ApplicationStatus::Screening => STATUS_SCREENING,
        ApplicationStatus::Interview => STATUS_INTERVIEW,
        ApplicationStatus::Offer => STATUS_OFFER,
        ApplicationStatus::Rejected => STATUS_REJECTED,
        ApplicationStatus::Withdrawn => STATUS_WITHDRAWN,
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => STATUS_SCREENING,
        Priority::Medium => STATUS_INTERVIEW,
        Priority::High => STATUS_REJECTED,
    }
}

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::vertical([
        Constraint::Length(2), // Tab header
        Constraint::Min(5),    // Body
        Constraint::Length(1), // Footer
    ])
    .split(frame.area());

    render_tab_header(frame, app, chunks[0]);

    match app.tab {
        Tab::Overview => render_overview(frame, app, chunks[1]),
        Tab::Applications => render_applications(frame, app, chunks[1]),
        Tab::Tasks => render_tasks(frame, app, chunks[1]),
        Tab::Contacts => render_contacts(frame, app, chunks[1]),
        Tab::Documents => render_documents(frame, app, chunks[1]),
        Tab::Skills => render_skills(frame, app, chunks[1]),
        Tab::Analytics => render_analytics(frame, app, chunks[1]),
        Tab::Activity => render_activity(frame, app, chunks[1]),
    }

    render_footer(frame, app, chunks[2]);
}

fn render_tab_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " jobtrail ",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        let label = format!(" {}:{} ", i + 1, tab.title());
        if *tab == app.tab {
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Black)
                    .bg(ACCENT)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(label, Style::default().fg(DIM)));
        }
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Plain),
    );
    frame.render_widget(header, area);
}

// ========== Overview ==========

fn render_overview(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(5), // Stat cards
        Constraint::Min(5),    // Recent applications / tasks
    ])
    .split(area);

    let stats = ApplicationStats::from_applications(&app.snapshot.applications);
    let cards = Layout::horizontal([
        Constraint::Ratio(1, 4),
        Constraint::Ratio(1, 4),
        Constraint::Ratio(1, 4),
        Constraint::Ratio(1, 4),
    ])
    .split(chunks[0]);

    render_stat_card(frame, cards[0], "Total Applications", stats.total, STATUS_APPLIED, None);
    render_stat_card(frame, cards[1], "Active Pipeline", stats.active, STATUS_SCREENING, None);
    render_stat_card(
        frame,
        cards[2],
        "Interviews",
        stats.interviews,
        STATUS_INTERVIEW,
        None,
    );
    render_stat_card(
        frame,
        cards[3],
        "Offers",
        stats.offers,
        STATUS_OFFER,
        (stats.total > 0).then(|| format!("success rate {}%", stats.success_rate())),
    );

    let lists = Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(chunks[1]);

    // Recent applications
    let recent = recent_applications(&app.snapshot.applications, 5);
    let items: Vec<ListItem> = if recent.is_empty() {
        vec![ListItem::new(Span::styled(
            "No applications yet",
            Style::default().fg(DIM),
        ))]
    } else {
        recent
            .iter()
            .map(|a| {
                let when = if a.applied_date.is_some() {
                    format_applied_date(a.applied_date)
                } else {
                    format_relative_time(a.created_at)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("[{}] ", a.status.display_name()),
                        Style::default().fg(status_color(a.status)),
                    ),
                    Span::raw(format!("{} at {}", a.job_title, a.company)),
                    Span::styled(format!("  {}", when), Style::default().fg(DIM)),
                ]))
            })
            .collect()
    };
    frame.render_widget(
        List::new(items).block(titled_block("Recent Applications")),
        lists[0],
    );

    // Upcoming tasks
    let pending = pending_task_count(&app.snapshot.tasks);
    let mut task_items: Vec<ListItem> = app
        .snapshot
        .tasks
        .iter()
        .filter(|t| t.status != TaskStatus::Completed)
        .take(5)
        .map(|t| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[{}] ", t.priority.display_name()),
                    Style::default().fg(priority_color(t.priority)),
                ),
                Span::raw(t.title.clone()),
                Span::styled(
                    t.due_date
                        .map(|d| format!("  due {}", d.format("%b %-d")))
                        .unwrap_or_default(),
                    Style::default().fg(DIM),
                ),
            ]))
        })
        .collect();
    if task_items.is_empty() {
        task_items.push(ListItem::new(Span::styled(
            "No upcoming tasks. You're all caught up!",
            Style::default().fg(STATUS_SCREENING),
        )));
    }
    frame.render_widget(
        List::new(task_items).block(titled_block(&format!("Upcoming Tasks ({} pending)", pending))),
        lists[1],
    );
}

fn render_stat_card(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: i64,
    color: Color,
    extra: Option<String>,
) {
    let mut lines = vec![Line::from(Span::styled(
        value.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];
    if let Some(extra) = extra {
        lines.push(Line::from(Span::styled(extra, Style::default().fg(DIM))));
    }
    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(titled_block(title));
    frame.render_widget(card, area);
}

// ========== Record lists ==========

fn render_applications(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .snapshot
        .applications
        .iter()
        .map(|a| {
            Row::new(vec![
                Cell::from(a.job_title.clone()),
                Cell::from(a.company.clone()),
                Cell::from(a.status.display_name())
                    .style(Style::default().fg(status_color(a.status))),
                Cell::from(a.work_mode.display_name()),
                Cell::from(format_date_opt(a.applied_date)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(22),
            Constraint::Length(11),
            Constraint::Length(15),
            Constraint::Length(11),
        ],
    )
    .header(header_row(&["Title", "Company", "Status", "Work mode", "Applied"]))
    .row_highlight_style(Style::default().bg(ACCENT).fg(Color::Black))
    .block(titled_block(&format!(
        "Applications ({})",
        app.snapshot.applications.len()
    )));

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_tasks(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .snapshot
        .tasks
        .iter()
        .map(|t| {
            Row::new(vec![
                Cell::from(if t.is_reminder() { "⏰" } else { " " }),
                Cell::from(t.title.clone()),
                Cell::from(t.priority.display_name())
                    .style(Style::default().fg(priority_color(t.priority))),
                Cell::from(t.status.display_name()),
                Cell::from(format_date_opt(t.due_date)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Percentage(45),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(11),
        ],
    )
    .header(header_row(&["", "Title", "Priority", "Status", "Due"]))
    .row_highlight_style(Style::default().bg(ACCENT).fg(Color::Black))
    .block(titled_block(&format!("Tasks ({})", app.snapshot.tasks.len())));

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_contacts(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .snapshot
        .contacts
        .iter()
        .map(|c| {
            Row::new(vec![
                Cell::from(c.name.clone()),
                Cell::from(c.company.clone().unwrap_or_default()),
                Cell::from(c.position.clone().unwrap_or_default()),
                Cell::from(c.email.clone().unwrap_or_default()),
                Cell::from(c.tags.join(", ")),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(22),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(23),
            Constraint::Percentage(15),
        ],
    )
    .header(header_row(&["Name", "Company", "Position", "Email", "Tags"]))
    .row_highlight_style(Style::default().bg(ACCENT).fg(Color::Black))
    .block(titled_block(&format!(
        "Contacts ({})",
        app.snapshot.contacts.len()
    )));

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_documents(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .snapshot
        .documents
        .iter()
        .map(|d| {
            let storage = if d.file_url.starts_with("data:") {
                "embedded"
            } else {
                "linked"
            };
            Row::new(vec![
                Cell::from(d.name.clone()),
                Cell::from(d.doc_type.display_name()),
                Cell::from(storage),
                Cell::from(d.tags.join(", ")),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Length(13),
            Constraint::Length(9),
            Constraint::Percentage(30),
        ],
    )
    .header(header_row(&["Name", "Type", "Storage", "Tags"]))
    .row_highlight_style(Style::default().bg(ACCENT).fg(Color::Black))
    .block(titled_block(&format!(
        "Documents ({})",
        app.snapshot.documents.len()
    )));

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_skills(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .snapshot
        .skills
        .iter()
        .map(|s| {
            Row::new(vec![
                Cell::from(s.name.clone()),
                Cell::from(s.level.display_name()),
                Cell::from(s.category.clone().unwrap_or_default()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Length(13),
            Constraint::Percentage(35),
        ],
    )
    .header(header_row(&["Name", "Level", "Category"]))
    .row_highlight_style(Style::default().bg(ACCENT).fg(Color::Black))
    .block(titled_block(&format!("Skills ({})", app.snapshot.skills.len())));

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

// ========== Analytics ==========

fn render_analytics(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(16), // Line chart
        Constraint::Min(8),     // Distribution + trends
    ])
    .split(area);

    let today = app.today();
    let applications = &app.snapshot.applications;
    let series = build_time_series(
        applications.iter().filter_map(|a| a.applied_date),
        app.granularity,
        today,
    );
    let delta = jobtrail_core::analytics::count_period_pair(
        applications.iter().filter_map(|a| a.applied_date),
        app.granularity,
        today,
    )
    .delta();

    // Scale the series into chart space, then paint it on a canvas with
    // the y axis flipped (canvas y grows upward)
    let chart_frame = ChartFrame::default();
    let layout = line_layout(
        &series.iter().map(|p| p.count).collect::<Vec<_>>(),
        &chart_frame,
    );
    let flip = |y: f64| chart_frame.height - y;

    let first_label = series.first().map(|p| p.label.clone()).unwrap_or_default();
    let last_label = series.last().map(|p| p.label.clone()).unwrap_or_default();
    let title = format!(
        "Applications over time (by {}) — vs previous {}: {:+} ({})",
        app.granularity.as_str(),
        app.granularity.as_str(),
        delta.absolute,
        delta.format_percentage()
    );

    let canvas = Canvas::default()
        .block(titled_block(&title))
        .x_bounds([0.0, chart_frame.width])
        .y_bounds([0.0, chart_frame.height])
        .paint(|ctx| {
            // Baseline
            ctx.draw(&CanvasLine {
                x1: chart_frame.padding,
                y1: flip(chart_frame.baseline()),
                x2: chart_frame.padding + chart_frame.plot_width,
                y2: flip(chart_frame.baseline()),
                color: DIM,
            });
            // The series polyline
            for pair in layout.points.windows(2) {
                ctx.draw(&CanvasLine {
                    x1: pair[0].x,
                    y1: flip(pair[0].y),
                    x2: pair[1].x,
                    y2: flip(pair[1].y),
                    color: CHART_LINE,
                });
            }
            // Axis labels: window bounds and the vertical max
            ctx.print(
                chart_frame.padding,
                flip(chart_frame.baseline() + 20.0),
                Line::styled(first_label.clone(), Style::default().fg(DIM)),
            );
            ctx.print(
                chart_frame.padding + chart_frame.plot_width - 60.0,
                flip(chart_frame.baseline() + 20.0),
                Line::styled(last_label.clone(), Style::default().fg(DIM)),
            );
            ctx.print(
                10.0,
                flip(chart_frame.padding),
                Line::styled(layout.max_count.to_string(), Style::default().fg(DIM)),
            );
        });
    frame.render_widget(canvas, chunks[0]);

    let bottom = Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(chunks[1]);
    render_status_distribution(frame, app, bottom[0]);
    render_status_trends(frame, app, bottom[1]);
}

fn render_status_distribution(frame: &mut Frame, app: &App, area: Rect) {
    let distribution = status_distribution(&app.snapshot.applications);
    let values: Vec<i64> = distribution.iter().map(|(_, c)| *c).collect();
    let slices = pie_slices(&values, &PieGeometry::default());
    let max = values.iter().copied().max().unwrap_or(0).max(1);

    let mut lines = Vec::new();
    for (status, count) in &distribution {
        let share = slices
            .iter()
            .find(|s| distribution[s.index].0 == *status)
            .map(|s| format!("{:>5.1}%", s.percentage()))
            .unwrap_or_else(|| "    —".to_string());
        let width = ((*count as f64 / max as f64) * 20.0).round() as usize;
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<11}", status.display_name()),
                Style::default().fg(status_color(*status)),
            ),
            Span::raw(format!("{:>4}  {} ", count, share)),
            Span::styled(
                "█".repeat(width),
                Style::default().fg(status_color(*status)),
            ),
        ]));
    }

    frame.render_widget(
        Paragraph::new(lines).block(titled_block("Status Distribution")),
        area,
    );
}

fn render_status_trends(frame: &mut Frame, app: &App, area: Rect) {
    let trends = build_status_trends(&app.snapshot.applications, app.granularity, app.today());

    // One sparkline-ish row per status: the cumulative curve rendered
    // as eight-level block characters
    const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    let width = (area.width.saturating_sub(16)) as usize;

    let mut lines = Vec::new();
    for trend in &trends {
        let max = trend.points.iter().map(|p| p.count).max().unwrap_or(0);
        let sampled: Vec<char> = trend
            .points
            .iter()
            .take(width.max(1))
            .map(|p| {
                if max == 0 {
                    ' '
                } else {
                    let level = ((p.count as f64 / max as f64) * 7.0).round() as usize;
                    LEVELS[level.min(7)]
                }
            })
            .collect();
        let total = trend.points.last().map(|p| p.count).unwrap_or(0);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<11}", trend.status.display_name()),
                Style::default().fg(status_color(trend.status)),
            ),
            Span::raw(format!("{:>3} ", total)),
            Span::styled(
                sampled.into_iter().collect::<String>(),
                Style::default().fg(status_color(trend.status)),
            ),
        ]));
    }

    frame.render_widget(
        Paragraph::new(lines).block(titled_block("Status Trends (cumulative)")),
        area,
    );
}

// ========== Activity ==========

fn render_activity(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(4), // Metrics header
        Constraint::Min(4),    // Feed
    ])
    .split(area);

    let today = app.today();
    let metrics = activity_metrics(&app.feed, app.granularity, today);
    let trend = activity_trend(&app.feed, app.granularity, today);

    let refresh_state = if app.auto_refresh {
        format!("auto-refresh {}s", app.refresh_interval().as_secs())
    } else {
        "auto-refresh off".to_string()
    };
    let header_lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} ", period_heading(app.granularity)),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "• {} events • {} completed • vs previous: {:+} ({})",
                metrics.total,
                metrics.completed,
                trend.absolute,
                trend.format_percentage()
            )),
        ]),
        Line::from(Span::styled(
            format!(
                "filter: {} • {} • last updated {}",
                app.activity_filter.display_name(),
                refresh_state,
                app.last_updated
                    .with_timezone(&Local)
                    .format("%H:%M:%S")
            ),
            Style::default().fg(DIM),
        )),
    ];
    frame.render_widget(
        Paragraph::new(header_lines).block(titled_block("Activity")),
        chunks[0],
    );

    let visible = filter_activity(&app.feed, app.activity_filter, app.granularity, today);
    let items: Vec<ListItem> = if visible.is_empty() {
        vec![ListItem::new(Span::styled(
            "No activity in this period.",
            Style::default().fg(DIM),
        ))]
    } else {
        visible
            .iter()
            .map(|item| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("[{:<9}] ", item.action.display_name()),
                        Style::default().fg(ACCENT),
                    ),
                    Span::styled(
                        format!("{:<10} ", format_relative_time(item.timestamp)),
                        Style::default().fg(DIM),
                    ),
                    Span::raw(item.title.clone()),
                ]))
            })
            .collect()
    };
    frame.render_widget(List::new(items).block(titled_block("Feed")), chunks[1]);
}

fn period_heading(granularity: Granularity) -> &'static str {
    match granularity {
        Granularity::Day => "Today",
        Granularity::Week => "This Week",
        Granularity::Month => "This Month",
        Granularity::Year => "This Year",
    }
}

// ========== Chrome ==========

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let text = if let Some(pending) = &app.pending_delete {
        Line::from(Span::styled(
            format!(" Delete '{}'? (y/N)", pending.label),
            Style::default().fg(STATUS_REJECTED).add_modifier(Modifier::BOLD),
        ))
    } else if let Some(message) = &app.status_message {
        Line::from(Span::styled(format!(" {}", message), Style::default().fg(ACCENT)))
    } else {
        let hints = match app.tab {
            Tab::Applications => {
                " q quit • tab switch • j/k select • s cycle status • x delete • r refresh"
            }
            Tab::Tasks | Tab::Contacts | Tab::Documents | Tab::Skills => {
                " q quit • tab switch • j/k select • x delete • r refresh"
            }
            Tab::Analytics => " q quit • tab switch • d/w/m/y granularity • r refresh",
            Tab::Activity => {
                " q quit • tab switch • d/w/m/y period • f filter • a auto-refresh • r refresh"
            }
            _ => " q quit • tab/arrows switch view • 1-8 jump • r refresh",
        };
        Line::from(Span::styled(hints, Style::default().fg(DIM)))
    };
    frame.render_widget(Paragraph::new(text), area);
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    Row::new(titles.iter().map(|t| Cell::from(*t)).collect::<Vec<_>>())
        .style(Style::default().fg(DIM).add_modifier(Modifier::BOLD))
}

fn titled_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().add_modifier(Modifier::BOLD),
        ))
}
