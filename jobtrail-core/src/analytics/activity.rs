//! Activity feed derivation.
//!
//! The feed is recomputed from a whole-store snapshot on every refresh;
//! items are derived, never stored. A later refresh simply replaces the
//! previous feed (last write wins, acceptable for a single local user).

use chrono::{DateTime, NaiveDate, Utc};

use crate::types::{Application, Contact, Document, Skill, Task, TaskStatus};

use super::period::{same_period, Granularity};
use super::trend::{count_period_pair, TrendDelta};

/// Which entity a feed item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Application,
    Task,
    Contact,
    Document,
    Skill,
}

impl ActivityKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityKind::Application => "Application",
            ActivityKind::Task => "Task",
            ActivityKind::Contact => "Contact",
            ActivityKind::Document => "Document",
            ActivityKind::Skill => "Skill",
        }
    }
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityAction {
    Created,
    Updated,
    Completed,
}

impl ActivityAction {
    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityAction::Created => "Created",
            ActivityAction::Updated => "Updated",
            ActivityAction::Completed => "Completed",
        }
    }
}

/// One entry in the activity feed.
#[derive(Debug, Clone)]
pub struct ActivityItem {
    /// Stable id: entity id plus an event discriminator
    pub id: String,
    pub kind: ActivityKind,
    pub action: ActivityAction,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    /// True for task items that carry a due date
    pub reminder: bool,
}

/// Feed filter. `Task` matches every task item; `Reminder` narrows to
/// due-dated ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityFilter {
    #[default]
    All,
    Application,
    Task,
    Reminder,
    Contact,
    Document,
    Skill,
}

impl ActivityFilter {
    pub const ALL: [ActivityFilter; 7] = [
        ActivityFilter::All,
        ActivityFilter::Application,
        ActivityFilter::Task,
        ActivityFilter::Reminder,
        ActivityFilter::Contact,
        ActivityFilter::Document,
        ActivityFilter::Skill,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityFilter::All => "All",
            ActivityFilter::Application => "Applications",
            ActivityFilter::Task => "Tasks",
            ActivityFilter::Reminder => "Reminders",
            ActivityFilter::Contact => "Contacts",
            ActivityFilter::Document => "Documents",
            ActivityFilter::Skill => "Skills",
        }
    }

    pub fn matches(&self, item: &ActivityItem) -> bool {
        match self {
            ActivityFilter::All => true,
            ActivityFilter::Application => item.kind == ActivityKind::Application,
            ActivityFilter::Task => item.kind == ActivityKind::Task,
            ActivityFilter::Reminder => item.kind == ActivityKind::Task && item.reminder,
            ActivityFilter::Contact => item.kind == ActivityKind::Contact,
            ActivityFilter::Document => item.kind == ActivityKind::Document,
            ActivityFilter::Skill => item.kind == ActivityKind::Skill,
        }
    }
}

impl std::str::FromStr for ActivityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ActivityFilter::All),
            "application" | "applications" => Ok(ActivityFilter::Application),
            "task" | "tasks" => Ok(ActivityFilter::Task),
            "reminder" | "reminders" => Ok(ActivityFilter::Reminder),
            "contact" | "contacts" => Ok(ActivityFilter::Contact),
            "document" | "documents" => Ok(ActivityFilter::Document),
            "skill" | "skills" => Ok(ActivityFilter::Skill),
            _ => Err(format!("unknown activity filter: {}", s)),
        }
    }
}

/// Derive the feed from store snapshots, newest first.
///
/// Every entity yields a created event; applications also yield an
/// updated event once edited, and completed tasks a completed event.
pub fn build_activity_feed(
    applications: &[Application],
    tasks: &[Task],
    contacts: &[Contact],
    documents: &[Document],
    skills: &[Skill],
) -> Vec<ActivityItem> {
    let mut items = Vec::new();

    for app in applications {
        let location = app
            .location
            .as_deref()
            .map(|l| format!(" | Location: {}", l))
            .unwrap_or_default();
        items.push(ActivityItem {
            id: format!("app-{}", app.id),
            kind: ActivityKind::Application,
            action: ActivityAction::Created,
            title: format!("Application: {} at {}", app.job_title, app.company),
            description: format!("Status: {}{}", app.status.display_name(), location),
            timestamp: app.created_at,
            reminder: false,
        });

        if app.updated_at != app.created_at {
            items.push(ActivityItem {
                id: format!("app-update-{}", app.id),
                kind: ActivityKind::Application,
                action: ActivityAction::Updated,
                title: format!("Updated: {} at {}", app.job_title, app.company),
                description: format!("Status changed to {}", app.status.display_name()),
                timestamp: app.updated_at,
                reminder: false,
            });
        }
    }

    for task in tasks {
        let reminder = task.is_reminder();
        let due = task
            .due_date
            .map(|d| format!(" | Due: {}", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        let label = if reminder { "Reminder" } else { "Task" };
        items.push(ActivityItem {
            id: format!("task-{}", task.id),
            kind: ActivityKind::Task,
            action: if task.status == TaskStatus::Completed {
                ActivityAction::Completed
            } else {
                ActivityAction::Created
            },
            title: format!("{}: {}", label, task.title),
            description: format!(
                "Priority: {} | Status: {}{}",
                task.priority.display_name(),
                task.status.display_name(),
                due
            ),
            timestamp: task.created_at,
            reminder,
        });

        if task.updated_at != task.created_at && task.status == TaskStatus::Completed {
            items.push(ActivityItem {
                id: format!("task-complete-{}", task.id),
                kind: ActivityKind::Task,
                action: ActivityAction::Completed,
                title: format!("Completed: {}", task.title),
                description: "Task marked as completed".to_string(),
                timestamp: task.updated_at,
                reminder,
            });
        }
    }

    for contact in contacts {
        let mut description = String::new();
        if let Some(company) = &contact.company {
            description.push_str(&format!("Company: {}", company));
        }
        if let Some(email) = &contact.email {
            if !description.is_empty() {
                description.push_str(" | ");
            }
            description.push_str(email);
        }
        items.push(ActivityItem {
            id: format!("contact-{}", contact.id),
            kind: ActivityKind::Contact,
            action: ActivityAction::Created,
            title: format!("Contact: {}", contact.name),
            description,
            timestamp: contact.created_at,
            reminder: false,
        });
    }

    for doc in documents {
        items.push(ActivityItem {
            id: format!("doc-{}", doc.id),
            kind: ActivityKind::Document,
            action: ActivityAction::Created,
            title: format!("Document: {}", doc.name),
            description: format!("Type: {}", doc.doc_type.display_name()),
            timestamp: doc.created_at,
            reminder: false,
        });
    }

    for skill in skills {
        let category = skill
            .category
            .as_deref()
            .map(|c| format!(" | Category: {}", c))
            .unwrap_or_default();
        items.push(ActivityItem {
            id: format!("skill-{}", skill.id),
            kind: ActivityKind::Skill,
            action: ActivityAction::Created,
            title: format!("Skill: {}", skill.name),
            description: format!("Level: {}{}", skill.level.display_name(), category),
            timestamp: skill.created_at,
            reminder: false,
        });
    }

    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items
}

/// Items whose timestamp falls in `today`'s period, with the filter
/// applied.
pub fn filter_activity<'a>(
    items: &'a [ActivityItem],
    filter: ActivityFilter,
    granularity: Granularity,
    today: NaiveDate,
) -> Vec<&'a ActivityItem> {
    items
        .iter()
        .filter(|item| same_period(item.timestamp.date_naive(), today, granularity))
        .filter(|item| filter.matches(item))
        .collect()
}

/// Task-specific breakdown for the current period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskActivityMetrics {
    pub total: i64,
    pub created: i64,
    pub completed: i64,
    pub reminders: i64,
    pub regular_tasks: i64,
    pub completed_reminders: i64,
    pub completed_tasks: i64,
}

/// Per-period feed metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityMetrics {
    pub total: i64,
    pub applications: i64,
    pub tasks: i64,
    pub reminders: i64,
    pub contacts: i64,
    pub documents: i64,
    pub skills: i64,
    pub completed: i64,
    pub task_metrics: TaskActivityMetrics,
}

/// Tally the feed for `today`'s period.
pub fn activity_metrics(
    items: &[ActivityItem],
    granularity: Granularity,
    today: NaiveDate,
) -> ActivityMetrics {
    let mut metrics = ActivityMetrics::default();

    for item in items
        .iter()
        .filter(|item| same_period(item.timestamp.date_naive(), today, granularity))
    {
        metrics.total += 1;
        match item.kind {
            ActivityKind::Application => metrics.applications += 1,
            ActivityKind::Task => {
                metrics.tasks += 1;
                metrics.task_metrics.total += 1;
                if item.reminder {
                    metrics.reminders += 1;
                    metrics.task_metrics.reminders += 1;
                } else {
                    metrics.task_metrics.regular_tasks += 1;
                }
                match item.action {
                    ActivityAction::Completed => {
                        metrics.task_metrics.completed += 1;
                        if item.reminder {
                            metrics.task_metrics.completed_reminders += 1;
                        } else {
                            metrics.task_metrics.completed_tasks += 1;
                        }
                    }
                    _ => metrics.task_metrics.created += 1,
                }
            }
            ActivityKind::Contact => metrics.contacts += 1,
            ActivityKind::Document => metrics.documents += 1,
            ActivityKind::Skill => metrics.skills += 1,
        }
        if item.action == ActivityAction::Completed {
            metrics.completed += 1;
        }
    }

    metrics
}

/// Feed volume this period vs the previous one.
pub fn activity_trend(
    items: &[ActivityItem],
    granularity: Granularity,
    today: NaiveDate,
) -> TrendDelta {
    count_period_pair(
        items.iter().map(|item| item.timestamp.date_naive()),
        granularity,
        today,
    )
    .delta()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApplicationStatus, Priority, SkillLevel, WorkMode};
    use chrono::{Duration, TimeZone};

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn sample_application(created: DateTime<Utc>, updated: DateTime<Utc>) -> Application {
        Application {
            id: "a1".to_string(),
            user_id: "u1".to_string(),
            job_title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: Some("Berlin".to_string()),
            job_url: None,
            description: None,
            work_mode: WorkMode::Hybrid,
            status: ApplicationStatus::Screening,
            salary: None,
            notes: None,
            applied_date: None,
            interview_date: None,
            offer_date: None,
            created_at: created,
            updated_at: updated,
        }
    }

    fn sample_task(status: TaskStatus, due: Option<NaiveDate>, created: DateTime<Utc>) -> Task {
        Task {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            title: "Follow up".to_string(),
            description: None,
            priority: Priority::High,
            status,
            due_date: due,
            application_id: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn sample_skill(created: DateTime<Utc>) -> Skill {
        Skill {
            id: "s1".to_string(),
            user_id: "u1".to_string(),
            name: "Rust".to_string(),
            level: SkillLevel::Advanced,
            category: Some("Languages".to_string()),
            notes: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_feed_sorted_newest_first() {
        let app = sample_application(ts(2024, 3, 1), ts(2024, 3, 1));
        let skill = sample_skill(ts(2024, 3, 5));
        let feed = build_activity_feed(&[app], &[], &[], &[], &[skill]);

        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].kind, ActivityKind::Skill);
        assert_eq!(feed[1].kind, ActivityKind::Application);
    }

    #[test]
    fn test_edited_application_gets_update_event() {
        let created = ts(2024, 3, 1);
        let app = sample_application(created, created + Duration::hours(2));
        let feed = build_activity_feed(&[app], &[], &[], &[], &[]);

        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].action, ActivityAction::Updated);
        assert_eq!(feed[1].action, ActivityAction::Created);
    }

    #[test]
    fn test_completed_task_gets_completion_event() {
        let created = ts(2024, 3, 1);
        let mut task = sample_task(TaskStatus::Completed, None, created);
        task.updated_at = created + Duration::days(1);
        let feed = build_activity_feed(&[], &[task], &[], &[], &[]);

        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].action, ActivityAction::Completed);
        assert_eq!(feed[0].title, "Completed: Follow up");
    }

    #[test]
    fn test_reminder_split_is_due_date_presence() {
        let due = NaiveDate::from_ymd_opt(2024, 3, 20);
        let reminder = sample_task(TaskStatus::Pending, due, ts(2024, 3, 1));
        let plain = Task {
            id: "t2".to_string(),
            ..sample_task(TaskStatus::Pending, None, ts(2024, 3, 1))
        };
        let feed = build_activity_feed(&[], &[reminder, plain], &[], &[], &[]);

        let reminders: Vec<_> = feed.iter().filter(|i| i.reminder).collect();
        assert_eq!(reminders.len(), 1);
        assert!(reminders[0].title.starts_with("Reminder:"));

        let filtered = filter_activity(
            &feed,
            ActivityFilter::Reminder,
            Granularity::Year,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        assert_eq!(filtered.len(), 1);
        // The task filter still sees both
        let tasks = filter_activity(
            &feed,
            ActivityFilter::Task,
            Granularity::Year,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn test_metrics_and_trend() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let app = sample_application(ts(2024, 3, 15), ts(2024, 3, 15));
        let task = sample_task(TaskStatus::Pending, None, ts(2024, 3, 14));
        let feed = build_activity_feed(&[app], &[task], &[], &[], &[]);

        let metrics = activity_metrics(&feed, Granularity::Day, today);
        assert_eq!(metrics.total, 1);
        assert_eq!(metrics.applications, 1);
        assert_eq!(metrics.tasks, 0);

        let trend = activity_trend(&feed, Granularity::Day, today);
        assert_eq!(trend.absolute, 0);
        assert_eq!(trend.percentage, 0.0);
        assert!(trend.is_increase);
    }
}
