//! Dashboard aggregates.
//!
//! Pure tallies over store snapshots; every view recomputes them from a
//! fresh `list_*` call rather than keeping derived state anywhere.

use crate::types::{Application, ApplicationStatus, Task, TaskStatus};

/// Headline application counts for the stat cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationStats {
    pub total: i64,
    /// Applied, Screening, or Interview
    pub active: i64,
    pub interviews: i64,
    pub offers: i64,
}

impl ApplicationStats {
    pub fn from_applications(applications: &[Application]) -> Self {
        let mut stats = Self::default();
        for app in applications {
            stats.total += 1;
            if app.status.is_active() {
                stats.active += 1;
            }
            if app.status == ApplicationStatus::Interview {
                stats.interviews += 1;
            }
            if app.status == ApplicationStatus::Offer {
                stats.offers += 1;
            }
        }
        stats
    }

    /// Offers as a rounded percentage of all applications; 0 when empty.
    pub fn success_rate(&self) -> i64 {
        if self.total == 0 {
            0
        } else {
            ((self.offers as f64 / self.total as f64) * 100.0).round() as i64
        }
    }
}

/// Counts per status, in board order, zero-filled.
pub fn status_distribution(applications: &[Application]) -> Vec<(ApplicationStatus, i64)> {
    ApplicationStatus::ALL
        .iter()
        .map(|&status| {
            let count = applications.iter().filter(|a| a.status == status).count() as i64;
            (status, count)
        })
        .collect()
}

/// A company with its application count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyCount {
    pub name: String,
    pub count: i64,
}

/// Companies ranked by application count (ties broken by name so the
/// ranking is stable).
pub fn top_companies(applications: &[Application], limit: usize) -> Vec<CompanyCount> {
    let mut counts: std::collections::HashMap<&str, i64> = std::collections::HashMap::new();
    for app in applications {
        if !app.company.is_empty() {
            *counts.entry(app.company.as_str()).or_default() += 1;
        }
    }

    let mut ranked: Vec<CompanyCount> = counts
        .into_iter()
        .map(|(name, count)| CompanyCount {
            name: name.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(limit);
    ranked
}

/// Tasks still waiting to be started.
pub fn pending_task_count(tasks: &[Task]) -> i64 {
    tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending)
        .count() as i64
}

/// The most recently created applications, newest first.
pub fn recent_applications(applications: &[Application], limit: usize) -> Vec<&Application> {
    let mut sorted: Vec<&Application> = applications.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Priority, WorkMode};
    use chrono::{Duration, Utc};

    fn app(status: ApplicationStatus, company: &str) -> Application {
        let now = Utc::now();
        Application {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: "u1".to_string(),
            job_title: "Engineer".to_string(),
            company: company.to_string(),
            location: None,
            job_url: None,
            description: None,
            work_mode: WorkMode::OnSite,
            status,
            salary: None,
            notes: None,
            applied_date: None,
            interview_date: None,
            offer_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn task(status: TaskStatus) -> Task {
        let now = Utc::now();
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: "u1".to_string(),
            title: "Task".to_string(),
            description: None,
            priority: Priority::Medium,
            status,
            due_date: None,
            application_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_application_stats() {
        let apps = vec![
            app(ApplicationStatus::Applied, "Acme"),
            app(ApplicationStatus::Interview, "Acme"),
            app(ApplicationStatus::Offer, "Globex"),
            app(ApplicationStatus::Rejected, "Initech"),
        ];
        let stats = ApplicationStats::from_applications(&apps);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.interviews, 1);
        assert_eq!(stats.offers, 1);
        assert_eq!(stats.success_rate(), 25);
    }

    #[test]
    fn test_success_rate_empty_is_zero() {
        assert_eq!(ApplicationStats::default().success_rate(), 0);
    }

    #[test]
    fn test_status_distribution_zero_filled() {
        let apps = vec![app(ApplicationStatus::Applied, "Acme")];
        let distribution = status_distribution(&apps);
        assert_eq!(distribution.len(), 6);
        assert_eq!(distribution[0], (ApplicationStatus::Applied, 1));
        assert_eq!(distribution[3], (ApplicationStatus::Offer, 0));
    }

    #[test]
    fn test_top_companies_ranked_and_limited() {
        let apps = vec![
            app(ApplicationStatus::Applied, "Acme"),
            app(ApplicationStatus::Applied, "Acme"),
            app(ApplicationStatus::Applied, "Globex"),
            app(ApplicationStatus::Applied, "Initech"),
        ];
        let top = top_companies(&apps, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Acme");
        assert_eq!(top[0].count, 2);
        assert_eq!(top[1].name, "Globex");
    }

    #[test]
    fn test_pending_task_count() {
        let tasks = vec![
            task(TaskStatus::Pending),
            task(TaskStatus::Completed),
            task(TaskStatus::Pending),
        ];
        assert_eq!(pending_task_count(&tasks), 2);
    }

    #[test]
    fn test_recent_applications_newest_first() {
        let mut older = app(ApplicationStatus::Applied, "Acme");
        older.created_at -= Duration::days(2);
        let newer = app(ApplicationStatus::Applied, "Globex");
        let apps = vec![older, newer];

        let recent = recent_applications(&apps, 3);
        assert_eq!(recent[0].company, "Globex");
        assert_eq!(recent[1].company, "Acme");
    }
}
