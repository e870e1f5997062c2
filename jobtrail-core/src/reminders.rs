//! Follow-up reminder creation.

use crate::analytics::add_working_days;
use crate::config::ReminderConfig;
use crate::store::Database;
use crate::types::{Application, NewTask, Priority, Task, TaskStatus};

/// Create the follow-up reminder for a freshly added application.
///
/// The reminder is due a few working days after the applied date and is
/// linked back to the application. A failure here is logged and
/// swallowed: the application was already created successfully, and the
/// reminder is a convenience on top.
pub fn create_follow_up_reminder(
    db: &Database,
    config: &ReminderConfig,
    application: &Application,
) -> Option<Task> {
    if !config.follow_up {
        return None;
    }
    let applied_date = application.applied_date?;

    let due = add_working_days(applied_date, config.follow_up_working_days);
    let new_task = NewTask {
        title: format!(
            "Follow up on {} at {}",
            application.job_title, application.company
        ),
        description: Some(format!(
            "Check for updates on your application for the {} position at {}.",
            application.job_title, application.company
        )),
        priority: Some(Priority::Medium),
        status: Some(TaskStatus::Pending),
        due_date: Some(due),
        application_id: Some(application.id.clone()),
    };

    match db.create_task(&application.user_id, new_task) {
        Ok(task) => {
            tracing::debug!(
                application = %application.id,
                due = %due,
                "Follow-up reminder created"
            );
            Some(task)
        }
        Err(e) => {
            tracing::warn!(
                application = %application.id,
                error = %e,
                "Failed to create follow-up reminder"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_follow_up_created_with_working_day_offset() {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();

        let app = db
            .create_application(
                "u1",
                crate::types::NewApplication {
                    job_title: "Engineer".to_string(),
                    company: "Acme".to_string(),
                    // A Friday; three working days later is Wednesday
                    applied_date: NaiveDate::from_ymd_opt(2024, 3, 15),
                    ..Default::default()
                },
            )
            .unwrap();

        let task = create_follow_up_reminder(&db, &ReminderConfig::default(), &app).unwrap();
        assert_eq!(task.title, "Follow up on Engineer at Acme");
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 3, 20));
        assert_eq!(task.application_id.as_deref(), Some(app.id.as_str()));
        assert!(task.is_reminder());
    }

    #[test]
    fn test_no_reminder_without_applied_date() {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();

        let app = db
            .create_application(
                "u1",
                crate::types::NewApplication {
                    job_title: "Engineer".to_string(),
                    company: "Acme".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(create_follow_up_reminder(&db, &ReminderConfig::default(), &app).is_none());
    }

    #[test]
    fn test_disabled_by_config() {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();

        let app = db
            .create_application(
                "u1",
                crate::types::NewApplication {
                    job_title: "Engineer".to_string(),
                    company: "Acme".to_string(),
                    applied_date: NaiveDate::from_ymd_opt(2024, 3, 15),
                    ..Default::default()
                },
            )
            .unwrap();

        let config = ReminderConfig {
            follow_up: false,
            ..Default::default()
        };
        assert!(create_follow_up_reminder(&db, &config, &app).is_none());
    }
}
