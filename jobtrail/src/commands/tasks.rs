//! `jobtrail task` subcommands.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;

use jobtrail_core::format::format_date_opt;
use jobtrail_core::types::{NewTask, Priority, TaskPatch, TaskStatus};
use jobtrail_core::Database;

use super::{
    current_user_id, parse_date_arg, parse_priority, parse_task_status, resolve_id, short_id,
    truncate,
};

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Add a task; give it a due date to make it a reminder
    Add {
        /// Task title
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// low, medium, or high
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
        /// pending, in_progress, or completed
        #[arg(long, value_parser = parse_task_status)]
        status: Option<TaskStatus>,
        /// Due date (YYYY-MM-DD); a dated task shows up as a reminder
        #[arg(long, value_parser = parse_date_arg)]
        due: Option<NaiveDate>,
        /// Application this task is about (id or id prefix)
        #[arg(long)]
        application: Option<String>,
    },
    /// List tasks
    List {
        /// Only tasks with a due date
        #[arg(long)]
        reminders: bool,
    },
    /// Edit fields on a task
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
        #[arg(long, value_parser = parse_task_status)]
        status: Option<TaskStatus>,
        #[arg(long, value_parser = parse_date_arg)]
        due: Option<NaiveDate>,
    },
    /// Mark a task completed
    Done { id: String },
    /// Delete a task
    Rm { id: String },
}

pub fn run(db: &Database, command: TaskCommand) -> Result<()> {
    let user_id = current_user_id(db)?;

    match command {
        TaskCommand::Add {
            title,
            description,
            priority,
            status,
            due,
            application,
        } => {
            let application_id = match application {
                Some(needle) => {
                    let apps = db.list_applications(&user_id)?;
                    Some(
                        resolve_id(&apps, |a| a.id.as_str(), &needle, "application")?
                            .id
                            .clone(),
                    )
                }
                None => None,
            };

            let task = db.create_task(
                &user_id,
                NewTask {
                    title,
                    description,
                    priority,
                    status,
                    due_date: due,
                    application_id,
                },
            )?;
            let label = if task.is_reminder() { "reminder" } else { "task" };
            println!("Added {} {}: {}", label, short_id(&task.id), task.title);
        }
        TaskCommand::List { reminders } => {
            let mut tasks = db.list_tasks(&user_id)?;
            if reminders {
                tasks.retain(|t| t.is_reminder());
            }
            if tasks.is_empty() {
                println!("No tasks.");
                return Ok(());
            }
            println!(
                "{:<10} {:<32} {:<8} {:<12} {:<10}",
                "ID", "TITLE", "PRIORITY", "STATUS", "DUE"
            );
            for task in &tasks {
                println!(
                    "{:<10} {:<32} {:<8} {:<12} {:<10}",
                    short_id(&task.id),
                    truncate(&task.title, 31),
                    task.priority.display_name(),
                    task.status.display_name(),
                    format_date_opt(task.due_date),
                );
            }
        }
        TaskCommand::Edit {
            id,
            title,
            description,
            priority,
            status,
            due,
        } => {
            let tasks = db.list_tasks(&user_id)?;
            let target = resolve_id(&tasks, |t| t.id.as_str(), &id, "task")?;
            let updated = db.update_task(
                &target.id,
                TaskPatch {
                    title,
                    description,
                    priority,
                    status,
                    due_date: due,
                    application_id: None,
                },
            )?;
            println!(
                "Updated task {} ({})",
                short_id(&updated.id),
                updated.status.display_name()
            );
        }
        TaskCommand::Done { id } => {
            let tasks = db.list_tasks(&user_id)?;
            let target = resolve_id(&tasks, |t| t.id.as_str(), &id, "task")?;
            let updated = db.update_task(
                &target.id,
                TaskPatch {
                    status: Some(TaskStatus::Completed),
                    ..Default::default()
                },
            )?;
            println!("Completed: {}", updated.title);
        }
        TaskCommand::Rm { id } => {
            let tasks = db.list_tasks(&user_id)?;
            let target = resolve_id(&tasks, |t| t.id.as_str(), &id, "task")?;
            db.delete_task(&target.id)?;
            println!("Deleted task {}", short_id(&target.id));
        }
    }

    Ok(())
}
