//! `jobtrail application` subcommands.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;

use jobtrail_core::format::format_date_opt;
use jobtrail_core::reminders::create_follow_up_reminder;
use jobtrail_core::types::{ApplicationPatch, ApplicationStatus, NewApplication, WorkMode};
use jobtrail_core::{Config, Database};

use super::{
    current_user_id, parse_date_arg, parse_status, parse_work_mode, resolve_id, short_id, truncate,
};

#[derive(Subcommand)]
pub enum ApplicationCommand {
    /// Add a job application
    Add {
        /// Job title
        #[arg(long)]
        title: String,
        /// Company name
        #[arg(long)]
        company: String,
        #[arg(long)]
        location: Option<String>,
        /// Link to the job posting
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// on_site, hybrid, or work_from_home
        #[arg(long, value_parser = parse_work_mode)]
        work_mode: Option<WorkMode>,
        /// applied, screening, interview, offer, rejected, or withdrawn
        #[arg(long, value_parser = parse_status)]
        status: Option<ApplicationStatus>,
        #[arg(long)]
        salary: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Date applied (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        applied: Option<NaiveDate>,
        /// Interview date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        interview: Option<NaiveDate>,
        /// Offer date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        offer: Option<NaiveDate>,
        /// Skip the automatic follow-up reminder
        #[arg(long)]
        no_follow_up: bool,
    },
    /// List applications, optionally filtered by status (the offers
    /// view is `list --status offer`)
    List {
        #[arg(long, value_parser = parse_status)]
        status: Option<ApplicationStatus>,
    },
    /// Show one application in full
    Show { id: String },
    /// Edit fields on an application
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_work_mode)]
        work_mode: Option<WorkMode>,
        #[arg(long, value_parser = parse_status)]
        status: Option<ApplicationStatus>,
        #[arg(long)]
        salary: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long, value_parser = parse_date_arg)]
        applied: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date_arg)]
        interview: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date_arg)]
        offer: Option<NaiveDate>,
    },
    /// Delete an application (tasks that reference it are kept)
    Rm { id: String },
}

pub fn run(db: &Database, config: &Config, command: ApplicationCommand) -> Result<()> {
    let user_id = current_user_id(db)?;

    match command {
        ApplicationCommand::Add {
            title,
            company,
            location,
            url,
            description,
            work_mode,
            status,
            salary,
            notes,
            applied,
            interview,
            offer,
            no_follow_up,
        } => {
            let app = db.create_application(
                &user_id,
                NewApplication {
                    job_title: title,
                    company,
                    location,
                    job_url: url,
                    description,
                    work_mode,
                    status,
                    salary,
                    notes,
                    applied_date: applied,
                    interview_date: interview,
                    offer_date: offer,
                },
            )?;
            println!(
                "Added application {}: {} at {}",
                short_id(&app.id),
                app.job_title,
                app.company
            );

            if !no_follow_up {
                if let Some(task) = create_follow_up_reminder(db, &config.reminders, &app) {
                    println!(
                        "Follow-up reminder due {}",
                        format_date_opt(task.due_date)
                    );
                }
            }
        }
        ApplicationCommand::List { status } => {
            let mut apps = db.list_applications(&user_id)?;
            if let Some(status) = status {
                apps.retain(|a| a.status == status);
            }
            if apps.is_empty() {
                println!("No applications yet.");
                return Ok(());
            }
            println!(
                "{:<10} {:<26} {:<18} {:<11} {:<10}",
                "ID", "TITLE", "COMPANY", "STATUS", "APPLIED"
            );
            for app in &apps {
                println!(
                    "{:<10} {:<26} {:<18} {:<11} {:<10}",
                    short_id(&app.id),
                    truncate(&app.job_title, 25),
                    truncate(&app.company, 17),
                    app.status.display_name(),
                    format_date_opt(app.applied_date),
                );
            }
        }
        ApplicationCommand::Show { id } => {
            let apps = db.list_applications(&user_id)?;
            let app = resolve_id(&apps, |a| a.id.as_str(), &id, "application")?;
            println!("id:         {}", app.id);
            println!("title:      {}", app.job_title);
            println!("company:    {}", app.company);
            println!("status:     {}", app.status.display_name());
            println!("work mode:  {}", app.work_mode.display_name());
            println!("location:   {}", app.location.as_deref().unwrap_or("—"));
            println!("url:        {}", app.job_url.as_deref().unwrap_or("—"));
            println!("salary:     {}", app.salary.as_deref().unwrap_or("—"));
            println!("applied:    {}", format_date_opt(app.applied_date));
            println!("interview:  {}", format_date_opt(app.interview_date));
            println!("offer:      {}", format_date_opt(app.offer_date));
            if let Some(notes) = &app.notes {
                println!("notes:      {}", notes);
            }
            if let Some(description) = &app.description {
                println!("description:\n{}", description);
            }

            let tasks = db.list_tasks_for_application(&app.id)?;
            if !tasks.is_empty() {
                println!("linked tasks:");
                for task in &tasks {
                    println!(
                        "  {} [{}] {}",
                        short_id(&task.id),
                        task.status.display_name(),
                        task.title
                    );
                }
            }
        }
        ApplicationCommand::Edit {
            id,
            title,
            company,
            location,
            url,
            description,
            work_mode,
            status,
            salary,
            notes,
            applied,
            interview,
            offer,
        } => {
            let apps = db.list_applications(&user_id)?;
            let target = resolve_id(&apps, |a| a.id.as_str(), &id, "application")?;
            let updated = db.update_application(
                &target.id,
                ApplicationPatch {
                    job_title: title,
                    company,
                    location,
                    job_url: url,
                    description,
                    work_mode,
                    status,
                    salary,
                    notes,
                    applied_date: applied,
                    interview_date: interview,
                    offer_date: offer,
                },
            )?;
            println!(
                "Updated application {} ({} at {}, {})",
                short_id(&updated.id),
                updated.job_title,
                updated.company,
                updated.status.display_name()
            );
        }
        ApplicationCommand::Rm { id } => {
            let apps = db.list_applications(&user_id)?;
            let target = resolve_id(&apps, |a| a.id.as_str(), &id, "application")?;
            db.delete_application(&target.id)?;
            println!("Deleted application {}", short_id(&target.id));
        }
    }

    Ok(())
}
