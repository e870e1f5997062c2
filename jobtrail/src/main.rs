//! jobtrail - job application tracker CLI
//!
//! CRUD commands for every record type plus analytics reports, the
//! activity feed, and the mock sign-in flow. The dashboard lives in the
//! companion `jobtrail-tui` binary.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use jobtrail_core::{Config, Database};

#[derive(Parser)]
#[command(name = "jobtrail")]
#[command(about = "Track job applications, tasks, contacts, documents, and skills")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage job applications
    #[command(alias = "app")]
    Application {
        #[command(subcommand)]
        command: commands::applications::ApplicationCommand,
    },
    /// Manage tasks and reminders
    Task {
        #[command(subcommand)]
        command: commands::tasks::TaskCommand,
    },
    /// Manage networking contacts
    Contact {
        #[command(subcommand)]
        command: commands::contacts::ContactCommand,
    },
    /// Manage documents
    #[command(alias = "doc")]
    Document {
        #[command(subcommand)]
        command: commands::documents::DocumentCommand,
    },
    /// Manage skills
    Skill {
        #[command(subcommand)]
        command: commands::skills::SkillCommand,
    },
    /// Analytics report: stat cards, series, trends
    Stats(commands::stats::StatsArgs),
    /// The derived activity feed
    Activity(commands::activity::ActivityArgs),
    /// Sign in with a mock OAuth callback
    Login(commands::auth::LoginArgs),
    /// Drop the active session
    Logout,
    /// Show the current profile and session
    Whoami,
    /// Account management
    Account {
        #[command(subcommand)]
        command: commands::auth::AccountCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        jobtrail_core::logging::init(&config.logging).context("failed to initialize logging")?;

    // Open database
    let db_path = Config::database_path();
    tracing::debug!(path = %db_path.display(), "Opening database");
    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    match cli.command {
        Command::Application { command } => commands::applications::run(&db, &config, command),
        Command::Task { command } => commands::tasks::run(&db, command),
        Command::Contact { command } => commands::contacts::run(&db, command),
        Command::Document { command } => commands::documents::run(&db, command),
        Command::Skill { command } => commands::skills::run(&db, command),
        Command::Stats(args) => commands::stats::run(&db, args),
        Command::Activity(args) => commands::activity::run(&db, args),
        Command::Login(args) => commands::auth::login(&db, args),
        Command::Logout => commands::auth::logout(&db),
        Command::Whoami => commands::auth::whoami(&db),
        Command::Account { command } => commands::auth::account(&db, command),
    }
}
