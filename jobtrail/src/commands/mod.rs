//! CLI command implementations.

pub mod activity;
pub mod applications;
pub mod auth;
pub mod contacts;
pub mod documents;
pub mod skills;
pub mod stats;
pub mod tasks;

use anyhow::{bail, Result};
use chrono::NaiveDate;

use jobtrail_core::types::{
    ApplicationStatus, DocumentType, Priority, SkillLevel, TaskStatus, WorkMode,
};
use jobtrail_core::Database;

/// The owner every command operates as: the signed-in profile, or the
/// demo profile when signed out.
pub fn current_user_id(db: &Database) -> Result<String> {
    Ok(db.current_user()?.id)
}

/// Resolve a record id from a full id or a unique prefix.
///
/// IDs are UUIDs, so typing the first few characters is enough in
/// practice; ambiguous or unknown prefixes are an error rather than a
/// guess.
pub fn resolve_id<'a, T>(
    records: &'a [T],
    id_of: impl Fn(&T) -> &str,
    needle: &str,
    entity: &str,
) -> Result<&'a T> {
    if let Some(exact) = records.iter().find(|r| id_of(r) == needle) {
        return Ok(exact);
    }

    let matches: Vec<&T> = records
        .iter()
        .filter(|r| id_of(r).starts_with(needle))
        .collect();
    match matches.len() {
        0 => bail!("no {} found matching '{}'", entity, needle),
        1 => Ok(matches[0]),
        n => bail!(
            "'{}' matches {} {}s; use more characters of the id",
            needle,
            n,
            entity
        ),
    }
}

/// Short id prefix for list output.
pub fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}

/// Clip a string for column display.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

// clap value parsers delegating to the core FromStr impls

pub fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    jobtrail_core::analytics::parse_date(s).map_err(|e| e.to_string())
}

pub fn parse_status(s: &str) -> Result<ApplicationStatus, String> {
    s.parse()
}

pub fn parse_work_mode(s: &str) -> Result<WorkMode, String> {
    s.parse()
}

pub fn parse_priority(s: &str) -> Result<Priority, String> {
    s.parse()
}

pub fn parse_task_status(s: &str) -> Result<TaskStatus, String> {
    s.parse()
}

pub fn parse_doc_type(s: &str) -> Result<DocumentType, String> {
    s.parse()
}

pub fn parse_skill_level(s: &str) -> Result<SkillLevel, String> {
    s.parse()
}
