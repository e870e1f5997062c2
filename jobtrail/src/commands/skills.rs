//! `jobtrail skill` subcommands.

use anyhow::Result;
use clap::Subcommand;

use jobtrail_core::types::{NewSkill, SkillLevel, SkillPatch};
use jobtrail_core::Database;

use super::{current_user_id, parse_skill_level, resolve_id, short_id, truncate};

#[derive(Subcommand)]
pub enum SkillCommand {
    /// Add a skill (names are unique per account, ignoring case)
    Add {
        /// Skill name
        #[arg(long)]
        name: String,
        /// beginner, intermediate, advanced, or expert
        #[arg(long, value_parser = parse_skill_level)]
        level: Option<SkillLevel>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List skills
    List,
    /// Edit fields on a skill
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_skill_level)]
        level: Option<SkillLevel>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a skill
    Rm { id: String },
}

pub fn run(db: &Database, command: SkillCommand) -> Result<()> {
    let user_id = current_user_id(db)?;

    match command {
        SkillCommand::Add {
            name,
            level,
            category,
            notes,
        } => {
            let skill = db.create_skill(
                &user_id,
                NewSkill {
                    name,
                    level,
                    category,
                    notes,
                },
            )?;
            println!(
                "Added skill {}: {} ({})",
                short_id(&skill.id),
                skill.name,
                skill.level.display_name()
            );
        }
        SkillCommand::List => {
            let skills = db.list_skills(&user_id)?;
            if skills.is_empty() {
                println!("No skills yet.");
                return Ok(());
            }
            println!(
                "{:<10} {:<24} {:<13} {}",
                "ID", "NAME", "LEVEL", "CATEGORY"
            );
            for skill in &skills {
                println!(
                    "{:<10} {:<24} {:<13} {}",
                    short_id(&skill.id),
                    truncate(&skill.name, 23),
                    skill.level.display_name(),
                    skill.category.as_deref().unwrap_or("—"),
                );
            }
        }
        SkillCommand::Edit {
            id,
            name,
            level,
            category,
            notes,
        } => {
            let skills = db.list_skills(&user_id)?;
            let target = resolve_id(&skills, |s| s.id.as_str(), &id, "skill")?;
            let updated = db.update_skill(
                &target.id,
                SkillPatch {
                    name,
                    level,
                    category,
                    notes,
                },
            )?;
            println!(
                "Updated skill {} ({}, {})",
                short_id(&updated.id),
                updated.name,
                updated.level.display_name()
            );
        }
        SkillCommand::Rm { id } => {
            let skills = db.list_skills(&user_id)?;
            let target = resolve_id(&skills, |s| s.id.as_str(), &id, "skill")?;
            db.delete_skill(&target.id)?;
            println!("Deleted skill {}", short_id(&target.id));
        }
    }

    Ok(())
}
