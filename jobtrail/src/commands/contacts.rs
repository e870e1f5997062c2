//! `jobtrail contact` subcommands.

use anyhow::Result;
use clap::Subcommand;

use jobtrail_core::types::{ContactPatch, NewContact};
use jobtrail_core::Database;

use super::{current_user_id, resolve_id, short_id, truncate};

#[derive(Subcommand)]
pub enum ContactCommand {
    /// Add a contact
    Add {
        /// Contact name
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        position: Option<String>,
        /// LinkedIn profile URL
        #[arg(long)]
        linkedin: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Repeatable tag
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List contacts
    List,
    /// Edit fields on a contact
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        linkedin: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Replace all tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Delete a contact
    Rm { id: String },
}

pub fn run(db: &Database, command: ContactCommand) -> Result<()> {
    let user_id = current_user_id(db)?;

    match command {
        ContactCommand::Add {
            name,
            email,
            phone,
            company,
            position,
            linkedin,
            notes,
            tags,
        } => {
            let contact = db.create_contact(
                &user_id,
                NewContact {
                    name,
                    email,
                    phone,
                    company,
                    position,
                    linked_in: linkedin,
                    notes,
                    tags,
                },
            )?;
            println!("Added contact {}: {}", short_id(&contact.id), contact.name);
        }
        ContactCommand::List => {
            let contacts = db.list_contacts(&user_id)?;
            if contacts.is_empty() {
                println!("No contacts yet.");
                return Ok(());
            }
            println!(
                "{:<10} {:<22} {:<18} {:<16} {}",
                "ID", "NAME", "COMPANY", "POSITION", "TAGS"
            );
            for contact in &contacts {
                println!(
                    "{:<10} {:<22} {:<18} {:<16} {}",
                    short_id(&contact.id),
                    truncate(&contact.name, 21),
                    truncate(contact.company.as_deref().unwrap_or("—"), 17),
                    truncate(contact.position.as_deref().unwrap_or("—"), 15),
                    contact.tags.join(", "),
                );
            }
        }
        ContactCommand::Edit {
            id,
            name,
            email,
            phone,
            company,
            position,
            linkedin,
            notes,
            tags,
        } => {
            let contacts = db.list_contacts(&user_id)?;
            let target = resolve_id(&contacts, |c| c.id.as_str(), &id, "contact")?;
            let updated = db.update_contact(
                &target.id,
                ContactPatch {
                    name,
                    email,
                    phone,
                    company,
                    position,
                    linked_in: linkedin,
                    notes,
                    tags: if tags.is_empty() { None } else { Some(tags) },
                },
            )?;
            println!("Updated contact {} ({})", short_id(&updated.id), updated.name);
        }
        ContactCommand::Rm { id } => {
            let contacts = db.list_contacts(&user_id)?;
            let target = resolve_id(&contacts, |c| c.id.as_str(), &id, "contact")?;
            db.delete_contact(&target.id)?;
            println!("Deleted contact {}", short_id(&target.id));
        }
    }

    Ok(())
}
