//! `jobtrail document` subcommands.

use anyhow::{bail, Result};
use clap::Subcommand;
use std::path::PathBuf;

use jobtrail_core::fileref;
use jobtrail_core::types::{DocumentPatch, DocumentType, NewDocument};
use jobtrail_core::Database;

use super::{current_user_id, parse_doc_type, resolve_id, short_id, truncate};

#[derive(Subcommand)]
pub enum DocumentCommand {
    /// Add a document from a local file or an external URL
    Add {
        /// Document name
        #[arg(long)]
        name: String,
        /// resume, cover_letter, portfolio, certificate, or other
        #[arg(long = "type", value_parser = parse_doc_type)]
        doc_type: Option<DocumentType>,
        /// Local file to embed as a data URL
        #[arg(long, conflicts_with = "url")]
        file: Option<PathBuf>,
        /// External URL to reference instead of embedding
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Repeatable tag
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List documents
    List,
    /// Edit fields on a document
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type", value_parser = parse_doc_type)]
        doc_type: Option<DocumentType>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Replace all tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Delete a document
    Rm { id: String },
}

pub fn run(db: &Database, command: DocumentCommand) -> Result<()> {
    let user_id = current_user_id(db)?;

    match command {
        DocumentCommand::Add {
            name,
            doc_type,
            file,
            url,
            description,
            tags,
        } => {
            let file_url = match (file, url) {
                (Some(path), None) => fileref::to_data_url(&path)?,
                (None, Some(url)) => url,
                (None, None) => bail!("either --file or --url is required"),
                (Some(_), Some(_)) => unreachable!("clap conflicts_with"),
            };

            let doc = db.create_document(
                &user_id,
                NewDocument {
                    name,
                    doc_type,
                    file_url,
                    description,
                    tags,
                },
            )?;
            let storage = if fileref::is_data_url(&doc.file_url) {
                "embedded"
            } else {
                "linked"
            };
            println!(
                "Added document {}: {} ({}, {})",
                short_id(&doc.id),
                doc.name,
                doc.doc_type.display_name(),
                storage
            );
        }
        DocumentCommand::List => {
            let documents = db.list_documents(&user_id)?;
            if documents.is_empty() {
                println!("No documents yet.");
                return Ok(());
            }
            println!(
                "{:<10} {:<26} {:<13} {:<9} {}",
                "ID", "NAME", "TYPE", "STORAGE", "TAGS"
            );
            for doc in &documents {
                let storage = if fileref::is_data_url(&doc.file_url) {
                    "embedded"
                } else {
                    "linked"
                };
                println!(
                    "{:<10} {:<26} {:<13} {:<9} {}",
                    short_id(&doc.id),
                    truncate(&doc.name, 25),
                    doc.doc_type.display_name(),
                    storage,
                    doc.tags.join(", "),
                );
            }
        }
        DocumentCommand::Edit {
            id,
            name,
            doc_type,
            url,
            description,
            tags,
        } => {
            let documents = db.list_documents(&user_id)?;
            let target = resolve_id(&documents, |d| d.id.as_str(), &id, "document")?;
            let updated = db.update_document(
                &target.id,
                DocumentPatch {
                    name,
                    doc_type,
                    file_url: url,
                    description,
                    tags: if tags.is_empty() { None } else { Some(tags) },
                },
            )?;
            println!("Updated document {} ({})", short_id(&updated.id), updated.name);
        }
        DocumentCommand::Rm { id } => {
            let documents = db.list_documents(&user_id)?;
            let target = resolve_id(&documents, |d| d.id.as_str(), &id, "document")?;
            db.delete_document(&target.id)?;
            println!("Deleted document {}", short_id(&target.id));
        }
    }

    Ok(())
}
