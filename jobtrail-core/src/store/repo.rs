//! Database repository layer
//!
//! Provides query and CRUD operations for all entity types. Every
//! operation is owner-scoped: list queries filter on `user_id`, and
//! writes validate their input before touching the database so a
//! rejected record never partially persists.

use crate::error::{Error, Result};
use crate::types::*;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

/// Whole-store snapshot for one owner, used by the activity feed and
/// the dashboard. Replaced wholesale on every refresh.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub applications: Vec<Application>,
    pub tasks: Vec<Task>,
    pub contacts: Vec<Contact>,
    pub documents: Vec<Document>,
    pub skills: Vec<Skill>,
}

/// Database handle with connection pooling (single connection for now)
pub struct Database {
    conn: Mutex<Connection>,
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

fn date_to_sql(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

fn date_from_sql(value: Option<String>) -> Option<NaiveDate> {
    value.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

fn datetime_from_sql(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn tags_to_sql(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

fn tags_from_sql(value: &str) -> Vec<String> {
    serde_json::from_str(value).unwrap_or_default()
}

/// Reject blank required fields before anything is written.
fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::Validation(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for better concurrency
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    /// Fetch everything one owner can see in a single pass.
    pub fn snapshot(&self, user_id: &str) -> Result<Snapshot> {
        Ok(Snapshot {
            applications: self.list_applications(user_id)?,
            tasks: self.list_tasks(user_id)?,
            contacts: self.list_contacts(user_id)?,
            documents: self.list_documents(user_id)?,
            skills: self.list_skills(user_id)?,
        })
    }

    // ============================================
    // Application operations
    // ============================================

    /// List all applications for an owner, in insertion order
    pub fn list_applications(&self, user_id: &str) -> Result<Vec<Application>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT * FROM applications WHERE user_id = ? ORDER BY rowid ASC")?;

        let applications = stmt
            .query_map([user_id], Self::row_to_application)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(applications)
    }

    /// Get an application by ID
    pub fn get_application(&self, id: &str) -> Result<Option<Application>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM applications WHERE id = ?",
            [id],
            Self::row_to_application,
        )
        .optional()
        .map_err(Error::from)
    }

    /// Create an application, assigning a fresh id and timestamp pair
    pub fn create_application(&self, user_id: &str, new: NewApplication) -> Result<Application> {
        require("job title", &new.job_title)?;
        require("company", &new.company)?;

        let now = Utc::now();
        let app = Application {
            id: fresh_id(),
            user_id: user_id.to_string(),
            job_title: new.job_title.trim().to_string(),
            company: new.company.trim().to_string(),
            location: new.location,
            job_url: new.job_url,
            description: new.description,
            work_mode: new.work_mode.unwrap_or_default(),
            status: new.status.unwrap_or_default(),
            salary: new.salary,
            notes: new.notes,
            applied_date: new.applied_date,
            interview_date: new.interview_date,
            offer_date: new.offer_date,
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO applications (id, user_id, job_title, company, location, job_url,
                                      description, work_mode, status, salary, notes,
                                      applied_date, interview_date, offer_date,
                                      created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            params![
                app.id,
                app.user_id,
                app.job_title,
                app.company,
                app.location,
                app.job_url,
                app.description,
                app.work_mode.as_str(),
                app.status.as_str(),
                app.salary,
                app.notes,
                date_to_sql(app.applied_date),
                date_to_sql(app.interview_date),
                date_to_sql(app.offer_date),
                app.created_at.to_rfc3339(),
                app.updated_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!(id = %app.id, company = %app.company, "Application created");
        Ok(app)
    }

    /// Merge patch fields into an application, refreshing only the
    /// update timestamp
    pub fn update_application(&self, id: &str, patch: ApplicationPatch) -> Result<Application> {
        let mut app = self
            .get_application(id)?
            .ok_or_else(|| Error::not_found("application", id))?;

        if let Some(job_title) = patch.job_title {
            require("job title", &job_title)?;
            app.job_title = job_title.trim().to_string();
        }
        if let Some(company) = patch.company {
            require("company", &company)?;
            app.company = company.trim().to_string();
        }
        if let Some(location) = patch.location {
            app.location = Some(location);
        }
        if let Some(job_url) = patch.job_url {
            app.job_url = Some(job_url);
        }
        if let Some(description) = patch.description {
            app.description = Some(description);
        }
        if let Some(work_mode) = patch.work_mode {
            app.work_mode = work_mode;
        }
        if let Some(status) = patch.status {
            app.status = status;
        }
        if let Some(salary) = patch.salary {
            app.salary = Some(salary);
        }
        if let Some(notes) = patch.notes {
            app.notes = Some(notes);
        }
        if let Some(applied_date) = patch.applied_date {
            app.applied_date = Some(applied_date);
        }
        if let Some(interview_date) = patch.interview_date {
            app.interview_date = Some(interview_date);
        }
        if let Some(offer_date) = patch.offer_date {
            app.offer_date = Some(offer_date);
        }
        app.updated_at = Utc::now();

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            UPDATE applications
            SET job_title = ?1, company = ?2, location = ?3, job_url = ?4, description = ?5,
                work_mode = ?6, status = ?7, salary = ?8, notes = ?9,
                applied_date = ?10, interview_date = ?11, offer_date = ?12, updated_at = ?13
            WHERE id = ?14
            "#,
            params![
                app.job_title,
                app.company,
                app.location,
                app.job_url,
                app.description,
                app.work_mode.as_str(),
                app.status.as_str(),
                app.salary,
                app.notes,
                date_to_sql(app.applied_date),
                date_to_sql(app.interview_date),
                date_to_sql(app.offer_date),
                app.updated_at.to_rfc3339(),
                app.id,
            ],
        )?;

        Ok(app)
    }

    /// Delete an application. Tasks that reference it are left in place.
    pub fn delete_application(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM applications WHERE id = ?", [id])?;
        if deleted == 0 {
            return Err(Error::not_found("application", id));
        }
        tracing::debug!(id, "Application deleted");
        Ok(())
    }

    fn row_to_application(row: &Row) -> rusqlite::Result<Application> {
        let work_mode_str: String = row.get("work_mode")?;
        let status_str: String = row.get("status")?;
        let created_at_str: String = row.get("created_at")?;
        let updated_at_str: String = row.get("updated_at")?;

        Ok(Application {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            job_title: row.get("job_title")?,
            company: row.get("company")?,
            location: row.get("location")?,
            job_url: row.get("job_url")?,
            description: row.get("description")?,
            work_mode: work_mode_str.parse().unwrap_or_default(),
            status: status_str.parse().unwrap_or_default(),
            salary: row.get("salary")?,
            notes: row.get("notes")?,
            applied_date: date_from_sql(row.get("applied_date")?),
            interview_date: date_from_sql(row.get("interview_date")?),
            offer_date: date_from_sql(row.get("offer_date")?),
            created_at: datetime_from_sql(&created_at_str),
            updated_at: datetime_from_sql(&updated_at_str),
        })
    }

    // ============================================
    // Task operations
    // ============================================

    /// List all tasks for an owner, in insertion order
    pub fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT * FROM tasks WHERE user_id = ? ORDER BY rowid ASC")?;

        let tasks = stmt
            .query_map([user_id], Self::row_to_task)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// List tasks referencing an application
    pub fn list_tasks_for_application(&self, application_id: &str) -> Result<Vec<Task>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT * FROM tasks WHERE application_id = ? ORDER BY rowid ASC")?;

        let tasks = stmt
            .query_map([application_id], Self::row_to_task)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// Get a task by ID
    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT * FROM tasks WHERE id = ?", [id], Self::row_to_task)
            .optional()
            .map_err(Error::from)
    }

    /// Create a task
    pub fn create_task(&self, user_id: &str, new: NewTask) -> Result<Task> {
        require("title", &new.title)?;

        let now = Utc::now();
        let task = Task {
            id: fresh_id(),
            user_id: user_id.to_string(),
            title: new.title.trim().to_string(),
            description: new.description,
            priority: new.priority.unwrap_or_default(),
            status: new.status.unwrap_or_default(),
            due_date: new.due_date,
            application_id: new.application_id,
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO tasks (id, user_id, title, description, priority, status,
                               due_date, application_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                task.id,
                task.user_id,
                task.title,
                task.description,
                task.priority.as_str(),
                task.status.as_str(),
                date_to_sql(task.due_date),
                task.application_id,
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!(id = %task.id, reminder = task.is_reminder(), "Task created");
        Ok(task)
    }

    /// Merge patch fields into a task
    pub fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        let mut task = self
            .get_task(id)?
            .ok_or_else(|| Error::not_found("task", id))?;

        if let Some(title) = patch.title {
            require("title", &title)?;
            task.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(application_id) = patch.application_id {
            task.application_id = Some(application_id);
        }
        task.updated_at = Utc::now();

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            UPDATE tasks
            SET title = ?1, description = ?2, priority = ?3, status = ?4,
                due_date = ?5, application_id = ?6, updated_at = ?7
            WHERE id = ?8
            "#,
            params![
                task.title,
                task.description,
                task.priority.as_str(),
                task.status.as_str(),
                date_to_sql(task.due_date),
                task.application_id,
                task.updated_at.to_rfc3339(),
                task.id,
            ],
        )?;

        Ok(task)
    }

    /// Delete a task
    pub fn delete_task(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM tasks WHERE id = ?", [id])?;
        if deleted == 0 {
            return Err(Error::not_found("task", id));
        }
        Ok(())
    }

    fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
        let priority_str: String = row.get("priority")?;
        let status_str: String = row.get("status")?;
        let created_at_str: String = row.get("created_at")?;
        let updated_at_str: String = row.get("updated_at")?;

        Ok(Task {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            priority: priority_str.parse().unwrap_or_default(),
            status: status_str.parse().unwrap_or_default(),
            due_date: date_from_sql(row.get("due_date")?),
            application_id: row.get("application_id")?,
            created_at: datetime_from_sql(&created_at_str),
            updated_at: datetime_from_sql(&updated_at_str),
        })
    }

    // ============================================
    // Contact operations
    // ============================================

    /// List all contacts for an owner, in insertion order
    pub fn list_contacts(&self, user_id: &str) -> Result<Vec<Contact>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT * FROM contacts WHERE user_id = ? ORDER BY rowid ASC")?;

        let contacts = stmt
            .query_map([user_id], Self::row_to_contact)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(contacts)
    }

    /// Get a contact by ID
    pub fn get_contact(&self, id: &str) -> Result<Option<Contact>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM contacts WHERE id = ?",
            [id],
            Self::row_to_contact,
        )
        .optional()
        .map_err(Error::from)
    }

    /// Create a contact
    pub fn create_contact(&self, user_id: &str, new: NewContact) -> Result<Contact> {
        require("name", &new.name)?;

        let now = Utc::now();
        let contact = Contact {
            id: fresh_id(),
            user_id: user_id.to_string(),
            name: new.name.trim().to_string(),
            email: new.email,
            phone: new.phone,
            company: new.company,
            position: new.position,
            linked_in: new.linked_in,
            notes: new.notes,
            tags: new.tags,
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO contacts (id, user_id, name, email, phone, company, position,
                                  linked_in, notes, tags, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                contact.id,
                contact.user_id,
                contact.name,
                contact.email,
                contact.phone,
                contact.company,
                contact.position,
                contact.linked_in,
                contact.notes,
                tags_to_sql(&contact.tags),
                contact.created_at.to_rfc3339(),
                contact.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(contact)
    }

    /// Merge patch fields into a contact
    pub fn update_contact(&self, id: &str, patch: ContactPatch) -> Result<Contact> {
        let mut contact = self
            .get_contact(id)?
            .ok_or_else(|| Error::not_found("contact", id))?;

        if let Some(name) = patch.name {
            require("name", &name)?;
            contact.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            contact.email = Some(email);
        }
        if let Some(phone) = patch.phone {
            contact.phone = Some(phone);
        }
        if let Some(company) = patch.company {
            contact.company = Some(company);
        }
        if let Some(position) = patch.position {
            contact.position = Some(position);
        }
        if let Some(linked_in) = patch.linked_in {
            contact.linked_in = Some(linked_in);
        }
        if let Some(notes) = patch.notes {
            contact.notes = Some(notes);
        }
        if let Some(tags) = patch.tags {
            contact.tags = tags;
        }
        contact.updated_at = Utc::now();

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            UPDATE contacts
            SET name = ?1, email = ?2, phone = ?3, company = ?4, position = ?5,
                linked_in = ?6, notes = ?7, tags = ?8, updated_at = ?9
            WHERE id = ?10
            "#,
            params![
                contact.name,
                contact.email,
                contact.phone,
                contact.company,
                contact.position,
                contact.linked_in,
                contact.notes,
                tags_to_sql(&contact.tags),
                contact.updated_at.to_rfc3339(),
                contact.id,
            ],
        )?;

        Ok(contact)
    }

    /// Delete a contact
    pub fn delete_contact(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM contacts WHERE id = ?", [id])?;
        if deleted == 0 {
            return Err(Error::not_found("contact", id));
        }
        Ok(())
    }

    fn row_to_contact(row: &Row) -> rusqlite::Result<Contact> {
        let tags_str: String = row.get("tags")?;
        let created_at_str: String = row.get("created_at")?;
        let updated_at_str: String = row.get("updated_at")?;

        Ok(Contact {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            email: row.get("email")?,
            phone: row.get("phone")?,
            company: row.get("company")?,
            position: row.get("position")?,
            linked_in: row.get("linked_in")?,
            notes: row.get("notes")?,
            tags: tags_from_sql(&tags_str),
            created_at: datetime_from_sql(&created_at_str),
            updated_at: datetime_from_sql(&updated_at_str),
        })
    }

    // ============================================
    // Document operations
    // ============================================

    /// List all documents for an owner, in insertion order
    pub fn list_documents(&self, user_id: &str) -> Result<Vec<Document>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT * FROM documents WHERE user_id = ? ORDER BY rowid ASC")?;

        let documents = stmt
            .query_map([user_id], Self::row_to_document)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(documents)
    }

    /// Get a document by ID
    pub fn get_document(&self, id: &str) -> Result<Option<Document>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM documents WHERE id = ?",
            [id],
            Self::row_to_document,
        )
        .optional()
        .map_err(Error::from)
    }

    /// Create a document
    pub fn create_document(&self, user_id: &str, new: NewDocument) -> Result<Document> {
        require("name", &new.name)?;
        require("file reference", &new.file_url)?;

        let now = Utc::now();
        let doc = Document {
            id: fresh_id(),
            user_id: user_id.to_string(),
            name: new.name.trim().to_string(),
            doc_type: new.doc_type.unwrap_or_default(),
            file_url: new.file_url,
            description: new.description,
            tags: new.tags,
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO documents (id, user_id, name, doc_type, file_url, description,
                                   tags, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                doc.id,
                doc.user_id,
                doc.name,
                doc.doc_type.as_str(),
                doc.file_url,
                doc.description,
                tags_to_sql(&doc.tags),
                doc.created_at.to_rfc3339(),
                doc.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(doc)
    }

    /// Merge patch fields into a document
    pub fn update_document(&self, id: &str, patch: DocumentPatch) -> Result<Document> {
        let mut doc = self
            .get_document(id)?
            .ok_or_else(|| Error::not_found("document", id))?;

        if let Some(name) = patch.name {
            require("name", &name)?;
            doc.name = name.trim().to_string();
        }
        if let Some(doc_type) = patch.doc_type {
            doc.doc_type = doc_type;
        }
        if let Some(file_url) = patch.file_url {
            require("file reference", &file_url)?;
            doc.file_url = file_url;
        }
        if let Some(description) = patch.description {
            doc.description = Some(description);
        }
        if let Some(tags) = patch.tags {
            doc.tags = tags;
        }
        doc.updated_at = Utc::now();

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            UPDATE documents
            SET name = ?1, doc_type = ?2, file_url = ?3, description = ?4,
                tags = ?5, updated_at = ?6
            WHERE id = ?7
            "#,
            params![
                doc.name,
                doc.doc_type.as_str(),
                doc.file_url,
                doc.description,
                tags_to_sql(&doc.tags),
                doc.updated_at.to_rfc3339(),
                doc.id,
            ],
        )?;

        Ok(doc)
    }

    /// Delete a document
    pub fn delete_document(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM documents WHERE id = ?", [id])?;
        if deleted == 0 {
            return Err(Error::not_found("document", id));
        }
        Ok(())
    }

    fn row_to_document(row: &Row) -> rusqlite::Result<Document> {
        let doc_type_str: String = row.get("doc_type")?;
        let tags_str: String = row.get("tags")?;
        let created_at_str: String = row.get("created_at")?;
        let updated_at_str: String = row.get("updated_at")?;

        Ok(Document {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            doc_type: doc_type_str.parse().unwrap_or_default(),
            file_url: row.get("file_url")?,
            description: row.get("description")?,
            tags: tags_from_sql(&tags_str),
            created_at: datetime_from_sql(&created_at_str),
            updated_at: datetime_from_sql(&updated_at_str),
        })
    }

    // ============================================
    // Skill operations
    // ============================================

    /// List all skills for an owner, in insertion order
    pub fn list_skills(&self, user_id: &str) -> Result<Vec<Skill>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT * FROM skills WHERE user_id = ? ORDER BY rowid ASC")?;

        let skills = stmt
            .query_map([user_id], Self::row_to_skill)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(skills)
    }

    /// Get a skill by ID
    pub fn get_skill(&self, id: &str) -> Result<Option<Skill>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT * FROM skills WHERE id = ?", [id], Self::row_to_skill)
            .optional()
            .map_err(Error::from)
    }

    /// Whether the owner already has a skill with this name, ignoring
    /// case. `exclude_id` lets renames skip the record being edited.
    fn skill_name_taken(&self, user_id: &str, name: &str, exclude_id: Option<&str>) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            r#"
            SELECT COUNT(*) FROM skills
            WHERE user_id = ?1
              AND lower(name) = lower(?2)
              AND id != COALESCE(?3, '')
            "#,
            params![user_id, name.trim(), exclude_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Create a skill. Duplicate names (case-insensitive, per owner)
    /// are rejected before anything is written.
    pub fn create_skill(&self, user_id: &str, new: NewSkill) -> Result<Skill> {
        require("name", &new.name)?;
        if self.skill_name_taken(user_id, &new.name, None)? {
            return Err(Error::Validation(format!(
                "a skill named \"{}\" already exists",
                new.name.trim()
            )));
        }

        let now = Utc::now();
        let skill = Skill {
            id: fresh_id(),
            user_id: user_id.to_string(),
            name: new.name.trim().to_string(),
            level: new.level.unwrap_or_default(),
            category: new.category,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO skills (id, user_id, name, level, category, notes, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                skill.id,
                skill.user_id,
                skill.name,
                skill.level.as_str(),
                skill.category,
                skill.notes,
                skill.created_at.to_rfc3339(),
                skill.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(skill)
    }

    /// Merge patch fields into a skill; renames re-run the duplicate
    /// check against every other skill the owner has.
    pub fn update_skill(&self, id: &str, patch: SkillPatch) -> Result<Skill> {
        let mut skill = self
            .get_skill(id)?
            .ok_or_else(|| Error::not_found("skill", id))?;

        if let Some(name) = patch.name {
            require("name", &name)?;
            if self.skill_name_taken(&skill.user_id, &name, Some(&skill.id))? {
                return Err(Error::Validation(format!(
                    "a skill named \"{}\" already exists",
                    name.trim()
                )));
            }
            skill.name = name.trim().to_string();
        }
        if let Some(level) = patch.level {
            skill.level = level;
        }
        if let Some(category) = patch.category {
            skill.category = Some(category);
        }
        if let Some(notes) = patch.notes {
            skill.notes = Some(notes);
        }
        skill.updated_at = Utc::now();

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            UPDATE skills
            SET name = ?1, level = ?2, category = ?3, notes = ?4, updated_at = ?5
            WHERE id = ?6
            "#,
            params![
                skill.name,
                skill.level.as_str(),
                skill.category,
                skill.notes,
                skill.updated_at.to_rfc3339(),
                skill.id,
            ],
        )?;

        Ok(skill)
    }

    /// Delete a skill
    pub fn delete_skill(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM skills WHERE id = ?", [id])?;
        if deleted == 0 {
            return Err(Error::not_found("skill", id));
        }
        Ok(())
    }

    fn row_to_skill(row: &Row) -> rusqlite::Result<Skill> {
        let level_str: String = row.get("level")?;
        let created_at_str: String = row.get("created_at")?;
        let updated_at_str: String = row.get("updated_at")?;

        Ok(Skill {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            level: level_str.parse().unwrap_or_default(),
            category: row.get("category")?,
            notes: row.get("notes")?,
            created_at: datetime_from_sql(&created_at_str),
            updated_at: datetime_from_sql(&updated_at_str),
        })
    }

    // ============================================
    // User & session operations
    // ============================================

    /// Get a user profile by ID
    pub fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT * FROM users WHERE id = ?", [id], Self::row_to_user)
            .optional()
            .map_err(Error::from)
    }

    /// Insert or update a user profile
    pub fn upsert_user(&self, user: &User) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO users (id, name, email, picture, provider, two_factor_enabled,
                               created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                picture = excluded.picture,
                provider = excluded.provider,
                two_factor_enabled = excluded.two_factor_enabled,
                updated_at = excluded.updated_at
            "#,
            params![
                user.id,
                user.name,
                user.email,
                user.picture,
                user.provider,
                user.two_factor_enabled as i64,
                user.created_at.to_rfc3339(),
                user.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// The signed-in user's profile, or the demo profile when signed out
    pub fn current_user(&self) -> Result<User> {
        let session_user = {
            let conn = self.conn.lock().unwrap();
            conn.query_row(
                r#"
                SELECT u.* FROM session s
                JOIN users u ON u.id = s.user_id
                WHERE s.id = 1
                "#,
                [],
                Self::row_to_user,
            )
            .optional()?
        };

        if let Some(user) = session_user {
            return Ok(user);
        }

        // Signed out: the stored demo profile if one exists, else the
        // built-in default
        Ok(self.get_user(User::DEMO_ID)?.unwrap_or_else(User::demo))
    }

    /// The active session token, if signed in
    pub fn session_token(&self) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT token FROM session WHERE id = 1", [], |row| {
            row.get(0)
        })
        .optional()
        .map_err(Error::from)
    }

    /// Store a session for the given token, creating the profile row
    /// on first sign-in
    pub fn sign_in(&self, token: &str, provider: Option<&str>) -> Result<User> {
        let mut user = self.get_user(User::DEMO_ID)?.unwrap_or_else(User::demo);
        if let Some(provider) = provider {
            user.provider = Some(provider.to_string());
            user.updated_at = Utc::now();
        }
        self.upsert_user(&user)?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO session (id, token, user_id, signed_in_at)
            VALUES (1, ?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                token = excluded.token,
                user_id = excluded.user_id,
                signed_in_at = excluded.signed_in_at
            "#,
            params![token, user.id, Utc::now().to_rfc3339()],
        )?;

        tracing::info!(user = %user.id, "Signed in");
        Ok(user)
    }

    /// Drop the active session
    pub fn sign_out(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM session WHERE id = 1", [])?;
        Ok(())
    }

    /// Update the current profile's display fields
    pub fn update_profile(&self, name: Option<&str>, picture: Option<&str>) -> Result<User> {
        let mut user = self.current_user()?;
        if let Some(name) = name {
            require("name", name)?;
            user.name = name.trim().to_string();
        }
        if let Some(picture) = picture {
            user.picture = Some(picture.to_string());
        }
        user.updated_at = Utc::now();
        self.upsert_user(&user)?;
        Ok(user)
    }

    /// Flip the two-factor flag on the current profile
    pub fn set_two_factor(&self, enabled: bool) -> Result<User> {
        let mut user = self.current_user()?;
        user.two_factor_enabled = enabled;
        user.updated_at = Utc::now();
        self.upsert_user(&user)?;
        Ok(user)
    }

    /// Remove a user and everything they own, including the session
    pub fn delete_account(&self, user_id: &str) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM session WHERE user_id = ?", [user_id])?;
        tx.execute("DELETE FROM applications WHERE user_id = ?", [user_id])?;
        tx.execute("DELETE FROM tasks WHERE user_id = ?", [user_id])?;
        tx.execute("DELETE FROM contacts WHERE user_id = ?", [user_id])?;
        tx.execute("DELETE FROM documents WHERE user_id = ?", [user_id])?;
        tx.execute("DELETE FROM skills WHERE user_id = ?", [user_id])?;
        tx.execute("DELETE FROM users WHERE id = ?", [user_id])?;
        tx.commit()?;
        tracing::info!(user = user_id, "Account and all owned records deleted");
        Ok(())
    }

    fn row_to_user(row: &Row) -> rusqlite::Result<User> {
        let created_at_str: String = row.get("created_at")?;
        let updated_at_str: String = row.get("updated_at")?;
        let two_factor: i64 = row.get("two_factor_enabled")?;

        Ok(User {
            id: row.get("id")?,
            name: row.get("name")?,
            email: row.get("email")?,
            picture: row.get("picture")?,
            provider: row.get("provider")?,
            two_factor_enabled: two_factor != 0,
            created_at: datetime_from_sql(&created_at_str),
            updated_at: datetime_from_sql(&updated_at_str),
        })
    }
}
