//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: Initial schema
    r#"
    -- ============================================
    -- Accounts & session
    -- ============================================

    CREATE TABLE IF NOT EXISTS users (
        id                 TEXT PRIMARY KEY,
        name               TEXT NOT NULL,
        email              TEXT NOT NULL,
        picture            TEXT,
        provider           TEXT,
        two_factor_enabled INTEGER NOT NULL DEFAULT 0,
        created_at         DATETIME NOT NULL,
        updated_at         DATETIME NOT NULL
    );

    -- Single-row table holding the active mock-OAuth session
    CREATE TABLE IF NOT EXISTS session (
        id           INTEGER PRIMARY KEY CHECK (id = 1),
        token        TEXT NOT NULL,
        user_id      TEXT NOT NULL REFERENCES users(id),
        signed_in_at DATETIME NOT NULL
    );

    -- ============================================
    -- Records (all owner-scoped via user_id)
    -- ============================================

    CREATE TABLE IF NOT EXISTS applications (
        id             TEXT PRIMARY KEY,
        user_id        TEXT NOT NULL,
        job_title      TEXT NOT NULL,
        company        TEXT NOT NULL,
        location       TEXT,
        job_url        TEXT,
        description    TEXT,
        work_mode      TEXT NOT NULL,
        status         TEXT NOT NULL,
        salary         TEXT,
        notes          TEXT,
        applied_date   TEXT,
        interview_date TEXT,
        offer_date     TEXT,
        created_at     DATETIME NOT NULL,
        updated_at     DATETIME NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_applications_user ON applications(user_id);
    CREATE INDEX IF NOT EXISTS idx_applications_status ON applications(status);

    CREATE TABLE IF NOT EXISTS tasks (
        id             TEXT PRIMARY KEY,
        user_id        TEXT NOT NULL,
        title          TEXT NOT NULL,
        description    TEXT,
        priority       TEXT NOT NULL,
        status         TEXT NOT NULL,
        due_date       TEXT,
        -- Soft reference; deleting an application leaves its tasks alone
        application_id TEXT,
        created_at     DATETIME NOT NULL,
        updated_at     DATETIME NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_tasks_user ON tasks(user_id);
    CREATE INDEX IF NOT EXISTS idx_tasks_application ON tasks(application_id);

    CREATE TABLE IF NOT EXISTS contacts (
        id         TEXT PRIMARY KEY,
        user_id    TEXT NOT NULL,
        name       TEXT NOT NULL,
        email      TEXT,
        phone      TEXT,
        company    TEXT,
        position   TEXT,
        linked_in  TEXT,
        notes      TEXT,
        tags       TEXT NOT NULL DEFAULT '[]',
        created_at DATETIME NOT NULL,
        updated_at DATETIME NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_contacts_user ON contacts(user_id);

    CREATE TABLE IF NOT EXISTS documents (
        id          TEXT PRIMARY KEY,
        user_id     TEXT NOT NULL,
        name        TEXT NOT NULL,
        doc_type    TEXT NOT NULL,
        file_url    TEXT NOT NULL,
        description TEXT,
        tags        TEXT NOT NULL DEFAULT '[]',
        created_at  DATETIME NOT NULL,
        updated_at  DATETIME NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_documents_user ON documents(user_id);

    CREATE TABLE IF NOT EXISTS skills (
        id         TEXT PRIMARY KEY,
        user_id    TEXT NOT NULL,
        name       TEXT NOT NULL,
        level      TEXT NOT NULL,
        category   TEXT,
        notes      TEXT,
        created_at DATETIME NOT NULL,
        updated_at DATETIME NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_skills_user ON skills(user_id);
    -- Names are unique per owner, case-insensitively; the repo checks
    -- before writing, this index is the backstop.
    CREATE UNIQUE INDEX IF NOT EXISTS idx_skills_owner_name
        ON skills(user_id, name COLLATE NOCASE);
    "#,
];

/// Run all pending migrations on the connection
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version >= SCHEMA_VERSION {
        tracing::debug!(
            version = current_version,
            "Database schema is up to date"
        );
        return Ok(());
    }

    tracing::info!(
        from = current_version,
        to = SCHEMA_VERSION,
        "Running database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::debug!(version, "Applying migration");
            conn.execute_batch(migration)?;
            conn.pragma_update(None, "user_version", version)?;
        }
    }

    Ok(())
}
