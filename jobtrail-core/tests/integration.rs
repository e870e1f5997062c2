//! Integration tests for the jobtrail record store
//!
//! These drive an in-memory database end to end: CRUD round trips,
//! merge semantics, validation, owner scoping, and the session flow.

use chrono::NaiveDate;
use jobtrail_core::store::Database;
use jobtrail_core::types::*;
use jobtrail_core::Error;

fn open_db() -> Database {
    let db = Database::open_in_memory().expect("open in-memory db");
    db.migrate().expect("run migrations");
    db
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================
// CRUD round trips
// ============================================

#[test]
fn test_application_create_then_list() {
    let db = open_db();

    let created = db
        .create_application(
            "u1",
            NewApplication {
                job_title: "Backend Engineer".to_string(),
                company: "Acme".to_string(),
                applied_date: Some(date(2024, 3, 15)),
                ..Default::default()
            },
        )
        .unwrap();

    assert!(!created.id.is_empty());
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(created.status, ApplicationStatus::Applied);
    assert_eq!(created.work_mode, WorkMode::OnSite);

    let listed = db.list_applications("u1").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(listed[0].job_title, "Backend Engineer");
    assert_eq!(listed[0].applied_date, Some(date(2024, 3, 15)));
}

#[test]
fn test_application_update_merges_and_bumps_timestamp() {
    let db = open_db();

    let created = db
        .create_application(
            "u1",
            NewApplication {
                job_title: "Backend Engineer".to_string(),
                company: "Acme".to_string(),
                notes: Some("first round".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    // Make sure the clock moves between create and update
    std::thread::sleep(std::time::Duration::from_millis(5));

    let updated = db
        .update_application(
            &created.id,
            ApplicationPatch {
                status: Some(ApplicationStatus::Interview),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.status, ApplicationStatus::Interview);
    // Untouched fields survive the merge
    assert_eq!(updated.job_title, "Backend Engineer");
    assert_eq!(updated.notes.as_deref(), Some("first round"));
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > updated.created_at);

    let listed = db.list_applications("u1").unwrap();
    assert_eq!(listed[0].status, ApplicationStatus::Interview);
    assert!(listed[0].updated_at > listed[0].created_at);
}

#[test]
fn test_application_delete_removes_record() {
    let db = open_db();

    let created = db
        .create_application(
            "u1",
            NewApplication {
                job_title: "Engineer".to_string(),
                company: "Acme".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

    db.delete_application(&created.id).unwrap();
    assert!(db.list_applications("u1").unwrap().is_empty());
    assert!(db.get_application(&created.id).unwrap().is_none());
}

#[test]
fn test_not_found_errors() {
    let db = open_db();

    let err = db
        .update_application("missing", ApplicationPatch::default())
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { entity: "application", .. }));

    let err = db.delete_application("missing").unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));

    let err = db.delete_task("missing").unwrap_err();
    assert!(matches!(err, Error::NotFound { entity: "task", .. }));
}

#[test]
fn test_validation_rejects_blank_required_fields() {
    let db = open_db();

    let err = db
        .create_application(
            "u1",
            NewApplication {
                job_title: "   ".to_string(),
                company: "Acme".to_string(),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // Nothing was written
    assert!(db.list_applications("u1").unwrap().is_empty());
}

#[test]
fn test_task_round_trip_and_reminder_predicate() {
    let db = open_db();

    let plain = db
        .create_task(
            "u1",
            NewTask {
                title: "Update resume".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(plain.priority, Priority::Medium);
    assert_eq!(plain.status, TaskStatus::Pending);
    assert!(!plain.is_reminder());

    let reminder = db
        .create_task(
            "u1",
            NewTask {
                title: "Follow up".to_string(),
                due_date: Some(date(2024, 3, 20)),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(reminder.is_reminder());

    let completed = db
        .update_task(
            &plain.id,
            TaskPatch {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(completed.status, TaskStatus::Completed);

    let tasks = db.list_tasks("u1").unwrap();
    assert_eq!(tasks.len(), 2);
}

#[test]
fn test_deleting_application_keeps_linked_tasks() {
    let db = open_db();

    let app = db
        .create_application(
            "u1",
            NewApplication {
                job_title: "Engineer".to_string(),
                company: "Acme".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

    db.create_task(
        "u1",
        NewTask {
            title: "Prepare interview".to_string(),
            application_id: Some(app.id.clone()),
            ..Default::default()
        },
    )
    .unwrap();

    db.delete_application(&app.id).unwrap();

    // No cascade: the task survives with its dangling soft reference
    let tasks = db.list_tasks_for_application(&app.id).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].application_id.as_deref(), Some(app.id.as_str()));
}

#[test]
fn test_contact_and_document_round_trips() {
    let db = open_db();

    let contact = db
        .create_contact(
            "u1",
            NewContact {
                name: "Jordan Reyes".to_string(),
                email: Some("jordan@example.com".to_string()),
                tags: vec!["recruiter".to_string()],
                ..Default::default()
            },
        )
        .unwrap();

    let fetched = db.get_contact(&contact.id).unwrap().unwrap();
    assert_eq!(fetched.tags, vec!["recruiter"]);

    let doc = db
        .create_document(
            "u1",
            NewDocument {
                name: "Resume 2024".to_string(),
                doc_type: Some(DocumentType::Resume),
                file_url: "https://example.com/resume.pdf".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

    let updated = db
        .update_document(
            &doc.id,
            DocumentPatch {
                description: Some("latest version".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("latest version"));
    assert_eq!(updated.doc_type, DocumentType::Resume);

    db.delete_contact(&contact.id).unwrap();
    db.delete_document(&doc.id).unwrap();
    assert!(db.list_contacts("u1").unwrap().is_empty());
    assert!(db.list_documents("u1").unwrap().is_empty());
}

// ============================================
// Skill uniqueness
// ============================================

#[test]
fn test_duplicate_skill_rejected_case_insensitively() {
    let db = open_db();

    db.create_skill(
        "u1",
        NewSkill {
            name: "Python".to_string(),
            ..Default::default()
        },
    )
    .unwrap();

    let err = db
        .create_skill(
            "u1",
            NewSkill {
                name: "python".to_string(),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // Nothing was written for the rejected duplicate
    assert_eq!(db.list_skills("u1").unwrap().len(), 1);

    // A different owner can have the same name
    db.create_skill(
        "u2",
        NewSkill {
            name: "PYTHON".to_string(),
            ..Default::default()
        },
    )
    .unwrap();
}

#[test]
fn test_skill_rename_duplicate_check() {
    let db = open_db();

    db.create_skill(
        "u1",
        NewSkill {
            name: "Python".to_string(),
            ..Default::default()
        },
    )
    .unwrap();
    let rust = db
        .create_skill(
            "u1",
            NewSkill {
                name: "Rust".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

    // Renaming onto an existing name fails
    let err = db
        .update_skill(
            &rust.id,
            SkillPatch {
                name: Some("PYTHON".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // Re-saving a skill under its own name is fine
    let kept = db
        .update_skill(
            &rust.id,
            SkillPatch {
                name: Some("rust".to_string()),
                level: Some(SkillLevel::Expert),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(kept.name, "rust");
    assert_eq!(kept.level, SkillLevel::Expert);
}

// ============================================
// Owner scoping
// ============================================

#[test]
fn test_lists_are_owner_scoped() {
    let db = open_db();

    db.create_application(
        "u1",
        NewApplication {
            job_title: "Engineer".to_string(),
            company: "Acme".to_string(),
            ..Default::default()
        },
    )
    .unwrap();
    db.create_application(
        "u2",
        NewApplication {
            job_title: "Designer".to_string(),
            company: "Globex".to_string(),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(db.list_applications("u1").unwrap().len(), 1);
    assert_eq!(db.list_applications("u2").unwrap().len(), 1);
    assert_eq!(db.list_applications("u3").unwrap().len(), 0);

    let snapshot = db.snapshot("u1").unwrap();
    assert_eq!(snapshot.applications.len(), 1);
    assert_eq!(snapshot.applications[0].company, "Acme");
}

// ============================================
// Session & account
// ============================================

#[test]
fn test_session_flow() {
    let db = open_db();

    // Signed out: demo profile
    let user = db.current_user().unwrap();
    assert_eq!(user.id, User::DEMO_ID);
    assert!(db.session_token().unwrap().is_none());

    let signed_in = db.sign_in("tok_123", Some("google")).unwrap();
    assert_eq!(signed_in.provider.as_deref(), Some("google"));
    assert_eq!(db.session_token().unwrap().as_deref(), Some("tok_123"));
    assert_eq!(db.current_user().unwrap().id, signed_in.id);

    let renamed = db.update_profile(Some("Ada"), None).unwrap();
    assert_eq!(renamed.name, "Ada");
    assert_eq!(db.current_user().unwrap().name, "Ada");

    db.sign_out().unwrap();
    assert!(db.session_token().unwrap().is_none());
}

#[test]
fn test_delete_account_removes_everything_owned() {
    let db = open_db();

    let user = db.sign_in("tok_123", None).unwrap();
    db.create_application(
        &user.id,
        NewApplication {
            job_title: "Engineer".to_string(),
            company: "Acme".to_string(),
            ..Default::default()
        },
    )
    .unwrap();
    db.create_skill(
        &user.id,
        NewSkill {
            name: "Rust".to_string(),
            ..Default::default()
        },
    )
    .unwrap();

    db.delete_account(&user.id).unwrap();

    assert!(db.list_applications(&user.id).unwrap().is_empty());
    assert!(db.list_skills(&user.id).unwrap().is_empty());
    assert!(db.session_token().unwrap().is_none());
    assert!(db.get_user(&user.id).unwrap().is_none());
}
