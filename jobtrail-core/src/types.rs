//! Core domain types for jobtrail
//!
//! These types are the canonical data model behind every view: flat,
//! owner-scoped records with closed enums for the handful of states the
//! UI can put them in.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **User** | The person whose job search is being tracked; every record carries their id |
//! | **Application** | One job application at a company, moved through statuses on a board |
//! | **Task** | A to-do item, optionally linked to an Application |
//! | **Reminder** | A Task with a due date; a presentation split, not a separate entity |
//! | **Contact** | A person in the user's network |
//! | **Document** | A stored file reference (resume, cover letter, ...) |
//! | **Skill** | A named skill with a proficiency level, unique per user |
//!
//! A Task is classified as a reminder purely by [`Task::is_reminder`];
//! there is no reminder table and no subtype.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// User
// ============================================

/// The account that owns every record.
///
/// Authentication is a mocked OAuth handshake, so a user profile is
/// little more than a display identity. When nobody has signed in, the
/// demo profile from [`User::demo`] is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Avatar reference (data URL or external URL)
    pub picture: Option<String>,
    /// OAuth provider the profile came from ("google", "facebook")
    pub provider: Option<String>,
    /// Whether two-factor auth is flagged on (cosmetic in the mock flow)
    pub two_factor_enabled: bool,
    /// When this profile was created
    pub created_at: DateTime<Utc>,
    /// When this profile was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Identifier of the signed-out demo profile.
    pub const DEMO_ID: &'static str = "demo_user";

    /// The fallback profile used when no session exists.
    pub fn demo() -> Self {
        let now = Utc::now();
        Self {
            id: Self::DEMO_ID.to_string(),
            name: "Demo User".to_string(),
            email: "demo@example.com".to_string(),
            picture: None,
            provider: None,
            two_factor_enabled: false,
            created_at: now,
            updated_at: now,
        }
    }
}

// ============================================
// Applications
// ============================================

/// Where the job is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkMode {
    OnSite,
    Hybrid,
    WorkFromHome,
}

impl WorkMode {
    /// Returns the identifier used in database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkMode::OnSite => "on_site",
            WorkMode::Hybrid => "hybrid",
            WorkMode::WorkFromHome => "work_from_home",
        }
    }

    /// Returns the display name for this work mode
    pub fn display_name(&self) -> &'static str {
        match self {
            WorkMode::OnSite => "On-site",
            WorkMode::Hybrid => "Hybrid",
            WorkMode::WorkFromHome => "Work from home",
        }
    }
}

impl Default for WorkMode {
    fn default() -> Self {
        WorkMode::OnSite
    }
}

impl std::fmt::Display for WorkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for WorkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_site" | "on-site" | "onsite" => Ok(WorkMode::OnSite),
            "hybrid" => Ok(WorkMode::Hybrid),
            "work_from_home" | "remote" | "wfh" => Ok(WorkMode::WorkFromHome),
            _ => Err(format!("unknown work mode: {}", s)),
        }
    }
}

/// Where an application currently sits in the funnel.
///
/// There is no transition graph: any status may follow any other, by
/// direct user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Screening,
    Interview,
    Offer,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    /// All statuses in board/report order.
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Screening,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    /// Returns the identifier used in database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Screening => "screening",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    /// Returns the display name for this status
    pub fn display_name(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Screening => "Screening",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Withdrawn => "Withdrawn",
        }
    }

    /// Whether this application still counts toward the active pipeline.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Applied | ApplicationStatus::Screening | ApplicationStatus::Interview
        )
    }

    /// The next status in board order, wrapping around.
    pub fn cycled(&self) -> Self {
        let idx = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        ApplicationStatus::Applied
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applied" => Ok(ApplicationStatus::Applied),
            "screening" => Ok(ApplicationStatus::Screening),
            "interview" => Ok(ApplicationStatus::Interview),
            "offer" => Ok(ApplicationStatus::Offer),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "withdrawn" => Ok(ApplicationStatus::Withdrawn),
            _ => Err(format!("unknown application status: {}", s)),
        }
    }
}

/// One job application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    /// Unique identifier
    pub id: String,
    /// Owner reference
    pub user_id: String,
    /// Job title applied for
    pub job_title: String,
    /// Company name
    pub company: String,
    /// Job location
    pub location: Option<String>,
    /// Link to the job posting
    pub job_url: Option<String>,
    /// Free-text description
    pub description: Option<String>,
    /// Where the job is performed
    pub work_mode: WorkMode,
    /// Funnel status; drives board placement and analytics bucketing
    pub status: ApplicationStatus,
    /// Salary as entered (free text, e.g. "90-110k")
    pub salary: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
    /// When the application was submitted
    pub applied_date: Option<NaiveDate>,
    /// Scheduled interview date
    pub interview_date: Option<NaiveDate>,
    /// Date an offer was received
    pub offer_date: Option<NaiveDate>,
    /// When this record was created
    pub created_at: DateTime<Utc>,
    /// When this record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating an application. Missing enum fields fall back to
/// their defaults; missing optionals stay empty.
#[derive(Debug, Clone, Default)]
pub struct NewApplication {
    pub job_title: String,
    pub company: String,
    pub location: Option<String>,
    pub job_url: Option<String>,
    pub description: Option<String>,
    pub work_mode: Option<WorkMode>,
    pub status: Option<ApplicationStatus>,
    pub salary: Option<String>,
    pub notes: Option<String>,
    pub applied_date: Option<NaiveDate>,
    pub interview_date: Option<NaiveDate>,
    pub offer_date: Option<NaiveDate>,
}

/// Partial update for an application. `None` leaves the stored value
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct ApplicationPatch {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub job_url: Option<String>,
    pub description: Option<String>,
    pub work_mode: Option<WorkMode>,
    pub status: Option<ApplicationStatus>,
    pub salary: Option<String>,
    pub notes: Option<String>,
    pub applied_date: Option<NaiveDate>,
    pub interview_date: Option<NaiveDate>,
    pub offer_date: Option<NaiveDate>,
}

// ============================================
// Tasks
// ============================================

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("unknown priority: {}", s)),
        }
    }
}

/// Task completion status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" | "in-progress" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            _ => Err(format!("unknown task status: {}", s)),
        }
    }
}

/// A to-do item, optionally tied to an application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Owner reference
    pub user_id: String,
    /// Task title
    pub title: String,
    /// Longer description
    pub description: Option<String>,
    /// Priority
    pub priority: Priority,
    /// Completion status
    pub status: TaskStatus,
    /// Due date; its presence is what makes a task a reminder
    pub due_date: Option<NaiveDate>,
    /// Soft reference to the application this task is about
    pub application_id: Option<String>,
    /// When this record was created
    pub created_at: DateTime<Utc>,
    /// When this record was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// A task reads as a "reminder" iff it carries a due date.
    pub fn is_reminder(&self) -> bool {
        self.due_date.is_some()
    }
}

/// Fields for creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    pub application_id: Option<String>,
}

/// Partial update for a task.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    pub application_id: Option<String>,
}

// ============================================
// Contacts
// ============================================

/// A person in the user's network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    /// Unique identifier
    pub id: String,
    /// Owner reference
    pub user_id: String,
    /// Contact name
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    /// LinkedIn profile URL
    pub linked_in: Option<String>,
    pub notes: Option<String>,
    /// Free-form tags
    pub tags: Vec<String>,
    /// When this record was created
    pub created_at: DateTime<Utc>,
    /// When this record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a contact.
#[derive(Debug, Clone, Default)]
pub struct NewContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub linked_in: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

/// Partial update for a contact.
#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub linked_in: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

// ============================================
// Documents
// ============================================

/// What kind of document this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Resume,
    CoverLetter,
    Portfolio,
    Certificate,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Resume => "resume",
            DocumentType::CoverLetter => "cover_letter",
            DocumentType::Portfolio => "portfolio",
            DocumentType::Certificate => "certificate",
            DocumentType::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::Resume => "Resume",
            DocumentType::CoverLetter => "Cover Letter",
            DocumentType::Portfolio => "Portfolio",
            DocumentType::Certificate => "Certificate",
            DocumentType::Other => "Other",
        }
    }
}

impl Default for DocumentType {
    fn default() -> Self {
        DocumentType::Other
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resume" => Ok(DocumentType::Resume),
            "cover_letter" | "cover-letter" => Ok(DocumentType::CoverLetter),
            "portfolio" => Ok(DocumentType::Portfolio),
            "certificate" => Ok(DocumentType::Certificate),
            "other" => Ok(DocumentType::Other),
            _ => Err(format!("unknown document type: {}", s)),
        }
    }
}

/// A stored file reference.
///
/// `file_url` is either an embedded `data:` URL (small uploads) or an
/// external link; the store does not care which.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: String,
    /// Owner reference
    pub user_id: String,
    /// Document name
    pub name: String,
    /// Document type
    pub doc_type: DocumentType,
    /// Data URL or external URL
    pub file_url: String,
    pub description: Option<String>,
    /// Free-form tags
    pub tags: Vec<String>,
    /// When this record was created
    pub created_at: DateTime<Utc>,
    /// When this record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a document.
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    pub name: String,
    pub doc_type: Option<DocumentType>,
    pub file_url: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// Partial update for a document.
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    pub name: Option<String>,
    pub doc_type: Option<DocumentType>,
    pub file_url: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

// ============================================
// Skills
// ============================================

/// Proficiency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Expert => "expert",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }
}

impl Default for SkillLevel {
    fn default() -> Self {
        SkillLevel::Intermediate
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            "expert" => Ok(SkillLevel::Expert),
            _ => Err(format!("unknown skill level: {}", s)),
        }
    }
}

/// A named skill. Names are unique per owner, case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    /// Unique identifier
    pub id: String,
    /// Owner reference
    pub user_id: String,
    /// Skill name
    pub name: String,
    /// Proficiency level
    pub level: SkillLevel,
    pub category: Option<String>,
    pub notes: Option<String>,
    /// When this record was created
    pub created_at: DateTime<Utc>,
    /// When this record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a skill.
#[derive(Debug, Clone, Default)]
pub struct NewSkill {
    pub name: String,
    pub level: Option<SkillLevel>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

/// Partial update for a skill.
#[derive(Debug, Clone, Default)]
pub struct SkillPatch {
    pub name: Option<String>,
    pub level: Option<SkillLevel>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_status_roundtrip() {
        for status in ApplicationStatus::ALL {
            assert_eq!(status.as_str().parse::<ApplicationStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_active_pipeline_statuses() {
        assert!(ApplicationStatus::Applied.is_active());
        assert!(ApplicationStatus::Screening.is_active());
        assert!(ApplicationStatus::Interview.is_active());
        assert!(!ApplicationStatus::Offer.is_active());
        assert!(!ApplicationStatus::Rejected.is_active());
        assert!(!ApplicationStatus::Withdrawn.is_active());
    }

    #[test]
    fn test_status_cycle_wraps() {
        assert_eq!(
            ApplicationStatus::Applied.cycled(),
            ApplicationStatus::Screening
        );
        assert_eq!(
            ApplicationStatus::Withdrawn.cycled(),
            ApplicationStatus::Applied
        );
    }

    #[test]
    fn test_reminder_is_due_date_presence() {
        let now = Utc::now();
        let mut task = Task {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            title: "Follow up".to_string(),
            description: None,
            priority: Priority::Medium,
            status: TaskStatus::Pending,
            due_date: None,
            application_id: None,
            created_at: now,
            updated_at: now,
        };
        assert!(!task.is_reminder());

        task.due_date = NaiveDate::from_ymd_opt(2024, 3, 20);
        assert!(task.is_reminder());
    }
}
