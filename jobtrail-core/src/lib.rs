//! # jobtrail-core
//!
//! Core library for jobtrail - a job-application tracking dashboard.
//!
//! This library provides:
//! - Domain types for applications, tasks, contacts, documents, and skills
//! - An owner-scoped SQLite record store
//! - Analytics: trailing-window series, cumulative status trends,
//!   period-over-period deltas, chart geometry, and the activity feed
//! - The mocked OAuth session flow
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! The store holds plain records; everything the dashboards show is
//! derived on demand from whole-store snapshots by pure functions in
//! [`analytics`]. Views re-fetch and recompute rather than caching
//! derived state.
//!
//! ## Example
//!
//! ```rust,no_run
//! use jobtrail_core::{Config, Database};
//!
//! // Load configuration
//! let config = Config::load().expect("failed to load config");
//!
//! // Open database
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use store::{Database, Snapshot};
pub use types::*;

// Public modules
pub mod analytics;
pub mod auth;
pub mod config;
pub mod error;
pub mod fileref;
pub mod format;
pub mod logging;
pub mod reminders;
pub mod store;
pub mod types;
