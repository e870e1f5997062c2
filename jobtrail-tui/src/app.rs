//! Application state for the TUI.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::TableState;

use jobtrail_core::analytics::{build_activity_feed, ActivityFilter, ActivityItem, Granularity};
use jobtrail_core::config::ActivityConfig;
use jobtrail_core::types::{ApplicationPatch, User};
use jobtrail_core::{Config, Database, Snapshot};

/// Dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Applications,
    Tasks,
    Contacts,
    Documents,
    Skills,
    Analytics,
    Activity,
}

impl Tab {
    pub const ALL: [Tab; 8] = [
        Tab::Overview,
        Tab::Applications,
        Tab::Tasks,
        Tab::Contacts,
        Tab::Documents,
        Tab::Skills,
        Tab::Analytics,
        Tab::Activity,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Applications => "Applications",
            Tab::Tasks => "Tasks",
            Tab::Contacts => "Contacts",
            Tab::Documents => "Documents",
            Tab::Skills => "Skills",
            Tab::Analytics => "Analytics",
            Tab::Activity => "Activity",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A delete waiting for its y/n confirmation.
#[derive(Debug, Clone)]
pub struct PendingDelete {
    pub tab: Tab,
    pub id: String,
    pub label: String,
}

/// Main application state.
pub struct App {
    /// Database connection
    db: Database,
    /// Activity feed settings from config
    activity_config: ActivityConfig,
    /// The profile every query is scoped to
    user: User,
    /// Current tab
    pub tab: Tab,
    /// Whole-store snapshot backing every view
    pub snapshot: Snapshot,
    /// Derived activity feed (rebuilt on every refresh)
    pub feed: Vec<ActivityItem>,
    /// Table selection state for the list tabs
    pub table_state: TableState,
    /// Bucket granularity for Analytics and Activity
    pub granularity: Granularity,
    /// Activity feed filter
    pub activity_filter: ActivityFilter,
    /// Whether the activity timer is running
    pub auto_refresh: bool,
    /// When the snapshot was last taken
    pub last_updated: DateTime<Utc>,
    /// Delete awaiting confirmation
    pub pending_delete: Option<PendingDelete>,
    /// One-line feedback shown in the footer
    pub status_message: Option<String>,
    /// Set by the key handler when `r` forces a refresh, so the main
    /// loop can restart its timer
    pub manual_refresh_requested: bool,
    /// Whether the app should exit
    pub should_quit: bool,
}

impl App {
    /// Create a new App with the given database connection.
    pub fn new(db: Database, config: &Config) -> Result<Self> {
        let user = db.current_user()?;
        let mut app = Self {
            db,
            activity_config: config.activity.clone(),
            user,
            tab: Tab::Overview,
            snapshot: Snapshot::default(),
            feed: Vec::new(),
            table_state: TableState::default(),
            granularity: Granularity::Day,
            activity_filter: ActivityFilter::All,
            auto_refresh: config.activity.auto_refresh,
            last_updated: Utc::now(),
            pending_delete: None,
            status_message: None,
            manual_refresh_requested: false,
            should_quit: false,
        };
        app.refresh()?;
        Ok(app)
    }

    /// Re-fetch the whole snapshot and rebuild the derived feed.
    ///
    /// The previous snapshot is replaced wholesale; there is no merge
    /// and no conflict detection.
    pub fn refresh(&mut self) -> Result<()> {
        self.snapshot = self.db.snapshot(&self.user.id)?;
        self.feed = build_activity_feed(
            &self.snapshot.applications,
            &self.snapshot.tasks,
            &self.snapshot.contacts,
            &self.snapshot.documents,
            &self.snapshot.skills,
        );
        self.last_updated = Utc::now();
        self.clamp_selection();
        Ok(())
    }

    /// Today in the local timezone; the anchor for every window.
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn is_activity_view(&self) -> bool {
        self.tab == Tab::Activity
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.activity_config.refresh_interval_secs)
    }

    /// Rows in the currently visible list, for selection clamping.
    fn current_len(&self) -> usize {
        match self.tab {
            Tab::Applications => self.snapshot.applications.len(),
            Tab::Tasks => self.snapshot.tasks.len(),
            Tab::Contacts => self.snapshot.contacts.len(),
            Tab::Documents => self.snapshot.documents.len(),
            Tab::Skills => self.snapshot.skills.len(),
            _ => 0,
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.current_len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            let selected = self.table_state.selected().unwrap_or(0).min(len - 1);
            self.table_state.select(Some(selected));
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.table_state.select(None);
            self.pending_delete = None;
            self.status_message = None;
            self.clamp_selection();
        }
    }

    fn select_next(&mut self) {
        let len = self.current_len();
        if len == 0 {
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        if self.current_len() == 0 {
            return;
        }
        let prev = self.table_state.selected().unwrap_or(0).saturating_sub(1);
        self.table_state.select(Some(prev));
    }

    /// Move the selected application to the next status. Any status may
    /// follow any other; there is no transition graph.
    fn cycle_selected_status(&mut self) {
        if self.tab != Tab::Applications {
            return;
        }
        let Some(selected) = self.table_state.selected() else {
            return;
        };
        let Some(app) = self.snapshot.applications.get(selected) else {
            return;
        };

        let next = app.status.cycled();
        let result = self.db.update_application(
            &app.id,
            ApplicationPatch {
                status: Some(next),
                ..Default::default()
            },
        );
        match result {
            Ok(updated) => {
                self.status_message = Some(format!(
                    "{} moved to {}",
                    updated.job_title,
                    updated.status.display_name()
                ));
                let _ = self.refresh();
            }
            Err(e) => {
                self.status_message = Some(format!("Update failed: {}", e));
            }
        }
    }

    /// Arm deletion of the selected row; `y` commits, anything else
    /// cancels.
    fn request_delete(&mut self) {
        let Some(selected) = self.table_state.selected() else {
            return;
        };
        let pending = match self.tab {
            Tab::Applications => self.snapshot.applications.get(selected).map(|a| PendingDelete {
                tab: self.tab,
                id: a.id.clone(),
                label: format!("{} at {}", a.job_title, a.company),
            }),
            Tab::Tasks => self.snapshot.tasks.get(selected).map(|t| PendingDelete {
                tab: self.tab,
                id: t.id.clone(),
                label: t.title.clone(),
            }),
            Tab::Contacts => self.snapshot.contacts.get(selected).map(|c| PendingDelete {
                tab: self.tab,
                id: c.id.clone(),
                label: c.name.clone(),
            }),
            Tab::Documents => self.snapshot.documents.get(selected).map(|d| PendingDelete {
                tab: self.tab,
                id: d.id.clone(),
                label: d.name.clone(),
            }),
            Tab::Skills => self.snapshot.skills.get(selected).map(|s| PendingDelete {
                tab: self.tab,
                id: s.id.clone(),
                label: s.name.clone(),
            }),
            _ => None,
        };
        self.pending_delete = pending;
    }

    fn confirm_delete(&mut self) {
        let Some(pending) = self.pending_delete.take() else {
            return;
        };
        let result = match pending.tab {
            Tab::Applications => self.db.delete_application(&pending.id),
            Tab::Tasks => self.db.delete_task(&pending.id),
            Tab::Contacts => self.db.delete_contact(&pending.id),
            Tab::Documents => self.db.delete_document(&pending.id),
            Tab::Skills => self.db.delete_skill(&pending.id),
            _ => return,
        };
        match result {
            Ok(()) => {
                self.status_message = Some(format!("Deleted {}", pending.label));
                let _ = self.refresh();
            }
            Err(e) => {
                self.status_message = Some(format!("Delete failed: {}", e));
            }
        }
    }

    /// Handle a key event.
    pub fn handle_key(&mut self, key: KeyEvent) {
        // A pending delete captures the next key
        if self.pending_delete.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_delete(),
                _ => {
                    self.pending_delete = None;
                    self.status_message = Some("Delete cancelled".to_string());
                }
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.switch_tab(self.tab.next()),
            KeyCode::BackTab | KeyCode::Left => self.switch_tab(self.tab.prev()),
            KeyCode::Char(c @ '1'..='8') => {
                let idx = (c as usize) - ('1' as usize);
                self.switch_tab(Tab::ALL[idx]);
            }
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Char('r') => {
                match self.refresh() {
                    Ok(()) => self.status_message = Some("Refreshed".to_string()),
                    Err(e) => self.status_message = Some(format!("Refresh failed: {}", e)),
                }
                self.manual_refresh_requested = true;
            }
            KeyCode::Char('a') => {
                self.auto_refresh = !self.auto_refresh;
                self.status_message = Some(if self.auto_refresh {
                    format!(
                        "Auto-refresh on (every {}s)",
                        self.activity_config.refresh_interval_secs
                    )
                } else {
                    "Auto-refresh off".to_string()
                });
            }
            KeyCode::Char('d') => self.granularity = Granularity::Day,
            KeyCode::Char('w') => self.granularity = Granularity::Week,
            KeyCode::Char('m') => self.granularity = Granularity::Month,
            KeyCode::Char('y') => self.granularity = Granularity::Year,
            KeyCode::Char('f') if self.tab == Tab::Activity => {
                let idx = ActivityFilter::ALL
                    .iter()
                    .position(|f| *f == self.activity_filter)
                    .unwrap_or(0);
                self.activity_filter = ActivityFilter::ALL[(idx + 1) % ActivityFilter::ALL.len()];
            }
            KeyCode::Char('s') => self.cycle_selected_status(),
            KeyCode::Char('x') | KeyCode::Delete => self.request_delete(),
            _ => {}
        }
    }
}
