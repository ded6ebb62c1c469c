use chrono::Utc;

use crate::domain::branch::{self, AssociationMode};
use crate::domain::preferences::Preferences;
use crate::domain::ticket::Ticket;
use crate::error::{AppError, AppResult};

/// Durable storage for the preferences record.
pub trait PreferencesStore: Send + Sync {
    /// `None` when nothing has been stored yet.
    fn load(&self) -> AppResult<Option<Preferences>>;
    fn save(&self, preferences: &Preferences) -> AppResult<()>;
}

/// Owns the current preferences. Each mutator applies its change, stamps
/// `last_updated`, and writes through to the store.
pub struct PreferencesService {
    preferences: Preferences,
    store: Box<dyn PreferencesStore>,
}

impl PreferencesService {
    pub fn load(store: Box<dyn PreferencesStore>) -> AppResult<Self> {
        let preferences = store.load()?.unwrap_or_default();
        Ok(Self { preferences, store })
    }

    pub fn get(&self) -> &Preferences {
        &self.preferences
    }

    pub fn initials(&self) -> &str {
        &self.preferences.initials
    }

    pub fn sprint(&self) -> &str {
        &self.preferences.sprint
    }

    pub fn repo_cursor(&self) -> &str {
        &self.preferences.repo_cursor
    }

    pub fn active_ticket(&self) -> Option<&Ticket> {
        self.preferences.active_ticket.as_ref()
    }

    pub fn local_branches(&self) -> &[String] {
        &self.preferences.my_local_branches
    }

    /// True once any change has ever been recorded.
    pub fn initialized(&self) -> bool {
        self.preferences.last_updated.is_some()
    }

    /// Resets the user-facing fields to their defaults for a first run.
    pub fn init_defaults(&mut self) -> AppResult<()> {
        let defaults = Preferences::default();
        self.preferences.initials = defaults.initials;
        self.preferences.sprint = defaults.sprint;
        self.preferences.repo_cursor = defaults.repo_cursor;
        self.mark_updated();
        self.persist()
    }

    pub fn set_initials(&mut self, initials: &str) -> AppResult<()> {
        branch::validate_initials(initials).map_err(AppError::Preferences)?;
        self.preferences.initials = initials.to_lowercase();
        self.mark_updated();
        self.persist()
    }

    pub fn set_sprint(&mut self, sprint: &str) -> AppResult<()> {
        self.preferences.sprint = sprint.to_string();
        self.mark_updated();
        self.persist()
    }

    pub fn set_repo_cursor(&mut self, name: &str) -> AppResult<()> {
        self.preferences.repo_cursor = name.to_string();
        self.mark_updated();
        self.persist()
    }

    pub fn set_active_ticket(&mut self, ticket: Option<Ticket>) -> AppResult<()> {
        self.preferences.active_ticket = ticket;
        self.mark_updated();
        self.persist()
    }

    pub fn set_local_branches(&mut self, branches: Vec<String>) -> AppResult<()> {
        self.preferences.my_local_branches = branches;
        self.mark_updated();
        self.persist()
    }

    /// Records a branch created by this user; already known names are ignored.
    pub fn add_local_branch(&mut self, name: &str) -> AppResult<()> {
        if self.preferences.my_local_branches.iter().any(|b| b == name) {
            return Ok(());
        }
        self.preferences.my_local_branches.push(name.to_string());
        self.mark_updated();
        self.persist()
    }

    pub fn find_branch(&self, ticket: &str, mode: AssociationMode) -> Option<String> {
        branch::find_branch(&self.preferences.my_local_branches, ticket, mode).map(str::to_string)
    }

    pub fn mark_updated(&mut self) {
        self.preferences.last_updated = Some(Utc::now());
    }

    fn persist(&self) -> AppResult<()> {
        self.store.save(&self.preferences)
    }
}
