use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ticket::Ticket;

pub const DEFAULT_INITIALS: &str = "aa";
pub const DEFAULT_SPRINT: &str = "1.0";
pub const DEFAULT_REPO: &str = "website";

/// The persisted per-user state. Field names match the stored file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub initials: String,
    pub sprint: String,
    pub repo_cursor: String,
    #[serde(default)]
    pub active_ticket: Option<Ticket>,
    #[serde(default)]
    pub my_local_branches: Vec<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            initials: DEFAULT_INITIALS.to_string(),
            sprint: DEFAULT_SPRINT.to_string(),
            repo_cursor: DEFAULT_REPO.to_string(),
            active_ticket: None,
            my_local_branches: Vec::new(),
            last_updated: None,
        }
    }
}
