use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::ticket::{Ticket, TicketDraft, string_or_number};
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackerUser {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpaceTool {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Everything fetched from the tracker at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerSnapshot {
    pub users: Vec<TrackerUser>,
    pub space_tools: Vec<SpaceTool>,
    pub tickets: Vec<Ticket>,
}

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    /// Fetches users, repository space tools, and tickets, replacing the cached
    /// snapshot. Any failed request fails the whole refresh.
    async fn refresh(&self) -> AppResult<TrackerSnapshot>;
    /// The snapshot from the last successful refresh.
    fn cached(&self) -> Option<TrackerSnapshot>;
    /// Posts a new ticket and returns the raw response body.
    async fn create_ticket(&self, draft: &TicketDraft) -> AppResult<String>;
}
