use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::TrackerSettings;
use crate::domain::repo::RepoDescriptor;
use crate::domain::ticket::{Ticket, TicketDraft};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;
use crate::services::issue_tracker::{SpaceTool, TrackerSnapshot, TrackerUser};

const API_KEY_HEADER: &str = "X-Api-key";
const API_SECRET_HEADER: &str = "X-Api-secret";

pub struct AssemblaClient {
    http: Client,
    settings: TrackerSettings,
    repos: Vec<RepoDescriptor>,
    snapshot: Mutex<Option<TrackerSnapshot>>,
}

impl AssemblaClient {
    pub fn new(settings: TrackerSettings, repos: Vec<RepoDescriptor>) -> Self {
        Self {
            http: Client::new(),
            settings,
            repos,
            snapshot: Mutex::new(None),
        }
    }

    fn credentials(&self) -> AppResult<(&str, &str)> {
        let key = self
            .settings
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("tracker API key not configured".to_string()))?;
        let secret = self.settings.api_secret.as_deref().ok_or_else(|| {
            AppError::Configuration("tracker API secret not configured".to_string())
        })?;
        Ok((key, secret))
    }

    fn space_endpoint(&self, path: &str) -> AppResult<String> {
        let space_id = self
            .settings
            .space_id
            .as_deref()
            .ok_or_else(|| AppError::Configuration("tracker space id not configured".to_string()))?;
        Ok(format!(
            "{}/spaces/{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            space_id,
            path
        ))
    }

    async fn get<T>(&self, path: &str, query: &[(&str, &str)]) -> AppResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let (key, secret) = self.credentials()?;
        let url = self.space_endpoint(path)?;
        debug!(%url, "tracker GET");

        let response = self
            .http
            .get(&url)
            .query(query)
            .header(API_KEY_HEADER, key)
            .header(API_SECRET_HEADER, secret)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call tracker: {err}")))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(T::default());
        }
        let body = response
            .text()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to read {path}: {err}")))?;
        if !status.is_success() {
            return Err(AppError::IssueTracker(format!(
                "tracker responded with {status} for {path}: {body}"
            )));
        }
        if body.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&body)
            .map_err(|err| AppError::IssueTracker(format!("failed to parse {path}: {err}")))
    }

    async fn fetch_users(&self) -> AppResult<Vec<TrackerUser>> {
        self.get("users", &[]).await
    }

    async fn fetch_space_tools(&self) -> AppResult<Vec<SpaceTool>> {
        let tools: Vec<SpaceTool> = self.get("space_tools", &[]).await?;
        Ok(filter_repo_tools(tools, &self.repos))
    }

    async fn fetch_tickets(&self) -> AppResult<Vec<Ticket>> {
        self.get("tickets", &[("report", "0")]).await
    }
}

#[async_trait]
impl IssueTrackerService for AssemblaClient {
    async fn refresh(&self) -> AppResult<TrackerSnapshot> {
        let (users, space_tools, tickets) = tokio::try_join!(
            self.fetch_users(),
            self.fetch_space_tools(),
            self.fetch_tickets()
        )?;
        let snapshot = TrackerSnapshot {
            users,
            space_tools,
            tickets,
        };
        *self
            .snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(snapshot.clone());
        Ok(snapshot)
    }

    fn cached(&self) -> Option<TrackerSnapshot> {
        self.snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    async fn create_ticket(&self, draft: &TicketDraft) -> AppResult<String> {
        let (key, secret) = self.credentials()?;
        let url = self.space_endpoint("tickets")?;
        debug!(%url, summary = %draft.summary, "tracker POST");

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, key)
            .header(API_SECRET_HEADER, secret)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&CreateTicketRequest::from_draft(draft))
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call tracker: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());
        if !status.is_success() {
            return Err(AppError::IssueTracker(format!(
                "tracker responded with {status}: {body}"
            )));
        }
        Ok(body)
    }
}

/// Keeps the space tools whose URL mentions one of the configured repositories.
pub fn filter_repo_tools(tools: Vec<SpaceTool>, repos: &[RepoDescriptor]) -> Vec<SpaceTool> {
    tools
        .into_iter()
        .filter(|tool| {
            tool.url
                .as_deref()
                .is_some_and(|url| repos.iter().any(|repo| url.contains(&repo.repo)))
        })
        .collect()
}

#[derive(Serialize)]
struct CreateTicketRequest<'a> {
    ticket: CreateTicketFields<'a>,
}

#[derive(Serialize)]
struct CreateTicketFields<'a> {
    summary: &'a str,
    description: &'a str,
    status_name: &'static str,
    priority: i64,
}

impl<'a> CreateTicketRequest<'a> {
    fn from_draft(draft: &'a TicketDraft) -> Self {
        Self {
            ticket: CreateTicketFields {
                summary: &draft.summary,
                description: &draft.description,
                status_name: draft.status.as_str(),
                priority: draft.priority.value(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::{Priority, TicketStatus};

    fn settings() -> TrackerSettings {
        TrackerSettings {
            base_url: "https://api.example.com/v1/".to_string(),
            space_id: Some("space42".to_string()),
            api_key: Some("key".to_string()),
            api_secret: None,
        }
    }

    fn tool(id: &str, url: Option<&str>) -> SpaceTool {
        SpaceTool {
            id: id.to_string(),
            name: None,
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn builds_space_endpoints() {
        let client = AssemblaClient::new(settings(), Vec::new());
        assert_eq!(
            client.space_endpoint("tickets").unwrap(),
            "https://api.example.com/v1/spaces/space42/tickets"
        );
    }

    #[test]
    fn missing_secret_is_a_configuration_error() {
        let client = AssemblaClient::new(settings(), Vec::new());
        assert!(matches!(
            client.credentials(),
            Err(AppError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn refresh_fails_without_credentials() {
        let client = AssemblaClient::new(settings(), Vec::new());
        assert!(client.refresh().await.is_err());
        assert!(client.cached().is_none());
    }

    #[test]
    fn keeps_only_repository_tools() {
        let repos = vec![RepoDescriptor {
            name: "website".to_string(),
            relative_path: String::new(),
            repo: "oaftrac.website".to_string(),
        }];
        let tools = vec![
            tool("1", Some("https://git.example.com/oaftrac.website.git")),
            tool("2", Some("https://git.example.com/oaftrac.api.git")),
            tool("3", None),
        ];
        let kept = filter_repo_tools(tools, &repos);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "1");
    }

    #[test]
    fn serializes_ticket_payload() {
        let draft = TicketDraft {
            summary: "Add account number".to_string(),
            description: "Export it".to_string(),
            status: TicketStatus::InProgress,
            priority: Priority::High,
        };
        let value = serde_json::to_value(CreateTicketRequest::from_draft(&draft)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "ticket": {
                    "summary": "Add account number",
                    "description": "Export it",
                    "status_name": "InProgress",
                    "priority": 2
                }
            })
        );
    }
}
