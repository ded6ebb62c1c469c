use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{IssueTrackerService, Prompter, VersionControlService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub version_control: Arc<dyn VersionControlService>,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub prompter: Arc<dyn Prompter>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        version_control: Arc<dyn VersionControlService>,
        issue_tracker: Arc<dyn IssueTrackerService>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            config,
            version_control,
            issue_tracker,
            prompter,
        }
    }
}
