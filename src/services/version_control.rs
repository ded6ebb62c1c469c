use std::path::Path;

use async_trait::async_trait;

use crate::domain::branch::BranchName;
use crate::domain::change::WorkingTreeStatus;
use crate::error::AppResult;

/// Shell-level git operations against the selected repository. Every method
/// reports the command's error text as `AppError::VersionControl`.
#[async_trait]
pub trait VersionControlService: Send + Sync {
    /// Points subsequent commands at another repository.
    fn set_working_dir(&self, path: &Path);
    async fn status(&self) -> AppResult<WorkingTreeStatus>;
    /// `rev-parse --abbrev-ref HEAD`
    async fn current_branch(&self) -> AppResult<String>;
    /// `rev-parse --verify --quiet <name>`; errors when the ref does not resolve.
    async fn verify_ref(&self, name: &str) -> AppResult<String>;
    /// Raw `git branch` output.
    async fn list_branches(&self) -> AppResult<String>;
    async fn checkout(&self, branch: &str) -> AppResult<()>;
    /// Creates `branch` from the current tip and checks it out.
    async fn checkout_new_branch(&self, branch: &BranchName) -> AppResult<()>;
    async fn add_all(&self) -> AppResult<()>;
    async fn commit(&self, message: &str) -> AppResult<()>;
    /// Pushes `branch` to `remote` and sets it as upstream.
    async fn push(&self, remote: &str, branch: &str) -> AppResult<()>;
    async fn pull(&self) -> AppResult<()>;
    /// Merges `source` into the current branch.
    async fn merge(&self, source: &str) -> AppResult<()>;
}
