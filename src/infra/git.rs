use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::branch::BranchName;
use crate::domain::change::WorkingTreeStatus;
use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

pub struct GitCli {
    workdir: RwLock<PathBuf>,
}

impl GitCli {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self {
            workdir: RwLock::new(workspace_root),
        }
    }

    fn workdir(&self) -> PathBuf {
        self.workdir
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    async fn run(&self, args: &[&str]) -> AppResult<String> {
        let workdir = self.workdir();
        debug!(dir = %workdir.display(), ?args, "running git");

        let output = Command::new("git")
            .arg("-C")
            .arg(&workdir)
            .args(args)
            .output()
            .await
            .map_err(|err| AppError::VersionControl(format!("failed to run git: {err}")))?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            format!("git {} exited with {}", args.join(" "), output.status)
        } else {
            stderr
        };
        Err(AppError::VersionControl(message))
    }
}

#[async_trait]
impl VersionControlService for GitCli {
    fn set_working_dir(&self, path: &Path) {
        let mut workdir = self
            .workdir
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *workdir = path.to_path_buf();
    }

    async fn status(&self) -> AppResult<WorkingTreeStatus> {
        let output = self.run(&["status", "--porcelain"]).await?;
        Ok(WorkingTreeStatus::from_porcelain(&output))
    }

    async fn current_branch(&self) -> AppResult<String> {
        let output = self
            .run(&["rev-parse", "--abbrev-ref", "--quiet", "HEAD"])
            .await?;
        Ok(output.trim().to_string())
    }

    async fn verify_ref(&self, name: &str) -> AppResult<String> {
        let output = self.run(&["rev-parse", "--verify", "--quiet", name]).await?;
        Ok(output.trim().to_string())
    }

    async fn list_branches(&self) -> AppResult<String> {
        self.run(&["branch"]).await
    }

    async fn checkout(&self, branch: &str) -> AppResult<()> {
        self.run(&["checkout", branch]).await.map(|_| ())
    }

    async fn checkout_new_branch(&self, branch: &BranchName) -> AppResult<()> {
        if branch.as_str().is_empty() {
            return Err(AppError::VersionControl(
                "branch name cannot be empty".to_string(),
            ));
        }
        self.run(&["checkout", "-b", branch.as_str()])
            .await
            .map(|_| ())
    }

    async fn add_all(&self) -> AppResult<()> {
        self.run(&["add", "."]).await.map(|_| ())
    }

    async fn commit(&self, message: &str) -> AppResult<()> {
        self.run(&["commit", "-m", message]).await.map(|_| ())
    }

    async fn push(&self, remote: &str, branch: &str) -> AppResult<()> {
        self.run(&["push", "-u", remote, branch]).await.map(|_| ())
    }

    async fn pull(&self) -> AppResult<()> {
        self.run(&["pull"]).await.map(|_| ())
    }

    async fn merge(&self, source: &str) -> AppResult<()> {
        self.run(&["merge", source]).await.map(|_| ())
    }
}
