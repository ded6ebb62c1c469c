use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::console;
use crate::context::AppContext;
use crate::domain::branch::ticket_number_from_branch;
use crate::domain::merge::MergeDraft;
use crate::error::AppResult;
use crate::services::PreferencesService;
use crate::services::prompt::accept_any;

const MERGE_REQUEST_FILE: &str = "merge-request.txt";
const MERGE_TICKET_FILE: &str = "merge-ticket.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePreparation {
    pub branch: String,
    pub files: Vec<PathBuf>,
}

fn require_value(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err("Please enter a value".to_string())
    } else {
        Ok(())
    }
}

/// Commits pending work, optionally brings in the base branch, and pushes.
/// The merge request itself still has to be opened by hand.
pub async fn prepare_merge(
    ctx: &AppContext,
    preferences: &PreferencesService,
) -> AppResult<MergePreparation> {
    let vcs = ctx.version_control.as_ref();
    let options = &ctx.config.lifecycle;
    let prompter = ctx.prompter.as_ref();

    let status = vcs.status().await?;
    let current = vcs.current_branch().await?;

    let branch = prompter.input("Branch:", Some(&current), &require_value)?;
    let commit_message = if status.is_dirty() {
        Some(prompter.input("Commit message:", None, &require_value)?)
    } else {
        None
    };

    let ticket_number = ticket_number_from_branch(&branch)
        .or_else(|| preferences.active_ticket().map(|t| t.number.clone()))
        .unwrap_or_default();
    let draft = MergeDraft {
        branch: branch.clone(),
        ticket_number,
        title: prompter.input("Merge Title:", None, &accept_any)?,
        description: prompter.input("Merge Description:", None, &accept_any)?,
        location: prompter.input("Location:", None, &accept_any)?,
        tests: prompter.input("Tests (Verify that...):", None, &accept_any)?,
        reported_by: prompter.input("Reported By:", None, &accept_any)?,
    };
    let sync_base = prompter.confirm(&format!(
        "Merge the latest {} into {branch} before pushing?",
        options.base_branch
    ))?;

    if branch != current {
        vcs.checkout(&branch).await?;
    }
    if let Some(message) = &commit_message {
        vcs.add_all().await?;
        vcs.commit(message).await?;
    }
    if sync_base {
        console::log(&format!("pulling {}...", options.base_branch));
        vcs.checkout(&options.base_branch).await?;
        vcs.pull().await?;
        vcs.checkout(&branch).await?;
        console::log(&format!("merging {}...", options.base_branch));
        vcs.merge(&options.base_branch).await?;
    }
    console::log("pushing to remote...");
    vcs.push(&options.remote, &branch).await?;
    console::info("Successfully pushed");

    let files = if options.write_merge_files {
        write_merge_files(&options.merge_files_dir, &draft, preferences.sprint())?
    } else {
        Vec::new()
    };
    for file in &files {
        console::log(&format!("Wrote {}", file.display()));
    }
    console::warning("No merge request is made because this feature is a WIP");

    Ok(MergePreparation { branch, files })
}

/// Stages and commits pending work, then pushes the branch upstream.
pub async fn update_branch(ctx: &AppContext) -> AppResult<String> {
    let vcs = ctx.version_control.as_ref();
    let prompter = ctx.prompter.as_ref();

    let status = vcs.status().await?;
    let current = vcs.current_branch().await?;
    let branch = prompter.input("Branch:", Some(&current), &require_value)?;
    let commit_message = if status.is_dirty() {
        Some(prompter.input("Commit message:", None, &require_value)?)
    } else {
        console::log("Nothing to commit; pushing the branch as it is.");
        None
    };

    if branch != current {
        vcs.checkout(&branch).await?;
    }
    if let Some(message) = &commit_message {
        vcs.add_all().await?;
        vcs.commit(message).await?;
    }
    vcs.push(&ctx.config.lifecycle.remote, &branch).await?;
    console::info("Successfully pushed");
    Ok(branch)
}

pub fn write_merge_files(dir: &Path, draft: &MergeDraft, sprint: &str) -> AppResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let request = dir.join(MERGE_REQUEST_FILE);
    let ticket = dir.join(MERGE_TICKET_FILE);
    fs::write(&request, draft.merge_request_text(sprint))?;
    fs::write(&ticket, draft.ticket_text())?;
    debug!(dir = %dir.display(), "wrote merge files");
    Ok(vec![request, ticket])
}
