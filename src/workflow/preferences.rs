use crate::console;
use crate::context::AppContext;
use crate::domain::branch;
use crate::domain::repo::find_repo;
use crate::error::{AppError, AppResult};
use crate::services::PreferencesService;
use crate::services::prompt::accept_any;

/// Re-reads `git branch` and keeps the branches prefixed with the initials.
pub async fn reload_local_branches(
    ctx: &AppContext,
    preferences: &mut PreferencesService,
) -> AppResult<()> {
    let raw = ctx.version_control.list_branches().await?;
    let branches = branch::local_branches(&raw, preferences.initials());
    preferences.set_local_branches(branches)
}

/// Points git at the named repository and refreshes the owned branches.
pub async fn apply_repo_cursor(
    ctx: &AppContext,
    preferences: &mut PreferencesService,
    name: &str,
) -> AppResult<()> {
    if ctx.config.repos.is_empty() {
        console::warning("No repositories configured; using the workspace root.");
    } else {
        let repo = find_repo(&ctx.config.repos, name).ok_or_else(|| {
            AppError::Configuration(format!("repository '{name}' is not configured"))
        })?;
        ctx.version_control
            .set_working_dir(&repo.path(&ctx.config.repos_root));
    }
    preferences.set_repo_cursor(name)?;
    reload_local_branches(ctx, preferences).await
}

pub async fn set_initials(ctx: &AppContext, preferences: &mut PreferencesService) -> AppResult<()> {
    let current = preferences.initials().to_string();
    let initials = ctx.prompter.input(
        "Enter your initials:",
        Some(&current),
        &branch::validate_initials,
    )?;
    preferences.set_initials(&initials)?;
    reload_local_branches(ctx, preferences).await?;
    console::info(&format!("Initials set to {}", preferences.initials()));
    Ok(())
}

pub fn set_sprint(ctx: &AppContext, preferences: &mut PreferencesService) -> AppResult<()> {
    let current = preferences.sprint().to_string();
    let sprint = ctx
        .prompter
        .input("Set the sprint:", Some(&current), &accept_any)?;
    preferences.set_sprint(&sprint)?;
    console::info(&format!("Sprint set to {}", preferences.sprint()));
    Ok(())
}

pub async fn select_repo(ctx: &AppContext, preferences: &mut PreferencesService) -> AppResult<()> {
    if ctx.config.repos.is_empty() {
        console::warning("No repositories configured. Run `workflow config init` to add some.");
        return Ok(());
    }
    let names: Vec<String> = ctx.config.repos.iter().map(|r| r.name.clone()).collect();
    let default = names
        .iter()
        .position(|n| n == preferences.repo_cursor())
        .unwrap_or(0);
    let prompt = console::value(
        "Choose the repo you want to work from:",
        Some(preferences.repo_cursor()),
    );
    let index = ctx.prompter.select(&prompt, &names, default)?;
    apply_repo_cursor(ctx, preferences, &names[index]).await?;
    console::info(&format!(
        "Working from the {} repo",
        preferences.repo_cursor()
    ));
    Ok(())
}
