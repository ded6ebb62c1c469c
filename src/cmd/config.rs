use clap::{Args, Subcommand};
use dialoguer::{Input, Password};

use crate::config::{StoredConfig, config_file_path};
use crate::domain::branch::AssociationMode;
use crate::domain::repo::RepoDescriptor;
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring workflow.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Secrets are stored in the local config file; protect your filesystem accordingly.");
    println!();

    apply_prompt(
        "Tracker API URL (e.g., https://api.assembla.com/v1)",
        &mut cfg.tracker_url,
        false,
    )?;
    apply_prompt("Tracker space id", &mut cfg.space_id, false)?;
    apply_prompt("Tracker API key", &mut cfg.api_key, true)?;
    apply_prompt("Tracker API secret", &mut cfg.api_secret, true)?;
    apply_prompt("Repositories root directory", &mut cfg.repos_root, false)?;

    let mut repos = (!cfg.repos.is_empty()).then(|| format_repos(&cfg.repos));
    apply_prompt(
        "Repositories (name=relative/path/dir, comma separated)",
        &mut repos,
        false,
    )?;
    cfg.repos = match repos {
        Some(value) => parse_repos(&value)?,
        None => Vec::new(),
    };

    apply_prompt("Base branch for merges", &mut cfg.base_branch, false)?;
    apply_prompt("Remote to push to", &mut cfg.remote, false)?;
    apply_prompt(
        "Branch association (substring/ticket-segment)",
        &mut cfg.branch_association,
        false,
    )?;
    cfg.branch_association = normalize_association(cfg.branch_association.take())?;
    apply_prompt("Directory for merge files", &mut cfg.merge_files_dir, false)?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("Tracker API URL: {}", display_value(&cfg.tracker_url));
    println!("Tracker space id: {}", display_value(&cfg.space_id));
    println!("Tracker API key: {}", mask_secret(&cfg.api_key));
    println!("Tracker API secret: {}", mask_secret(&cfg.api_secret));
    println!("Repositories root: {}", display_value(&cfg.repos_root));
    if cfg.repos.is_empty() {
        println!("Repositories: <not set>");
    } else {
        println!("Repositories:");
        for repo in &cfg.repos {
            println!(
                "  {} -> {}",
                repo.name,
                repo.path(std::path::Path::new("")).display()
            );
        }
    }
    println!("Base branch: {}", display_value(&cfg.base_branch));
    println!("Remote: {}", display_value(&cfg.remote));
    println!(
        "Branch association: {}",
        display_value(&cfg.branch_association)
    );
    println!(
        "Write merge files: {}",
        cfg.write_merge_files
            .map(|value| value.to_string())
            .unwrap_or_else(|| "<not set>".to_string())
    );
    println!("Merge files directory: {}", display_value(&cfg.merge_files_dir));

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let label = match (current, secret) {
        (Some(_), true) => format!("{field} [****] (Enter to keep, '-' to clear)"),
        (Some(value), false) => format!("{field} [{value}] (Enter to keep, '-' to clear)"),
        (None, _) => format!("{field} (Enter to skip)"),
    };

    let input = if secret {
        Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()?
    } else {
        Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()?
    };
    Ok(PromptAction::from_input(&input))
}

/// Rewrites an accepted mode to its canonical name, e.g. `segment` to `ticket-segment`.
fn normalize_association(value: Option<String>) -> AppResult<Option<String>> {
    value
        .map(|mode| {
            AssociationMode::from_str(&mode)
                .map(|parsed| parsed.as_str().to_string())
                .ok_or_else(|| {
                    AppError::Configuration(format!("unknown branch association mode '{mode}'"))
                })
        })
        .transpose()
}

fn format_repos(repos: &[RepoDescriptor]) -> String {
    repos
        .iter()
        .map(|repo| {
            let location = if repo.relative_path.is_empty() {
                repo.repo.clone()
            } else {
                format!("{}/{}", repo.relative_path.trim_end_matches('/'), repo.repo)
            };
            format!("{}={}", repo.name, location)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_repos(value: &str) -> AppResult<Vec<RepoDescriptor>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            RepoDescriptor::parse(entry).ok_or_else(|| {
                AppError::Configuration(format!(
                    "invalid repository entry '{entry}', expected name=relative/path/dir"
                ))
            })
        })
        .collect()
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interprets_wizard_input() {
        assert_eq!(PromptAction::from_input("\n"), PromptAction::Keep);
        assert_eq!(PromptAction::from_input(" - \n"), PromptAction::Clear);
        assert_eq!(
            PromptAction::from_input("space42\n"),
            PromptAction::Set("space42".to_string())
        );
    }

    #[test]
    fn masks_secrets() {
        assert_eq!(mask_secret(&Some("abcdefghij".to_string())), "abc***hij");
        assert_eq!(mask_secret(&Some("short".to_string())), "***");
        assert_eq!(mask_secret(&None), "<not set>");
        assert_eq!(display_value(&Some(String::new())), "<not set>");
    }

    #[test]
    fn masks_multibyte_secrets_on_char_boundaries() {
        assert_eq!(mask_secret(&Some("äöüßéèêñ".to_string())), "äöü***èêñ");
        assert_eq!(mask_secret(&Some("ab€cd€ef".to_string())), "ab€***€ef");
    }

    #[test]
    fn association_mode_is_stored_by_canonical_name() {
        assert_eq!(
            normalize_association(Some("Segment".to_string())).unwrap(),
            Some("ticket-segment".to_string())
        );
        assert_eq!(
            normalize_association(Some("substring".to_string())).unwrap(),
            Some("substring".to_string())
        );
        assert_eq!(normalize_association(None).unwrap(), None);
        assert!(normalize_association(Some("fuzzy".to_string())).is_err());
    }

    #[test]
    fn repo_list_round_trips_through_text() {
        let repos = parse_repos("website=web/site, api=api").unwrap();
        assert_eq!(repos.len(), 2);
        assert_eq!(format_repos(&repos), "website=web/site, api=api");
        assert!(parse_repos("website").is_err());
        assert!(parse_repos("").unwrap().is_empty());
    }
}
