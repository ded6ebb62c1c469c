mod cmd;
mod config;
mod console;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::shell::Shell;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::assembla::AssemblaClient;
use crate::infra::git::GitCli;
use crate::infra::prefs_file::JsonPreferencesStore;
use crate::infra::terminal::TerminalPrompter;
use crate::services::PreferencesService;
use crate::workflow::lifecycle::BranchDefaults;

#[derive(Parser)]
#[command(
    name = "workflow",
    author,
    version,
    about = "Ticket-driven branch workflow assistant",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Ticket number used as the default when selecting or creating a branch.
    ticket: Option<String>,

    /// Short description used as the default branch description.
    description: Option<String>,

    /// Log debug output (git invocations, tracker requests).
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Config(args)) => config_cmd::run(args.command),
        None => {
            run_interactive(BranchDefaults {
                ticket_number: cli.ticket,
                description: cli.description,
            })
            .await
        }
    }
}

async fn run_interactive(defaults: BranchDefaults) -> AppResult<()> {
    let cwd = std::env::current_dir()?;
    let config = AppConfig::load(&cwd)?;

    if config.tracker.space_id.is_none() {
        console::warning("Tracker space id not configured; loading tickets will fail.");
    }
    if config.tracker.api_key.is_none() {
        console::warning("Tracker API key not configured; loading tickets will fail.");
    }
    if config.tracker.api_secret.is_none() {
        console::warning("Tracker API secret not configured; loading tickets will fail.");
    }

    let git = Arc::new(GitCli::new(config.repos_root.clone()));
    let issue_tracker = Arc::new(AssemblaClient::new(
        config.tracker.clone(),
        config.repos.clone(),
    ));
    let prompter = Arc::new(TerminalPrompter);

    let context = AppContext::new(config, git, issue_tracker, prompter);
    let preferences = PreferencesService::load(Box::new(JsonPreferencesStore::open_default()?))?;

    let mut shell = Shell::new(&context, preferences, defaults);
    shell.run().await?;
    if let Some(ticket) = shell.preferences().active_ticket() {
        console::field("Active ticket", &format!("#{}", ticket.number));
    }
    console::log("Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn positional_defaults_are_parsed() {
        let cli = Cli::try_parse_from(["workflow", "5734", "add account"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.ticket.as_deref(), Some("5734"));
        assert_eq!(cli.description.as_deref(), Some("add account"));
    }

    #[test]
    fn config_subcommand_is_parsed() {
        let cli = Cli::try_parse_from(["workflow", "config", "show"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config(_))));
    }
}
