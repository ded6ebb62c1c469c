use crate::console;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::services::PreferencesService;
use crate::workflow::lifecycle::{self, BranchDefaults, FlowState, TicketBranchFlow};
use crate::workflow::{merge, preferences as prefs_flow, ticket};

const MAIN_MENU: [&str; 3] = ["Manage tickets", "Edit preferences", "Exit"];
const TICKETS_MENU: [&str; 8] = [
    "Set active ticket",
    "Create branch",
    "Create ticket",
    "Prepare for merge request",
    "Prepare for hotfix merge request",
    "Update branch",
    "Reload tracker data",
    "Back",
];

/// The interactive menu loop. Flow errors are reported and the user lands
/// back in the enclosing menu; only terminal failures end the session.
pub struct Shell<'a> {
    ctx: &'a AppContext,
    preferences: PreferencesService,
    defaults: BranchDefaults,
}

impl<'a> Shell<'a> {
    pub fn new(ctx: &'a AppContext, preferences: PreferencesService, defaults: BranchDefaults) -> Self {
        Self {
            ctx,
            preferences,
            defaults,
        }
    }

    pub fn preferences(&self) -> &PreferencesService {
        &self.preferences
    }

    pub async fn run(&mut self) -> AppResult<()> {
        self.startup().await?;
        self.main_menu().await
    }

    async fn startup(&mut self) -> AppResult<()> {
        console::banner();
        console::log("Loading tracker data...");
        self.ctx.issue_tracker.refresh().await?;
        console::log("Data loaded successfully! Welcome to Workflow :)\n");

        if !self.preferences.initialized() {
            console::info("Heya :) Welcome to Workflow!");
            console::info(
                "Since this is your first time using Workflow, please update your preferences.",
            );
            self.preferences.init_defaults()?;
            return self.preferences_menu().await;
        }

        let repo = self.preferences.repo_cursor().to_string();
        let applied = prefs_flow::apply_repo_cursor(self.ctx, &mut self.preferences, &repo).await;
        report(applied)?;

        console::field("Sprint", self.preferences.sprint());
        console::field("Repository", self.preferences.repo_cursor());
        if let Some(ticket) = self.preferences.active_ticket() {
            console::field(
                "Active ticket",
                &format!("#{}: {}", ticket.number, ticket.summary),
            );
        }
        let branch = self.ctx.version_control.current_branch().await;
        if let Some(branch) = report(branch)? {
            console::field("Branch", &branch);
        }
        Ok(())
    }

    async fn main_menu(&mut self) -> AppResult<()> {
        loop {
            let items = menu_items(&MAIN_MENU);
            match self
                .ctx
                .prompter
                .select("What would you like to do?", &items, 0)?
            {
                0 => self.tickets_menu().await?,
                1 => self.preferences_menu().await?,
                _ => return Ok(()),
            }
        }
    }

    async fn tickets_menu(&mut self) -> AppResult<()> {
        loop {
            let items = menu_items(&TICKETS_MENU);
            let choice = self
                .ctx
                .prompter
                .select("Tickets: What would you like to do?", &items, 0)?;
            let leave = match choice {
                0 => {
                    let flow = TicketBranchFlow::new(self.ctx, &mut self.preferences, &self.defaults);
                    let outcome = flow.run().await;
                    self.finish_branch_flow(outcome)?;
                    true
                }
                1 => {
                    let outcome =
                        lifecycle::create_branch(self.ctx, &mut self.preferences, &self.defaults).await;
                    self.finish_branch_flow(outcome)?;
                    true
                }
                2 => {
                    report(ticket::create_ticket(self.ctx, &self.preferences).await)?;
                    false
                }
                3 => {
                    report(merge::prepare_merge(self.ctx, &self.preferences).await)?;
                    false
                }
                4 => {
                    console::warning("Hotfix not yet implemented");
                    true
                }
                5 => {
                    report(merge::update_branch(self.ctx).await)?;
                    false
                }
                6 => {
                    if let Some(snapshot) = report(self.ctx.issue_tracker.refresh().await)? {
                        console::info(&format!("Loaded {} tickets", snapshot.tickets.len()));
                    }
                    false
                }
                _ => true,
            };
            if leave {
                return Ok(());
            }
        }
    }

    fn finish_branch_flow(&self, outcome: AppResult<FlowState>) -> AppResult<()> {
        if let Some(FlowState::CheckedOut { branch }) = report(outcome)? {
            console::field("Branch", &branch);
        }
        Ok(())
    }

    async fn preferences_menu(&mut self) -> AppResult<()> {
        loop {
            let items = vec![
                console::value("Set initials", Some(self.preferences.initials())),
                console::value("Set sprint", Some(self.preferences.sprint())),
                console::value("Set repo", Some(self.preferences.repo_cursor())),
                "Back".to_string(),
            ];
            let choice = self.ctx.prompter.select(
                "Edit preferences. What would you like to do?",
                &items,
                0,
            )?;
            let result = match choice {
                0 => prefs_flow::set_initials(self.ctx, &mut self.preferences).await,
                1 => prefs_flow::set_sprint(self.ctx, &mut self.preferences),
                2 => prefs_flow::select_repo(self.ctx, &mut self.preferences).await,
                _ => return Ok(()),
            };
            report(result)?;
        }
    }
}

fn menu_items(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|label| label.to_string()).collect()
}

/// Prints a flow error and swallows it. Prompt failures mean the terminal is
/// gone, so those are passed up.
fn report<T>(result: AppResult<T>) -> AppResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err @ AppError::Prompt(_)) => Err(err),
        Err(err) => {
            console::error(&err.to_string());
            Ok(None)
        }
    }
}
