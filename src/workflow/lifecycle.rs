//! Ticket to branch lifecycle.
//!
//! Picking an active ticket walks a small state machine:
//!
//! ```text
//! NoActiveTicket -> TicketSelected -> BranchFound    -> CheckedOut
//!                                  -> BranchNotFound -> CheckedOut
//!                                                    -> Cancelled
//! ```
//!
//! Git errors end the walk with `Err`; side effects already applied (the
//! active ticket, a created branch) are left in place.

use tracing::warn;

use crate::console;
use crate::context::AppContext;
use crate::domain::branch::{self, BranchName};
use crate::domain::ticket::{self, Ticket};
use crate::error::AppResult;
use crate::services::{PreferencesService, VersionControlService};

/// Values from the command line offered as prompt defaults.
#[derive(Debug, Clone, Default)]
pub struct BranchDefaults {
    pub ticket_number: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    NoActiveTicket,
    TicketSelected(Ticket),
    BranchFound { ticket: Ticket, branch: String },
    BranchNotFound(Ticket),
    CheckedOut { branch: String },
    Cancelled,
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::CheckedOut { .. } | FlowState::Cancelled)
    }
}

pub struct TicketBranchFlow<'a> {
    ctx: &'a AppContext,
    preferences: &'a mut PreferencesService,
    defaults: &'a BranchDefaults,
    state: FlowState,
}

impl<'a> TicketBranchFlow<'a> {
    pub fn new(
        ctx: &'a AppContext,
        preferences: &'a mut PreferencesService,
        defaults: &'a BranchDefaults,
    ) -> Self {
        Self {
            ctx,
            preferences,
            defaults,
            state: FlowState::NoActiveTicket,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Steps until `CheckedOut` or `Cancelled`.
    pub async fn run(mut self) -> AppResult<FlowState> {
        while !self.state.is_terminal() {
            self.step().await?;
        }
        Ok(self.state)
    }

    /// Performs one transition. On error the state is left where it was.
    pub async fn step(&mut self) -> AppResult<&FlowState> {
        let next = match self.state.clone() {
            FlowState::NoActiveTicket => self.select_ticket().await?,
            FlowState::TicketSelected(ticket) => self.resolve_branch(ticket),
            FlowState::BranchFound { branch, .. } => {
                checkout_existing(self.ctx.version_control.as_ref(), &branch).await?
            }
            FlowState::BranchNotFound(ticket) => self.create_for(ticket).await?,
            terminal => terminal,
        };
        self.state = next;
        Ok(&self.state)
    }

    async fn select_ticket(&mut self) -> AppResult<FlowState> {
        let mut tickets = match self.ctx.issue_tracker.cached() {
            Some(snapshot) => snapshot.tickets,
            None => self.ctx.issue_tracker.refresh().await?.tickets,
        };
        if tickets.is_empty() {
            console::warning("The tracker returned no tickets to work on.");
            return Ok(FlowState::Cancelled);
        }
        ticket::sort_by_priority(&mut tickets);

        let labels: Vec<String> = tickets
            .iter()
            .map(|t| console::paint_priority(&t.label(), t.priority))
            .collect();
        let default = self
            .defaults
            .ticket_number
            .as_deref()
            .and_then(|number| tickets.iter().position(|t| t.number == number))
            .unwrap_or(0);

        let index = self.ctx.prompter.select("Ticket", &labels, default)?;
        let selected = tickets.swap_remove(index);

        self.preferences.set_active_ticket(Some(selected.clone()))?;
        console::info(&format!(
            "Active ticket set to #{} - {}",
            selected.number, selected.summary
        ));
        Ok(FlowState::TicketSelected(selected))
    }

    fn resolve_branch(&self, ticket: Ticket) -> FlowState {
        let mode = self.ctx.config.lifecycle.association;
        match self.preferences.find_branch(&ticket.number, mode) {
            Some(branch) => FlowState::BranchFound { ticket, branch },
            None => FlowState::BranchNotFound(ticket),
        }
    }

    async fn create_for(&mut self, ticket: Ticket) -> AppResult<FlowState> {
        console::log("No branch exists yet for this ticket. Please enter a short branch name.");

        let initials = self.preferences.initials().to_string();
        let limit = self.ctx.config.lifecycle.branch_name_limit;
        let validate =
            |value: &str| branch::validate_short_description(&initials, value, limit);
        let description = self.ctx.prompter.input(
            "Branch Name",
            self.defaults.description.as_deref(),
            &validate,
        )?;

        let name = BranchName::from_parts(&initials, &ticket.number, &description);
        let parent = self.ctx.version_control.current_branch().await?;
        let confirmed = self.ctx.prompter.confirm(&format!(
            "New branch will be called \"{name}\" and start from \"{parent}\". Cool?"
        ))?;
        if !confirmed {
            console::info("Cancelled");
            self.preferences.set_active_ticket(None)?;
            return Ok(FlowState::Cancelled);
        }

        create_and_checkout(self.ctx.version_control.as_ref(), &mut *self.preferences, &name).await
    }
}

/// Prompts for a ticket number and description, then checks out the matching
/// branch, creating it when git does not know it yet.
pub async fn create_branch(
    ctx: &AppContext,
    preferences: &mut PreferencesService,
    defaults: &BranchDefaults,
) -> AppResult<FlowState> {
    let initials = preferences.initials().to_string();
    let limit = ctx.config.lifecycle.branch_name_limit;

    let number = ctx.prompter.input(
        "Ticket Number:",
        defaults.ticket_number.as_deref(),
        &branch::validate_ticket_number,
    )?;
    let validate =
        |value: &str| branch::validate_branch_length(&initials, &number, value, limit);
    let description = ctx.prompter.input(
        "Description:",
        defaults.description.as_deref(),
        &validate,
    )?;

    let name = BranchName::from_parts(&initials, &number, &description);
    if !ctx
        .prompter
        .confirm(&format!("Branch will be called \"{name}\". Cool?"))?
    {
        console::info("Cancelled");
        return Ok(FlowState::Cancelled);
    }

    if let Some(ticket) = ctx
        .issue_tracker
        .cached()
        .and_then(|snapshot| snapshot.tickets.into_iter().find(|t| t.number == number))
    {
        preferences.set_active_ticket(Some(ticket))?;
    }

    let vcs = ctx.version_control.as_ref();
    if branch_exists(vcs, name.as_str()).await {
        checkout_existing(vcs, name.as_str()).await
    } else {
        create_and_checkout(vcs, preferences, &name).await
    }
}

/// Any façade error counts as "does not exist".
pub async fn branch_exists(vcs: &dyn VersionControlService, name: &str) -> bool {
    match vcs.verify_ref(name).await {
        Ok(resolved) => !resolved.is_empty(),
        Err(err) => {
            warn!(branch = name, error = %err, "branch did not resolve");
            false
        }
    }
}

async fn checkout_existing(vcs: &dyn VersionControlService, branch: &str) -> AppResult<FlowState> {
    vcs.checkout(branch).await?;
    console::info(&format!("Working from the {branch} branch"));
    Ok(FlowState::CheckedOut {
        branch: vcs.current_branch().await?,
    })
}

async fn create_and_checkout(
    vcs: &dyn VersionControlService,
    preferences: &mut PreferencesService,
    name: &BranchName,
) -> AppResult<FlowState> {
    vcs.checkout_new_branch(name).await?;
    preferences.add_local_branch(name.as_str())?;
    console::info(&format!("Working from the {name} branch"));
    Ok(FlowState::CheckedOut {
        branch: vcs.current_branch().await?,
    })
}
