use crate::console;
use crate::context::AppContext;
use crate::domain::ticket::{self, Priority, TicketDraft, TicketStatus};
use crate::error::AppResult;
use crate::services::PreferencesService;
use crate::services::prompt::accept_any;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketCreation {
    /// Raw response body from the tracker.
    Posted(String),
    Cancelled,
}

pub async fn create_ticket(
    ctx: &AppContext,
    preferences: &PreferencesService,
) -> AppResult<TicketCreation> {
    console::warning(
        "This is a work in progress. It *will* post a new ticket to the tracker, which you will need to find yourself.",
    );

    let initials = preferences.initials();
    let limit = ctx.config.lifecycle.ticket_title_limit;
    let validate = |value: &str| ticket::validate_summary(initials, value, limit);
    let summary = ctx.prompter.input("Title:", None, &validate)?;
    let description = ctx.prompter.input("Description", None, &accept_any)?;

    let statuses: Vec<String> = TicketStatus::ALL.iter().map(|s| s.to_string()).collect();
    let status = TicketStatus::ALL[ctx.prompter.select("Status", &statuses, 0)?];

    let priorities: Vec<String> = Priority::ALL.iter().map(|p| p.to_string()).collect();
    let priority = Priority::ALL[ctx.prompter.select("Priority", &priorities, 1)?];

    let draft = TicketDraft {
        summary,
        description,
        status,
        priority,
    };

    if !ctx.prompter.confirm("Everything cool?")? {
        console::info("Cancelled");
        return Ok(TicketCreation::Cancelled);
    }

    let body = ctx.issue_tracker.create_ticket(&draft).await?;
    console::log(&body);
    Ok(TicketCreation::Posted(body))
}
