use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static INITIALS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2,3}$").expect("valid initials pattern"));
static TICKET_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid ticket number pattern"));
static BRANCH_TICKET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+\D(\d+)\D.+$").expect("valid branch ticket pattern"));

const REMOTE_PREFIX: &str = "remotes/origin/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchName(pub String);

impl BranchName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<initials>-<ticket>-<slug(description)>`. An empty description leaves
    /// a trailing hyphen.
    pub fn from_parts(initials: &str, ticket_number: &str, description: &str) -> Self {
        Self(format!("{initials}-{ticket_number}-{}", slugify(description)))
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lower-cases and turns every space into a hyphen. Nothing else is touched.
pub fn slugify(input: &str) -> String {
    input.replace(' ', "-").to_lowercase()
}

/// How a ticket is matched against the locally owned branch names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssociationMode {
    /// Any branch containing the ticket identifier. `12` also matches `jv-123-foo`.
    #[default]
    Substring,
    /// The second hyphen-separated segment must equal the ticket identifier.
    TicketSegment,
}

impl AssociationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssociationMode::Substring => "substring",
            AssociationMode::TicketSegment => "ticket-segment",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "substring" => Some(AssociationMode::Substring),
            "ticket-segment" | "segment" => Some(AssociationMode::TicketSegment),
            _ => None,
        }
    }
}

pub fn find_branch<'a>(
    branches: &'a [String],
    ticket: &str,
    mode: AssociationMode,
) -> Option<&'a str> {
    branches
        .iter()
        .find(|branch| match mode {
            AssociationMode::Substring => branch.contains(ticket),
            AssociationMode::TicketSegment => ticket_segment(branch) == Some(ticket),
        })
        .map(String::as_str)
}

/// Parses raw `git branch` output and keeps the names owned by `initials`.
pub fn local_branches(raw: &str, initials: &str) -> Vec<String> {
    let prefix = format!("{initials}-");
    raw.lines()
        .map(|line| {
            line.replace(REMOTE_PREFIX, "")
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '*')
                .collect::<String>()
        })
        .filter(|name| name.starts_with(&prefix))
        .collect()
}

pub fn validate_initials(value: &str) -> Result<(), String> {
    if INITIALS_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err("Initials must be between 2 and 3 letters and not contain digits".to_string())
    }
}

pub fn validate_ticket_number(value: &str) -> Result<(), String> {
    if TICKET_NUMBER_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err("Please enter an integer value".to_string())
    }
}

/// Checks a description typed after a ticket was picked. The ticket number is
/// not counted, only the initials and four characters of separators.
pub fn validate_short_description(initials: &str, description: &str, limit: usize) -> Result<(), String> {
    let length = initials.chars().count() + description.chars().count() + 4;
    if !description.is_empty() && length < limit {
        Ok(())
    } else {
        Err("Please enter a shorter name.".to_string())
    }
}

/// Checks the full `<initials>-<number>-<description>` text against `limit`.
pub fn validate_branch_length(
    initials: &str,
    ticket_number: &str,
    description: &str,
    limit: usize,
) -> Result<(), String> {
    let combined = format!("{initials}-{ticket_number}-{description}");
    if description.is_empty() {
        Err("Please enter a description".to_string())
    } else if combined.chars().count() < limit {
        Ok(())
    } else {
        Err(format!(
            "Branch name must stay under {limit} characters; please enter a shorter description."
        ))
    }
}

/// Second hyphen-separated segment, where `from_parts` puts the ticket.
fn ticket_segment(branch: &str) -> Option<&str> {
    branch.split('-').nth(1)
}

/// Pulls the ticket number out of a branch name like `jv-5734-add-account`.
/// Names in other formats fall back to the last run of digits.
pub fn ticket_number_from_branch(branch: &str) -> Option<String> {
    if let Some(segment) = ticket_segment(branch).filter(|s| TICKET_NUMBER_PATTERN.is_match(s)) {
        return Some(segment.to_string());
    }
    BRANCH_TICKET_PATTERN
        .captures(branch)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}
