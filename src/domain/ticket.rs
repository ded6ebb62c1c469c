use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A work item as returned by the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub number: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default = "default_priority")]
    pub priority: i64,
}

impl Ticket {
    pub fn label(&self) -> String {
        format!("{}: {} | {}", self.status, self.number, self.summary)
    }
}

fn default_priority() -> i64 {
    Priority::Normal.value()
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(value) => value,
        Raw::Number(value) => value.to_string(),
    })
}

/// Sorts by priority ascending, Highest first. Equal priorities keep their order.
pub fn sort_by_priority(tickets: &mut [Ticket]) {
    tickets.sort_by_key(|ticket| ticket.priority);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    New,
    InProgress,
    Ready,
    Test,
    Invalid,
    Fixed,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 7] = [
        TicketStatus::New,
        TicketStatus::InProgress,
        TicketStatus::Ready,
        TicketStatus::Test,
        TicketStatus::Invalid,
        TicketStatus::Fixed,
        TicketStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "New",
            TicketStatus::InProgress => "InProgress",
            TicketStatus::Ready => "Ready",
            TicketStatus::Test => "Test",
            TicketStatus::Invalid => "Invalid",
            TicketStatus::Fixed => "Fixed",
            TicketStatus::Closed => "closed",
        }
    }

    /// Exact match against the tracker's status names.
    pub fn from_str(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Highest,
    High,
    Normal,
    Low,
    Lowest,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::Highest,
        Priority::High,
        Priority::Normal,
        Priority::Low,
        Priority::Lowest,
    ];

    pub fn value(&self) -> i64 {
        match self {
            Priority::Highest => 1,
            Priority::High => 2,
            Priority::Normal => 3,
            Priority::Low => 4,
            Priority::Lowest => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Priority::Highest => "Highest",
            Priority::High => "High",
            Priority::Normal => "Normal",
            Priority::Low => "Low",
            Priority::Lowest => "Lowest",
        }
    }

    pub fn from_value(value: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|priority| priority.value() == value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A ticket that has been filled in locally but not posted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketDraft {
    pub summary: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: Priority,
}

pub fn validate_summary(initials: &str, summary: &str, limit: usize) -> Result<(), String> {
    if summary.is_empty() {
        return Err("Please enter a title".to_string());
    }
    let length = summary.chars().count() + initials.chars().count() + 4;
    if length < limit {
        Ok(())
    } else {
        Err("Please enter a shorter title.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(number: &str, priority: i64) -> Ticket {
        Ticket {
            id: format!("id-{number}"),
            number: number.to_string(),
            summary: format!("ticket {number}"),
            description: None,
            status: "New".to_string(),
            priority,
        }
    }

    #[test]
    fn sorts_highest_priority_first() {
        let mut tickets = vec![ticket("a", 3), ticket("b", 1), ticket("c", 5), ticket("d", 2)];
        sort_by_priority(&mut tickets);
        let priorities: Vec<i64> = tickets.iter().map(|t| t.priority).collect();
        assert_eq!(priorities, vec![1, 2, 3, 5]);
    }

    #[test]
    fn status_set_is_fixed() {
        let names: Vec<&str> = TicketStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            names,
            vec!["New", "InProgress", "Ready", "Test", "Invalid", "Fixed", "closed"]
        );
        assert_eq!(TicketStatus::from_str("closed"), Some(TicketStatus::Closed));
        assert_eq!(TicketStatus::from_str("Closed"), None);
        assert_eq!(TicketStatus::from_str("Done"), None);
    }

    #[test]
    fn priority_set_is_fixed() {
        let pairs: Vec<(&str, i64)> = Priority::ALL.iter().map(|p| (p.name(), p.value())).collect();
        assert_eq!(
            pairs,
            vec![
                ("Highest", 1),
                ("High", 2),
                ("Normal", 3),
                ("Low", 4),
                ("Lowest", 5)
            ]
        );
        assert_eq!(Priority::from_value(0), None);
        assert_eq!(Priority::from_value(6), None);
    }

    #[test]
    fn validates_summary() {
        assert!(validate_summary("jv", "", 100).is_err());
        assert!(validate_summary("jv", "Export account numbers", 100).is_ok());
        assert!(validate_summary("jv", &"x".repeat(94), 100).is_err());
        assert!(validate_summary("jv", &"x".repeat(93), 100).is_ok());
    }

    #[test]
    fn deserializes_numeric_identifiers() {
        let json = r#"{"id": 9001, "number": 5734, "summary": "Add account number",
            "description": null, "status": "New", "priority": 2}"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.id, "9001");
        assert_eq!(ticket.number, "5734");
        assert_eq!(ticket.priority, 2);
        assert_eq!(ticket.label(), "New: 5734 | Add account number");
    }
}
