/// Text collected while preparing a merge request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeDraft {
    pub branch: String,
    pub ticket_number: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub tests: String,
    pub reported_by: String,
}

impl MergeDraft {
    pub fn merge_title(&self, sprint: &str) -> String {
        format!("{sprint} {} re #{}", self.title, self.ticket_number)
    }

    pub fn merge_description(&self) -> String {
        format!("test #{}\n{}", self.ticket_number, self.description)
    }

    pub fn merge_request_text(&self, sprint: &str) -> String {
        format!(
            "{}\n\n{}\n\nBranch: {}",
            self.merge_title(sprint),
            self.merge_description(),
            self.branch
        )
    }

    /// Ticket notes in the tracker's TD/L/T/RB layout. RB is dropped when empty.
    pub fn ticket_text(&self) -> String {
        let mut text = format!(
            "TD: \n\nL:\n{}\n\nT:\n{}\n\n",
            self.location, self.tests
        );
        if !self.reported_by.is_empty() {
            text.push_str("RB:\n");
            text.push_str(&self.reported_by);
        }
        text
    }
}
