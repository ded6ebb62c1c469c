/// Porcelain view of the working tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTreeStatus {
    pub files: Vec<String>,
}

impl WorkingTreeStatus {
    /// Parses `git status --porcelain` output.
    pub fn from_porcelain(output: &str) -> Self {
        let files = output
            .lines()
            .filter(|line| line.len() > 3)
            .map(|line| line[3..].trim().to_string())
            .collect();
        Self { files }
    }

    pub fn is_dirty(&self) -> bool {
        !self.files.is_empty()
    }
}
