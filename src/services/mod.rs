pub mod issue_tracker;
pub mod preferences;
pub mod prompt;
pub mod version_control;

pub use issue_tracker::IssueTrackerService;
pub use preferences::{PreferencesService, PreferencesStore};
pub use prompt::Prompter;
pub use version_control::VersionControlService;
