use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("version control error: {0}")]
    VersionControl(String),
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error("preferences error: {0}")]
    Preferences(String),
    #[error("prompt error: {0}")]
    Prompt(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        AppError::Prompt(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
