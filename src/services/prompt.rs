use crate::error::AppResult;

/// Validators return the message shown before asking again.
pub type Validator<'a> = &'a dyn Fn(&str) -> Result<(), String>;

/// One question at a time on the terminal.
pub trait Prompter: Send + Sync {
    /// Returns the index of the chosen item.
    fn select(&self, prompt: &str, items: &[String], default: usize) -> AppResult<usize>;
    /// Asks until `validate` accepts the answer.
    fn input(&self, prompt: &str, default: Option<&str>, validate: Validator<'_>)
    -> AppResult<String>;
    fn confirm(&self, prompt: &str) -> AppResult<bool>;
}

pub fn accept_any(_: &str) -> Result<(), String> {
    Ok(())
}
