use dialoguer::{Confirm, Input, Select};

use crate::error::AppResult;
use crate::services::Prompter;
use crate::services::prompt::Validator;

/// Interactive prompts on the controlling terminal.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn select(&self, prompt: &str, items: &[String], default: usize) -> AppResult<usize> {
        let selection = Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()?;
        Ok(selection)
    }

    fn input(
        &self,
        prompt: &str,
        default: Option<&str>,
        validate: Validator<'_>,
    ) -> AppResult<String> {
        let mut input = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .validate_with(|value: &String| validate(value));
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn confirm(&self, prompt: &str) -> AppResult<bool> {
        Ok(Confirm::new().with_prompt(prompt).default(true).interact()?)
    }
}
