use anyhow::{Context, Result};
use dialoguer::{Confirm, Select};

/// Presents choices and returns what the user picked.
pub trait Prompter {
    /// Index into `items`, or `None` when the user backs out.
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>>;

    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Terminal prompts through dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        Select::new()
            .with_prompt(prompt)
            .items(&items.iter().map(String::as_str).collect::<Vec<_>>())
            .default(0)
            .interact_opt()
            .context("Failed to show selection dialog")
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .context("Failed to show confirmation dialog")
    }
}
