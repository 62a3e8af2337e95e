//! Infrastructure implementations of the `Prompter` port.

use anyhow::{Context, Result};
use dialoguer::{Input, Password, Select};

use crate::application::ports::Prompter;
use crate::domain::InputError;

/// Terminal prompts via `dialoguer`.
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
            .context("setup selection")
    }

    fn input(&self, field: &'static str, prompt: &str, initial: Option<&str>) -> Result<String> {
        let mut question = Input::<String>::new().with_prompt(prompt).allow_empty(true);
        if let Some(initial) = initial {
            question = question.with_initial_text(initial);
        }
        question.interact_text().with_context(|| format!("reading {field}"))
    }

    fn password(&self, field: &'static str, prompt: &str) -> Result<String> {
        Password::new()
            .with_prompt(prompt)
            .interact()
            .with_context(|| format!("reading {field}"))
    }
}

/// Non-interactive answers (`--yes`, `CI`, `MOVPN_YES`).
///
/// Every question resolves to its default; a question without one is a
/// missing value.
pub struct DefaultsPrompter;

impl Prompter for DefaultsPrompter {
    fn select(&self, _prompt: &str, _items: &[&str], _default: usize) -> Result<usize> {
        Err(InputError::Missing("setup").into())
    }

    fn input(&self, field: &'static str, _prompt: &str, initial: Option<&str>) -> Result<String> {
        initial
            .map(str::to_string)
            .ok_or_else(|| InputError::Missing(field).into())
    }

    fn password(&self, field: &'static str, _prompt: &str) -> Result<String> {
        Err(InputError::Missing(field).into())
    }
}
