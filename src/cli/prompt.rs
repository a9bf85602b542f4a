//! Interactive prompts and progress feedback.

use crate::error::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Asks the user for input. Only consulted when the session is interactive.
pub trait Prompter {
    /// Free-form text input; empty answers are not accepted.
    fn input(&self, prompt: &str) -> Result<String>;

    /// Yes/no question defaulting to "no".
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Terminal prompts rendered with `dialoguer`.
#[derive(Default)]
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for DialoguerPrompter {
    fn input(&self, prompt: &str) -> Result<String> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact_text()?;
        Ok(value.trim().to_string())
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(answer)
    }
}

/// Spinner on stderr while a request is in flight; hidden when `visible` is false.
pub fn spinner(visible: bool, message: impl Into<String>) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
