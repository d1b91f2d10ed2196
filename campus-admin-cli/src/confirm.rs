///! Yes/no gate placed in front of sensitive mutations

use anyhow::Result;

/// Confirmation service shared by every view.
///
/// Returning `false` means the caller must not perform the mutation.
pub trait Confirm {
    fn confirm(&self, title: &str, message: &str) -> Result<bool>;
}

/// Interactive terminal prompt
pub struct Prompt;

impl Confirm for Prompt {
    fn confirm(&self, title: &str, message: &str) -> Result<bool> {
        let answer = dialoguer::Confirm::new()
            .with_prompt(format!("{}: {}", title, message))
            .default(false)
            .interact()?;
        Ok(answer)
    }
}

/// Fixed answer, used for `--yes` and in tests
pub struct AutoAnswer(pub bool);

impl Confirm for AutoAnswer {
    fn confirm(&self, title: &str, message: &str) -> Result<bool> {
        tracing::debug!(title, message, answer = self.0, "confirmation answered automatically");
        Ok(self.0)
    }
}
