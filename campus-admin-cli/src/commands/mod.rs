pub mod admins;
pub mod auth;
pub mod console;
pub mod metrics;
pub mod rules;
pub mod users;

use crate::api::ApiError;
use crate::output;

/// Result of a gated mutation, as seen by the view that issued it
#[derive(Debug)]
pub enum Outcome {
    Applied,
    Declined,
    Unchanged,
    Invalid(String),
    Failed(ApiError),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    /// Print the outcome without failing; the interactive console keeps going
    pub fn report(&self, success: &str) {
        match self {
            Outcome::Applied => output::print_success(success),
            Outcome::Declined => output::print_info("Cancelled, nothing changed"),
            Outcome::Unchanged => output::print_info("Nothing to change"),
            Outcome::Invalid(message) => output::print_error(message),
            Outcome::Failed(e) => output::print_error(&failure_text(e)),
        }
    }

    /// One-shot commands exit with an error when the mutation did not go through
    pub fn into_result(self, success: &str) -> anyhow::Result<()> {
        match self {
            Outcome::Invalid(message) => anyhow::bail!(message),
            Outcome::Failed(e) => anyhow::bail!(failure_text(&e)),
            other => {
                other.report(success);
                Ok(())
            }
        }
    }
}

/// User-facing text for a failed call
pub fn failure_text(e: &ApiError) -> String {
    if e.is_unauthorized() {
        format!("{} (run 'campus-admin auth login' first)", e)
    } else {
        e.to_string()
    }
}
