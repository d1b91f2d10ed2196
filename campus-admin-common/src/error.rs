//! Error types for client-side form handling

use thiserror::Error;

/// Form submission blocked before any request is made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in the required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Role string that is neither STUDENT nor ASSISTANT
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown course role '{0}' (expected STUDENT or ASSISTANT)")]
pub struct ParseRoleError(pub String);
