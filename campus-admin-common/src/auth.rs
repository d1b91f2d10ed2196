//! Authentication request/response types and failure messages

use serde::{Deserialize, Serialize};

/// Body of `POST /admins/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token returned by a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>, // "bearer"
}

/// Body of `POST /admins`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub const LOGIN_FAILED: &str = "Login failed: Invalid email or password";

/// Message shown when registration is rejected.
///
/// `status` is `None` when the request never produced an HTTP response.
pub fn registration_failure_message(status: Option<u16>) -> &'static str {
    match status {
        Some(400) => "Registration failed: Invalid data",
        Some(409) => "Registration failed: Email already exists",
        _ => "Registration failed: An unexpected error occurred",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_failure_messages() {
        assert_eq!(
            registration_failure_message(Some(400)),
            "Registration failed: Invalid data"
        );
        assert_eq!(
            registration_failure_message(Some(409)),
            "Registration failed: Email already exists"
        );
        assert_eq!(
            registration_failure_message(Some(500)),
            "Registration failed: An unexpected error occurred"
        );
        assert_eq!(
            registration_failure_message(None),
            "Registration failed: An unexpected error occurred"
        );
    }

    #[test]
    fn test_token_response_without_type() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(token.access_token, "abc");
        assert!(token.token_type.is_none());
    }
}
