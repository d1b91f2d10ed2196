///! Authentication commands

use crate::api::{self, ApiClient};
use crate::config::Config;
use crate::output;
use anyhow::Result;
use campus_admin_common::auth::{
    registration_failure_message, LoginRequest, RegisterRequest, TokenResponse, LOGIN_FAILED,
};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Log in as an administrator
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will be prompted if not provided)
        #[arg(short, long)]
        password: Option<String>,

        /// Name recorded as the author of rule updates
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Register a new administrator account
    Register {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will be prompted if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Logout (clear stored credentials)
    Logout,

    /// Show current authentication status
    Status,
}

/// Exchange credentials for a token and put it in the session
pub async fn login(api: &ApiClient, email: &str, password: &str) -> api::Result<()> {
    let request = LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    };

    let response: TokenResponse = api.post("/admins/login", &request).await?;
    api.session().set(response.access_token).await;
    Ok(())
}

/// Create an administrator account; the error is the message to show
pub async fn register(api: &ApiClient, request: &RegisterRequest) -> Result<(), &'static str> {
    match api.post::<serde_json::Value, _>("/admins", request).await {
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::error!(error = %e, email = %request.email, "registration rejected");
            Err(registration_failure_message(e.status()))
        }
    }
}

fn prompt_password(password: Option<String>, confirm: bool) -> Result<String> {
    if let Some(pwd) = password {
        return Ok(pwd);
    }

    use dialoguer::Password;
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}

pub async fn handle_auth_command(
    command: AuthCommands,
    api: &ApiClient,
    config: &mut Config,
    config_path: &Path,
) -> Result<()> {
    match command {
        AuthCommands::Login {
            email,
            password,
            name,
        } => {
            let password = prompt_password(password, false)?;

            let spinner = output::spinner("Logging in...");
            let result = login(api, &email, &password).await;
            spinner.finish_and_clear();

            if let Err(e) = result {
                tracing::error!(error = %e, %email, "login failed");
                anyhow::bail!(LOGIN_FAILED);
            }

            if name.is_some() {
                config.admin_name = name;
            }
            api.session().persist(config, config_path).await?;

            output::print_success("Login successful");
            if let Some(name) = &config.admin_name {
                println!("  Admin name: {}", name);
            }
        }

        AuthCommands::Register {
            username,
            email,
            password,
        } => {
            let password = prompt_password(password, true)?;
            let request = RegisterRequest {
                username: username.clone(),
                email: email.clone(),
                password,
            };

            let spinner = output::spinner("Registering...");
            let result = register(api, &request).await;
            spinner.finish_and_clear();

            if let Err(message) = result {
                anyhow::bail!(message);
            }

            config.admin_name = Some(username);
            config.save_to(config_path)?;

            output::print_success("Registration successful");
            println!("  Log in with: campus-admin auth login --email {}", email);
        }

        AuthCommands::Logout => {
            api.session().clear().await;
            api.session().persist(config, config_path).await?;

            output::print_success("Logged out successfully");
        }

        AuthCommands::Status => {
            if let Some(token) = api.session().token().await {
                println!("Authenticated against {}", api.base_url());
                println!("Token: {}...", token.chars().take(20).collect::<String>());
                match &config.admin_name {
                    Some(name) => println!("Admin name: {}", name),
                    None => println!("No admin name stored"),
                }
            } else {
                println!("Not authenticated");
                println!("Use 'campus-admin auth login' to authenticate");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::testing::StubBackend;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let backend = StubBackend::spawn(Router::new().route(
            "/admins",
            post(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({"detail": "Email already registered"})),
                )
            }),
        ))
        .await;
        let api = ApiClient::new(&backend.base_url, Session::default());

        let err = register(&api, &register_request()).await.unwrap_err();

        assert_eq!(err, "Registration failed: Email already exists");
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_register_invalid_data() {
        let backend = StubBackend::spawn(Router::new().route(
            "/admins",
            post(|| async { StatusCode::BAD_REQUEST }),
        ))
        .await;
        let api = ApiClient::new(&backend.base_url, Session::default());

        let err = register(&api, &register_request()).await.unwrap_err();
        assert_eq!(err, "Registration failed: Invalid data");
    }

    #[tokio::test]
    async fn test_register_success_sends_payload() {
        let backend = StubBackend::spawn(Router::new().route(
            "/admins",
            post(|| async {
                (
                    StatusCode::CREATED,
                    Json(json!({"id": "a1", "username": "admin", "email": "admin@example.com"})),
                )
            }),
        ))
        .await;
        let api = ApiClient::new(&backend.base_url, Session::default());

        register(&api, &register_request()).await.unwrap();

        let requests = backend.requests();
        assert_eq!(
            requests[0].body,
            Some(json!({"username": "admin", "email": "admin@example.com", "password": "secret1"}))
        );
        // registering does not log in
        assert!(api.session().token().await.is_none());
    }

    #[tokio::test]
    async fn test_login_failure_keeps_session_empty() {
        let backend = StubBackend::spawn(Router::new().route(
            "/admins/login",
            post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Invalid credentials"}))) }),
        ))
        .await;
        let api = ApiClient::new(&backend.base_url, Session::default());

        let err = login(&api, "admin@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(!api.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_login_and_logout_persist_token() {
        let backend = StubBackend::spawn(Router::new().route(
            "/admins/login",
            post(|| async { Json(json!({"access_token": "tok-1"})) }),
        ))
        .await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cli.toml");
        let mut config = Config::default();
        let api = ApiClient::new(&backend.base_url, Session::default());

        handle_auth_command(
            AuthCommands::Login {
                email: "admin@example.com".to_string(),
                password: Some("secret1".to_string()),
                name: Some("admin".to_string()),
            },
            &api,
            &mut config,
            &path,
        )
        .await
        .unwrap();

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.token.as_deref(), Some("tok-1"));
        assert_eq!(saved.admin_name.as_deref(), Some("admin"));

        handle_auth_command(AuthCommands::Logout, &api, &mut config, &path)
            .await
            .unwrap();
        assert!(Config::load_from(&path).unwrap().token.is_none());
        assert!(!api.session().is_authenticated().await);
    }
}
