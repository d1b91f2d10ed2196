///! Campus Admin CLI
///!
///! Administrative console for the campus platform backend

mod api;
mod commands;
mod config;
mod confirm;
mod output;
mod session;
#[cfg(test)]
mod testing;

use anyhow::Result;
use campus_admin_common::CourseRole;
use clap::{Parser, Subcommand};
use commands::auth::AuthCommands;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "campus-admin", author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Backend address (defaults to the configured server)
    #[arg(short, long, env = "CAMPUS_ADMIN_URL")]
    server: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long)]
    output: Option<String>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Log requests to stderr (overridden by RUST_LOG)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authentication commands
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Manage user accounts and course roles
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage administrator accounts
    Admins {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Manage rules
    Rules {
        #[command(subcommand)]
        command: RuleCommands,
    },
    /// Print backend metrics (Prometheus text format)
    Metrics {
        /// Only show metric families starting with this prefix
        #[arg(short, long)]
        prefix: Option<String>,
    },
    /// Interactive console over users and rules
    Console,
    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List users with their course enrollments
    List,
    /// Block a user account
    Block { uuid: String },
    /// Unblock a user account
    Unblock { uuid: String },
    /// Change a user's role in one course
    SetRole {
        /// User UUID
        uuid: String,
        /// Course ID
        #[arg(short, long)]
        course: String,
        /// New role (student, assistant)
        #[arg(short, long)]
        role: CourseRole,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// List administrators
    List,
    /// Show one administrator
    Show { id: String },
    /// Delete an administrator
    Delete { id: String },
}

#[derive(Subcommand)]
enum RuleCommands {
    /// List rules
    List,
    /// Show rule details
    Show { id: String },
    /// Create a rule
    Create {
        /// Rule title
        #[arg(short, long)]
        title: String,
        /// Rule description
        #[arg(short, long)]
        description: String,
        /// Effective date (YYYY-MM-DD)
        #[arg(short, long)]
        effective_date: String,
        /// Applicable conditions (comma-separated)
        #[arg(short, long)]
        conditions: Option<String>,
    },
    /// Edit a rule; fields not given keep their current value
    Edit {
        /// Rule ID
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        effective_date: Option<String>,
        /// Applicable conditions (comma-separated)
        #[arg(short, long)]
        conditions: Option<String>,
    },
}

/// Name sent as `admin_name` with rule updates when none is stored
const DEFAULT_ADMIN_NAME: &str = "admin";

/// Filter used when `RUST_LOG` is not set; any `-v` shows request logs
fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        _ => "debug",
    }
}

fn init_logging(verbose: u8) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level(verbose).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load config
    let config_path = config::Config::config_path()?;
    let mut config = config::Config::load_from(&config_path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config");
        config::Config::default()
    });

    let server = config.resolve_server(cli.server.as_deref());
    let format = output::OutputFormat::from_name(cli.output.as_deref().unwrap_or(&config.default_output));
    let admin_name = config
        .admin_name
        .clone()
        .unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string());

    // Initialize API client with the persisted session
    let api_client = api::ApiClient::new(&server, session::Session::from_config(&config));
    tracing::debug!(%server, "using backend");
    if !api_client.session().is_authenticated().await {
        tracing::debug!("no session token; requests are sent without Authorization");
    }

    let confirm: Box<dyn confirm::Confirm> = if cli.yes {
        Box::new(confirm::AutoAnswer(true))
    } else {
        Box::new(confirm::Prompt)
    };

    // Execute command
    match cli.command {
        Commands::Auth { command } => {
            commands::auth::handle_auth_command(command, &api_client, &mut config, &config_path).await?
        }
        Commands::Users { command } => {
            commands::users::handle_user_command(command, &api_client, format, confirm.as_ref()).await?
        }
        Commands::Admins { command } => {
            commands::admins::handle_admin_command(command, &api_client, format, confirm.as_ref()).await?
        }
        Commands::Rules { command } => {
            commands::rules::handle_rule_command(command, &api_client, format, &admin_name).await?
        }
        Commands::Metrics { prefix } => {
            commands::metrics::handle_metrics_command(&api_client, prefix).await?
        }
        Commands::Console => {
            commands::console::run_console(&api_client, confirm.as_ref(), &admin_name).await?
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

/// Generate shell completions
fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(0), "warn");
        assert_eq!(default_level(1), "debug");
        assert_eq!(default_level(3), "debug");

        let cli = Cli::parse_from(["campus-admin", "-v", "users", "list"]);
        assert_eq!(default_level(cli.verbose), "debug");
    }

    #[test]
    fn test_parse_set_role() {
        let cli = Cli::parse_from([
            "campus-admin",
            "--yes",
            "users",
            "set-role",
            "u1",
            "--course",
            "c1",
            "--role",
            "assistant",
        ]);

        assert!(cli.yes);
        match cli.command {
            Commands::Users {
                command: UserCommands::SetRole { uuid, course, role },
            } => {
                assert_eq!(uuid, "u1");
                assert_eq!(course, "c1");
                assert_eq!(role, CourseRole::Assistant);
            }
            _ => panic!("expected users set-role"),
        }
    }

    #[test]
    fn test_parse_rule_edit() {
        let cli = Cli::parse_from(["campus-admin", "rules", "edit", "r1", "--title", "New"]);
        match cli.command {
            Commands::Rules {
                command: RuleCommands::Edit { id, title, description, .. },
            } => {
                assert_eq!(id, "r1");
                assert_eq!(title.as_deref(), Some("New"));
                assert!(description.is_none());
            }
            _ => panic!("expected rules edit"),
        }
    }
}
