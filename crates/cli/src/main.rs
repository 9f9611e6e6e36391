//! Lumina CLI - Database migrations and store management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! lumina-cli migrate
//!
//! # Insert the sample lighting catalogue (only into an empty table)
//! lumina-cli seed
//! lumina-cli seed --force
//!
//! # Create an admin account
//! lumina-cli user create -u admin -e admin@lumina.com -p 'long-password' --admin
//!
//! # Grant or revoke admin access
//! lumina-cli user promote alice
//! lumina-cli user demote alice
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lumina-cli")]
#[command(author, version, about = "Lumina storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Insert the sample product catalogue
    Seed {
        /// Insert even if products already exist
        #[arg(long)]
        force: bool,
    },
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (8-128 characters)
        #[arg(short, long)]
        password: String,

        /// Grant admin access
        #[arg(long)]
        admin: bool,
    },
    /// Grant admin access to an existing user
    Promote {
        /// Login name
        username: String,
    },
    /// Revoke admin access from a user
    Demote {
        /// Login name
        username: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { force } => commands::seed::run(force).await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                email,
                password,
                admin,
            } => commands::user::create(&username, &email, &password, admin).await?,
            UserAction::Promote { username } => {
                commands::user::set_admin(&username, true).await?;
            }
            UserAction::Demote { username } => {
                commands::user::set_admin(&username, false).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_user_create() {
        let cli = Cli::try_parse_from([
            "lumina-cli",
            "user",
            "create",
            "-u",
            "admin",
            "-e",
            "admin@lumina.com",
            "-p",
            "correct-horse",
            "--admin",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::User {
                action: UserAction::Create { admin: true, .. }
            })
        ));
    }

    #[test]
    fn test_parse_seed_force() {
        let cli = Cli::try_parse_from(["lumina-cli", "seed", "--force"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Seed { force: true })
        ));
    }
}
