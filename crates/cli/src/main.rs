//! Inkpress CLI - Database migrations and team management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! inkpress-cli migrate
//!
//! # Create a team invite (prints the acceptance link)
//! inkpress-cli invite create -e admin@example.com -n "Admin Name" -r admin
//!
//! # Remove expired, never-accepted invites
//! inkpress-cli invite cleanup
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `invite create` - Create team invites
//! - `invite cleanup` - Delete expired invites

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "inkpress-cli")]
#[command(author, version, about = "Inkpress CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage team invites
    Invite {
        #[command(subcommand)]
        action: InviteAction,
    },
}

#[derive(Subcommand)]
enum InviteAction {
    /// Create a new team invite
    Create {
        /// Invitee email address
        #[arg(short, long)]
        email: String,

        /// Invitee display name
        #[arg(short, long)]
        name: String,

        /// Role to assign on acceptance (`admin` or `team-member`)
        #[arg(short, long, default_value = "team-member")]
        role: String,
    },
    /// Delete expired, never-accepted invites
    Cleanup,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Invite { action } => match action {
            InviteAction::Create { email, name, role } => {
                commands::invite::create(&email, &name, &role).await?;
            }
            InviteAction::Cleanup => commands::invite::cleanup().await?,
        },
    }
    Ok(())
}
