//! Greeter CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! greeter-cli migrate
//!
//! # Register one visit for each name
//! greeter-cli seed Alice Bob Alice
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Register visits through the visit service

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "greeter-cli")]
#[command(author, version, about = "Visitor greeter CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Register one visit per name, in order
    Seed {
        /// Visitor names
        #[arg(required = true)]
        names: Vec<String>,
    },
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
        Commands::Seed { names } => commands::seed::visits(&names).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_seed_requires_a_name() {
        assert!(Cli::try_parse_from(["greeter-cli", "seed"]).is_err());
        assert!(Cli::try_parse_from(["greeter-cli", "seed", "Alice", "Bob"]).is_ok());
    }
}
