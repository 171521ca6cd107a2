//! pingtrail - broadcast pings and follow reply chains from the terminal.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;
mod config;
mod credential;
mod error;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("pingtrail=info".parse()?))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = config::Config::load()?;

    // Execute command
    match cli.command {
        Commands::Login {
            code_name,
            remember,
        } => commands::auth::login(code_name, remember, &config).await,
        Commands::Status => commands::auth::status(&config).await,
        Commands::Logout => commands::auth::logout(&config).await,
        Commands::Pings { activate, json } => {
            commands::pings::list(&activate, json, &config).await
        }
        Commands::Latest => commands::pings::latest(&config).await,
        Commands::Send { position, parent } => {
            commands::pings::send(position, parent, &config).await
        }
        Commands::Respond { ping_id, position } => {
            commands::pings::respond(ping_id, position, &config).await
        }
        Commands::Version => {
            println!("pingtrail {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
