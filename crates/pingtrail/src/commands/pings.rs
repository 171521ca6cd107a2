//! Ping commands: list chains, latest pings, send and respond.

use anyhow::{Context, Result};
use colored::Colorize;
use pingtrail_core::guard::Route;
use pingtrail_core::types::PingId;
use pingtrail_core::PingStore;

use super::{connect, enter, render, with_spinner, Session};
use crate::cli::PositionArgs;
use crate::config::Config;

/// Sign in if needed and open the dashboard.
async fn dashboard(config: &Config) -> Result<Session> {
    let session = connect(config)?;
    enter(Route::Dashboard, &session, config).await?;
    Ok(session)
}

/// Wrap a failed store action with the message the store recorded.
fn failure(store: &PingStore, err: pingtrail_core::Error) -> anyhow::Error {
    let message = store.error().unwrap_or("Request failed").to_string();
    anyhow::Error::new(err).context(message)
}

/// Show every chain, expanding the ones holding `activate`
pub async fn list(activate: &[PingId], json: bool, config: &Config) -> Result<()> {
    let session = dashboard(config).await?;
    let mut store = PingStore::new();

    if let Err(e) = with_spinner("Fetching pings...", store.fetch_all_pings(&session)).await {
        return Err(failure(&store, e));
    }

    for &id in activate {
        store.activate_chain(id);
    }

    if json {
        let chains = store.chains();
        let out = serde_json::to_string_pretty(&chains).context("Failed to serialize chains")?;
        println!("{}", out);
        return Ok(());
    }

    render::chains(&store);
    Ok(())
}

/// Show the latest pings
pub async fn latest(config: &Config) -> Result<()> {
    let session = dashboard(config).await?;
    let mut store = PingStore::new();

    if let Err(e) = with_spinner("Fetching latest pings...", store.fetch_latest_pings(&session)).await {
        return Err(failure(&store, e));
    }

    println!("{}", "Latest pings".cyan().bold());
    println!("{}", "─".repeat(50));
    if store.latest_pings().is_empty() {
        println!("  {}", "No pings yet".dimmed());
    }
    for ping in store.latest_pings() {
        println!("  {}", render::ping_line(ping));
    }
    Ok(())
}

/// Broadcast a ping
pub async fn send(position: PositionArgs, parent: Option<PingId>, config: &Config) -> Result<()> {
    let coords = position.coordinates()?;
    let session = dashboard(config).await?;
    let mut store = PingStore::new();

    let ping = match with_spinner("Sending ping...", store.create_ping(&session, coords, parent)).await {
        Ok(ping) => ping,
        Err(e) => return Err(failure(&store, e)),
    };
    println!("{} Ping {} sent", "✓".green(), format!("#{}", ping.id).cyan());

    // The new ping only shows up in chains after a full refetch.
    if with_spinner("Refreshing pings...", store.fetch_all_pings(&session))
        .await
        .is_ok()
    {
        store.set_active_ping(Some(ping.id));
        store.activate_chain(ping.id);
        render::active_chains(&store);
    }
    Ok(())
}

/// Respond to a ping and show the resulting chain
pub async fn respond(ping_id: PingId, position: PositionArgs, config: &Config) -> Result<()> {
    let coords = position.coordinates()?;
    let session = dashboard(config).await?;
    let mut store = PingStore::new();

    let reply = match with_spinner(
        "Responding...",
        store.respond_to_ping(&session, ping_id, coords),
    )
    .await
    {
        Ok(reply) => reply,
        Err(e) => return Err(failure(&store, e)),
    };

    println!(
        "{} Responded to {} with {}",
        "✓".green(),
        format!("#{}", ping_id).cyan(),
        format!("#{}", reply.id).cyan()
    );

    if let Some(error) = store.error() {
        println!("{} {}", "!".yellow(), error);
        return Ok(());
    }

    store.activate_chain(reply.id);
    render::active_chains(&store);
    Ok(())
}
