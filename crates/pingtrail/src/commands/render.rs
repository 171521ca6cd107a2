//! Terminal rendering for pings and chains.

use chrono::Local;
use colored::Colorize;
use pingtrail_core::{Chain, Ping, PingStore};

pub fn ping_line(ping: &Ping) -> String {
    let when = ping.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    format!(
        "{} {:>10.6}, {:>11.6}  {}  {}",
        format!("#{}", ping.id).cyan(),
        ping.latitude,
        ping.longitude,
        ping.user.display_name().bold(),
        when.to_string().dimmed()
    )
}

/// All chains; active chains are expanded, the rest show their newest ping.
pub fn chains(store: &PingStore) {
    let chains = store.chains();

    println!("{}", format!("Ping chains ({})", chains.len()).cyan().bold());
    println!("{}", "─".repeat(50));

    if chains.is_empty() {
        println!("  {}", "No pings yet".dimmed());
        return;
    }

    for (n, chain) in chains.iter().enumerate() {
        let Some(head) = chain.first() else { continue };
        let expanded = store.is_in_active_chain(head.id);
        let marker = if expanded { "▾".green() } else { "▸".normal() };
        println!("{} chain {} ({} pings)", marker, n + 1, chain.len());

        if expanded {
            print_chain(chain, store);
        } else if let Some(last) = chain.last() {
            println!("    {}", ping_line(last));
        }
    }
}

/// Only the active chains, fully expanded.
pub fn active_chains(store: &PingStore) {
    for chain in store.active_chains() {
        if chain.is_empty() {
            continue;
        }
        println!();
        print_chain(&chain, store);
    }
}

fn print_chain(chain: &Chain, store: &PingStore) {
    let active_id = store.active_ping().map(|p| p.id);
    for (depth, ping) in chain.iter().enumerate() {
        let branch = if depth == 0 { "●" } else { "└─" };
        let indent = "  ".repeat(depth.min(8));
        let line = ping_line(ping);
        if Some(ping.id) == active_id {
            println!("    {}{} {} {}", indent, branch, line, "← you".yellow());
        } else {
            println!("    {}{} {}", indent, branch, line);
        }
    }
}
