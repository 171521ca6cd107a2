//! CLI argument definitions using clap derive macros.

use clap::{Args, Parser, Subcommand};
use pingtrail_core::types::{Coordinates, PingId};

/// pingtrail - location pings and reply chains
#[derive(Parser, Debug)]
#[command(name = "pingtrail")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and show who you are
    Login {
        /// Code name (defaults to config or prompt)
        #[arg(short, long)]
        code_name: Option<String>,

        /// Store the code name in the config file
        #[arg(long)]
        remember: bool,
    },

    /// Show authentication status
    Status,

    /// Forget the saved session
    Logout,

    /// Show every visible ping grouped into reply chains
    Pings {
        /// Expand the chain holding this ping (repeatable)
        #[arg(short, long = "activate", value_name = "PING_ID")]
        activate: Vec<PingId>,

        /// Output chains as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show your latest pings
    Latest,

    /// Broadcast a ping
    Send {
        #[command(flatten)]
        position: PositionArgs,

        /// Ping being replied to
        #[arg(short, long, value_name = "PING_ID")]
        parent: Option<PingId>,
    },

    /// Respond to a ping, extending its chain
    Respond {
        /// Ping to respond to
        ping_id: PingId,

        #[command(flatten)]
        position: PositionArgs,
    },

    /// Show version
    Version,
}

/// Explicit position; a simulated one is used when omitted.
#[derive(Args, Debug, Default)]
pub struct PositionArgs {
    /// Latitude in decimal degrees
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

impl PositionArgs {
    pub fn coordinates(&self) -> pingtrail_core::Result<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
            _ => Ok(Coordinates::random()),
        }
    }
}
