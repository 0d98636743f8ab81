//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};

#[derive(Debug, Parser)]
#[command(name = "taskdesk", version, about = "Role-based task management API")]
pub struct Cli {
    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Manage database migrations
    Migrate(MigrateArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "SERVER_HOST", default_value = DEFAULT_SERVER_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "SERVER_PORT", default_value_t = DEFAULT_SERVER_PORT)]
    pub port: u16,
}

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

#[derive(Debug, Subcommand)]
pub enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Roll back the most recent migration
    Down,
    /// Drop everything and re-apply all migrations
    Fresh,
    /// Show applied migrations
    Status,
}
