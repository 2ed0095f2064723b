use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{StepCommands, SweepArgs, TicketCommands};

/// Main command-line interface for the Socorro ticket tracker
///
/// Socorro tracks roadside-assistance service tickets. Towing tickets carry a
/// fixed seven-step workflow with SLA deadlines, from intake to vehicle
/// delivery. The CLI supports local operations as well as an MCP (Model
/// Context Protocol) server mode for integration with AI assistants.
#[derive(Parser)]
#[command(version, about, name = "socorro")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/socorro/socorro.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Socorro CLI
///
/// The CLI is organized into four main command categories:
/// - `ticket`: Operations on service tickets (open, list, show, finalize)
/// - `step`: Operations on a ticket's workflow steps
/// - `sweep`: Mark steps past their SLA deadline as late
/// - `serve`: Start the MCP server for AI assistant integration
#[derive(Subcommand)]
pub enum Commands {
    /// Manage service tickets
    #[command(alias = "t")]
    Ticket {
        #[command(subcommand)]
        command: TicketCommands,
    },
    /// Manage workflow steps within tickets
    #[command(alias = "s")]
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },
    /// Mark in-progress steps past their deadline as late
    Sweep(SweepArgs),
    /// Start the MCP server
    Serve,
}
