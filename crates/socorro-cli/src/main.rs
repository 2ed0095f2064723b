//! Socorro CLI Application
//!
//! Command-line interface for the Socorro roadside-assistance ticket tracker.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, SocorroMcpServer};
use renderer::TerminalRenderer;
use socorro_core::{params::ListTickets, WorkflowEngineBuilder};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args { database_file, no_color, command } = Args::parse();

    let engine = WorkflowEngineBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize workflow engine")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Socorro started");

    match command {
        Some(Ticket { command }) => {
            Cli::new(engine, renderer)
                .handle_ticket_command(command)
                .await
        }
        Some(Step { command }) => {
            Cli::new(engine, renderer)
                .handle_step_command(command)
                .await
        }
        Some(Sweep(args)) => Cli::new(engine, renderer).sweep(args).await,
        Some(Serve) => {
            info!("Starting Socorro MCP server");
            run_stdio_server(SocorroMcpServer::new(engine))
                .await
                .context("MCP server failed")
        }
        None => {
            Cli::new(engine, renderer)
                .list_tickets(&ListTickets {
                    include_finalized: false,
                })
                .await
        }
    }
}
