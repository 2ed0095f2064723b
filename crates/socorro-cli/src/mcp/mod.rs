//! MCP server implementation for Socorro
//!
//! This module implements the Model Context Protocol server for Socorro,
//! providing a standardized interface for AI models to manage service tickets
//! and their towing workflow.

use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use socorro_core::WorkflowEngine;
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};

pub mod errors;
pub mod handlers;

pub use errors::to_mcp_error;
// Re-export parameter types and result type from handlers for external use
pub use handlers::{
    AdvanceStep, FinalizeTicket, Id, ListTickets, McpResult, OpenTicket, RenewProviderWait,
    UpdateInsurerReference, UpdateTravelTime,
};

/// MCP server for Socorro
#[derive(Clone)]
pub struct SocorroMcpServer {
    engine: Arc<Mutex<WorkflowEngine>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SocorroMcpServer {
    /// Create a new Socorro MCP server
    pub fn new(engine: WorkflowEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            tool_router: Self::tool_router(),
        }
    }

    // Tool methods that delegate to handlers::McpHandlers methods
    #[tool(
        name = "open_ticket",
        description = "Open a new roadside-assistance service ticket. Provide a clear title (required), optional description, category ('towing', 'windshield', or 'standard'; default 'towing'), and optional insurer reference if already known. Towing tickets start their seven-step workflow immediately: intake is completed and the ticket begins awaiting the insurer ticket opening with a 15-minute deadline."
    )]
    async fn open_ticket(&self, params: Parameters<OpenTicket>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.engine.clone());
        handlers.open_ticket(params).await
    }

    #[tool(
        name = "list_tickets",
        description = "List service tickets as summaries with progress counts. Use include_finalized=false (default) for open work, or include_finalized=true to also see closed tickets. Returns formatted list with IDs, protocols, categories, statuses, and step progress."
    )]
    async fn list_tickets(&self, params: Parameters<ListTickets>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.engine.clone());
        handlers.list_tickets(params).await
    }

    #[tool(
        name = "show_ticket",
        description = "Display complete details of a specific ticket including its protocol, status, insurer reference, and every workflow step with deadlines and notes. Use the ticket ID to retrieve."
    )]
    async fn show_ticket(&self, params: Parameters<Id>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.engine.clone());
        handlers.show_ticket(params).await
    }

    #[tool(
        name = "list_steps",
        description = "List the workflow steps of a ticket with their status (pending/in_progress/completed/late), deadlines, and notes. Use the ticket ID to retrieve. Useful for checking which step is active and whether it is past its SLA deadline."
    )]
    async fn list_steps(&self, params: Parameters<Id>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.engine.clone());
        handlers.list_steps(params).await
    }

    #[tool(
        name = "initialize_workflow",
        description = "Attach the seven-step towing workflow to an existing ticket that does not have one yet. Intake is recorded as completed and the insurer-opening step activates with a 15-minute deadline. Fails if the ticket already has workflow steps."
    )]
    async fn initialize_workflow(&self, params: Parameters<Id>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.engine.clone());
        handlers.initialize_workflow(params).await
    }

    #[tool(
        name = "advance_step",
        description = "Complete the active workflow step and activate its successor. Provide ticket_id and step_number. Completing step 2 requires insurer_reference (here or stored earlier). Optionally record notes on the completed step and travel_minutes to set the transport step's deadline. The final delivery step is closed by finalize_ticket, not by advancing."
    )]
    async fn advance_step(&self, params: Parameters<AdvanceStep>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.engine.clone());
        handlers.advance_step(params).await
    }

    #[tool(
        name = "renew_provider_wait",
        description = "Grant the provider-search step (step 3) a fresh 15-minute deadline and append a timestamped note explaining the renewal. Use when the insurer is still locating a service provider. The step must be the active one; a late step returns to in_progress."
    )]
    async fn renew_provider_wait(&self, params: Parameters<RenewProviderWait>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.engine.clone());
        handlers.renew_provider_wait(params).await
    }

    #[tool(
        name = "update_insurer_reference",
        description = "Store the insurer reference number on a ticket ahead of time. The reference is recorded on the insurer-opening step and mirrored to the ticket, satisfying the requirement when that step is later advanced."
    )]
    async fn update_insurer_reference(
        &self,
        params: Parameters<UpdateInsurerReference>,
    ) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.engine.clone());
        handlers.update_insurer_reference(params).await
    }

    #[tool(
        name = "update_travel_time",
        description = "Store a manual travel estimate in minutes for the transport step (step 6). If the step is already active its deadline is recomputed from now; otherwise the estimate is used when the step activates. Minutes must be greater than zero."
    )]
    async fn update_travel_time(&self, params: Parameters<UpdateTravelTime>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.engine.clone());
        handlers.update_travel_time(params).await
    }

    #[tool(
        name = "finalize_ticket",
        description = "Close a ticket by completing its delivery step. Optionally record final_notes on the delivery step; finalizing again overwrites them with the latest value. The ticket status becomes finalized and it leaves the default listing."
    )]
    async fn finalize_ticket(&self, params: Parameters<FinalizeTicket>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.engine.clone());
        handlers.finalize_ticket(params).await
    }

    #[tool(
        name = "sweep_late_steps",
        description = "Scan all in-progress workflow steps and mark those past their SLA deadline as late. Returns the steps that just became late, or a confirmation when none were overdue. Late steps remain advanceable and renewable."
    )]
    async fn sweep_late_steps(&self) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.engine.clone());
        handlers.sweep_late_steps().await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for SocorroMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "socorro".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(r#"Socorro is a roadside-assistance ticketing system. Towing tickets move through a fixed seven-step workflow with SLA deadlines, from intake to vehicle delivery.

## Core Concepts
- **Tickets**: Service requests with a title, category (towing/windshield/standard), protocol number, and optional insurer reference
- **Workflow Steps**: The seven towing steps: 1. Information entry, 2. Awaiting insurer ticket opening (15 min), 3. Ticket opened - awaiting provider (30 min), 4. In progress - provider located (60 min), 5. Provider at origin location (30 min), 6. Vehicle en route to destination (travel estimate), 7. Vehicle delivered
- **Deadlines**: Active steps carry an SLA deadline; sweep_late_steps marks overdue steps as late. Late steps can still be advanced or renewed.

## Workflow Examples

### Handling a New Towing Request
1. Open a ticket with `open_ticket` - the workflow starts immediately at step 2
2. When the insurer opens their ticket, advance step 2 with the insurer reference
3. If the provider search stalls, use `renew_provider_wait` to grant 15 more minutes with a note
4. Before the transport leg, store the travel estimate with `update_travel_time`
5. When the vehicle is delivered, close the ticket with `finalize_ticket`

### Tracking Progress
1. Use `list_tickets` to see open work and step progress
2. Use `show_ticket` or `list_steps` to inspect a ticket's workflow state
3. Run `sweep_late_steps` periodically to surface steps past their deadline

## Tool Categories
- **Ticket Management**: open_ticket, list_tickets, show_ticket, finalize_ticket
- **Workflow Management**: list_steps, initialize_workflow, advance_step, renew_provider_wait, update_insurer_reference, update_travel_time, sweep_late_steps"#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: SocorroMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Socorro MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    // Set up signal handlers for graceful shutdown
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
