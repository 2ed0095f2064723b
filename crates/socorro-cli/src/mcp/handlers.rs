//! MCP tool handlers implementation

use std::sync::Arc;

use log::debug;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;
use socorro_core::{
    display::{CreateResult, FinalizeResult, OperationStatus},
    params as core, WorkflowEngine,
};
use tokio::sync::Mutex;

use super::to_mcp_error;

/// Generic MCP wrapper for core parameter types with serde integration
///
/// Wraps any core parameter type in a transparent serde container, adding the
/// MCP-specific derives (Deserialize, JsonSchema) while keeping the core types
/// clean of framework dependencies. The #[serde(transparent)] attribute passes
/// deserialization straight through to the wrapped type.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

// Type aliases for cleaner usage in function signatures
pub type Id = McpParams<core::Id>;
pub type OpenTicket = McpParams<core::OpenTicket>;
pub type ListTickets = McpParams<core::ListTickets>;
pub type AdvanceStep = McpParams<core::AdvanceStep>;
pub type RenewProviderWait = McpParams<core::RenewProviderWait>;
pub type UpdateInsurerReference = McpParams<core::UpdateInsurerReference>;
pub type UpdateTravelTime = McpParams<core::UpdateTravelTime>;
pub type FinalizeTicket = McpParams<core::FinalizeTicket>;

pub type McpResult = Result<CallToolResult, ErrorData>;

/// Handler implementations for the MCP server
pub struct McpHandlers {
    engine: Arc<Mutex<WorkflowEngine>>,
}

impl McpHandlers {
    pub fn new(engine: Arc<Mutex<WorkflowEngine>>) -> Self {
        Self { engine }
    }

    pub async fn open_ticket(&self, Parameters(params): Parameters<OpenTicket>) -> McpResult {
        debug!("open_ticket: {:?}", params);

        let ticket = self
            .engine
            .lock()
            .await
            .open_ticket(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to open ticket", &e))?;

        let result = CreateResult::new(ticket);
        Ok(CallToolResult::success(vec![Content::text(
            result.to_string(),
        )]))
    }

    pub async fn list_tickets(&self, Parameters(params): Parameters<ListTickets>) -> McpResult {
        debug!("list_tickets: {:?}", params);

        let engine = self.engine.lock().await;
        let inner_params = params.as_ref();
        let summaries = engine
            .list_tickets(inner_params)
            .await
            .map_err(|e| to_mcp_error("Failed to list tickets", &e))?;

        let title = if summaries.is_empty() {
            if inner_params.include_finalized {
                "No tickets found"
            } else {
                "No open tickets found"
            }
        } else if inner_params.include_finalized {
            "All Tickets"
        } else {
            "Open Tickets"
        };

        let result = format!("# {}\n\n{}", title, summaries);
        Ok(CallToolResult::success(vec![Content::text(result)]))
    }

    pub async fn show_ticket(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_ticket: {:?}", params);

        let ticket = self
            .engine
            .lock()
            .await
            .get_ticket(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to get ticket", &e))?
            .ok_or_else(|| {
                ErrorData::internal_error(
                    format!("Ticket with ID {} not found", params.as_ref().id),
                    None,
                )
            })?;

        Ok(CallToolResult::success(vec![Content::text(
            ticket.to_string(),
        )]))
    }

    pub async fn list_steps(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("list_steps: {:?}", params);

        let steps = self
            .engine
            .lock()
            .await
            .get_steps(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to get steps", &e))?;

        let result = format!("# Workflow Steps\n\n{}", steps);
        Ok(CallToolResult::success(vec![Content::text(result)]))
    }

    pub async fn initialize_workflow(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("initialize_workflow: {:?}", params);

        let steps = self
            .engine
            .lock()
            .await
            .initialize_workflow(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to initialize workflow", &e))?;

        let result = format!("# Workflow Steps\n\n{}", steps);
        Ok(CallToolResult::success(vec![Content::text(result)]))
    }

    pub async fn advance_step(&self, Parameters(params): Parameters<AdvanceStep>) -> McpResult {
        debug!("advance_step: {:?}", params);

        let advancement = self
            .engine
            .lock()
            .await
            .advance_step(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to advance step", &e))?;

        Ok(CallToolResult::success(vec![Content::text(
            advancement.to_string(),
        )]))
    }

    pub async fn renew_provider_wait(
        &self,
        Parameters(params): Parameters<RenewProviderWait>,
    ) -> McpResult {
        debug!("renew_provider_wait: {:?}", params);

        let step = self
            .engine
            .lock()
            .await
            .renew_provider_wait(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to renew provider-wait deadline", &e))?;

        let status = OperationStatus::success(format!(
            "Renewed the provider-wait deadline for ticket {}.",
            step.ticket_id
        ));
        let result = format!("{}\n{}", status, step);
        Ok(CallToolResult::success(vec![Content::text(result)]))
    }

    pub async fn update_insurer_reference(
        &self,
        Parameters(params): Parameters<UpdateInsurerReference>,
    ) -> McpResult {
        debug!("update_insurer_reference: {:?}", params);

        let step = self
            .engine
            .lock()
            .await
            .update_insurer_reference(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to update insurer reference", &e))?;

        let result = OperationStatus::success(format!(
            "Stored insurer reference on ticket {}.",
            step.ticket_id
        ));
        Ok(CallToolResult::success(vec![Content::text(
            result.to_string(),
        )]))
    }

    pub async fn update_travel_time(
        &self,
        Parameters(params): Parameters<UpdateTravelTime>,
    ) -> McpResult {
        debug!("update_travel_time: {:?}", params);

        let step = self
            .engine
            .lock()
            .await
            .update_travel_time(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to update travel estimate", &e))?;

        let result = OperationStatus::success(format!(
            "Stored travel estimate of {} minutes on ticket {}.",
            step.manual_travel_minutes.unwrap_or_default(),
            step.ticket_id
        ));
        Ok(CallToolResult::success(vec![Content::text(
            result.to_string(),
        )]))
    }

    pub async fn finalize_ticket(
        &self,
        Parameters(params): Parameters<FinalizeTicket>,
    ) -> McpResult {
        debug!("finalize_ticket: {:?}", params);

        let ticket = self
            .engine
            .lock()
            .await
            .finalize_ticket(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to finalize ticket", &e))?;

        let result = FinalizeResult::new(ticket);
        Ok(CallToolResult::success(vec![Content::text(
            result.to_string(),
        )]))
    }

    pub async fn sweep_late_steps(&self) -> McpResult {
        debug!("sweep_late_steps");

        let late = self
            .engine
            .lock()
            .await
            .sweep_late_steps()
            .await
            .map_err(|e| to_mcp_error("Failed to sweep late steps", &e))?;

        let result = if late.is_empty() {
            OperationStatus::success("No steps past their deadline.".to_string()).to_string()
        } else {
            format!("# Newly Late Steps\n\n{}", late)
        };
        Ok(CallToolResult::success(vec![Content::text(result)]))
    }
}
