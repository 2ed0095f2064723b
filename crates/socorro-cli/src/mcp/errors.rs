//! Error handling utilities for MCP server

use rmcp::ErrorData;
use socorro_core::WorkflowError;

/// Helper to convert workflow errors to MCP errors
pub fn to_mcp_error(message: &str, error: &WorkflowError) -> ErrorData {
    ErrorData::internal_error(format!("{}: {}", message, error), None)
}
