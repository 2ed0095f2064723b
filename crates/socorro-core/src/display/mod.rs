//! Display formatting functions and result types.
//!
//! This module provides wrapper types for formatting collections and
//! operation results, enabling consistent markdown output across different
//! contexts (terminal rendering, MCP tool responses).
//!
//! Display implementations on the domain models themselves live in
//! [`models`]; this module adds the collection newtypes and result wrappers
//! around them.
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (TicketSummaries, Steps)
//! - [`results`]: Operation result types (CreateResult, FinalizeResult)
//! - [`status`]: Status and confirmation messages (OperationStatus)
//! - [`datetime`]: Date/time formatting utilities
//! - [`models`]: Display implementations for domain models

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

// Re-export commonly used types for convenience
pub use collections::{Steps, TicketSummaries};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, FinalizeResult};
pub use status::OperationStatus;
