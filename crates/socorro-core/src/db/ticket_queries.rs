//! Ticket CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result, WorkflowError},
    models::{generate_protocol, Ticket, TicketCategory, TicketStatus, TicketSummary},
};

// Optimized SQL queries as const strings for compile-time optimization
const INSERT_TICKET_SQL: &str = "INSERT INTO tickets (protocol, title, description, category, status, current_step, insurer_reference, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
pub(super) const SELECT_TICKET_SQL: &str = "SELECT id, protocol, title, description, category, status, current_step, insurer_reference, created_at, completed_at FROM tickets WHERE id = ?1";

// Base queries for ticket listing
const TICKET_SUMMARY_COLUMNS: &str = "id, protocol, title, category, status, current_step, created_at, total_steps, completed_steps, late_steps";
const TICKET_SUMMARIES_VIEW: &str = "ticket_summaries";
const ALL_TICKET_SUMMARIES_VIEW: &str = "all_ticket_summaries";

impl super::Database {
    /// Helper function to construct a Ticket from a database row.
    ///
    /// Expects the column order of `SELECT_TICKET_SQL`; steps are left empty
    /// for the caller to populate.
    pub(super) fn build_ticket_from_row(row: &rusqlite::Row) -> rusqlite::Result<Ticket> {
        let category_str: String = row.get(4)?;
        let category = category_str.parse::<TicketCategory>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                Type::Text,
                format!("Invalid category: {category_str}").into(),
            )
        })?;

        let status_str: String = row.get(5)?;
        let status = status_str.parse::<TicketStatus>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                Type::Text,
                format!("Invalid ticket status: {status_str}").into(),
            )
        })?;

        Ok(Ticket {
            id: row.get::<_, i64>(0)? as u64,
            protocol: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            category,
            status,
            current_step: row.get::<_, i64>(6)? as u32,
            insurer_reference: row.get(7)?,
            created_at: row.get::<_, String>(8)?.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e))
            })?,
            completed_at: row
                .get::<_, Option<String>>(9)?
                .map(|s| s.parse::<Timestamp>())
                .transpose()
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e))
                })?,
            steps: Vec::new(),
        })
    }

    /// Creates a new ticket. Towing tickets get their workflow steps seeded in
    /// the same transaction: all seven rows are created, step 1 is completed
    /// immediately (intake is done by definition) and step 2 is activated with
    /// its SLA deadline running.
    pub fn create_ticket(
        &mut self,
        title: &str,
        description: Option<&str>,
        category: TicketCategory,
        insurer_reference: Option<&str>,
    ) -> Result<Ticket> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now();
        let now_str = now.to_string();
        let protocol = generate_protocol(now);

        tx.execute(
            INSERT_TICKET_SQL,
            params![
                &protocol,
                title,
                description,
                category.as_str(),
                TicketStatus::Open.as_str(),
                0i64,
                insurer_reference,
                &now_str
            ],
        )
        .map_err(|e| WorkflowError::database_error("Failed to insert ticket", e))?;

        let id = tx.last_insert_rowid() as u64;

        let mut current_step = 0;
        let mut steps = Vec::new();
        if category.has_workflow() {
            steps = Self::seed_workflow_steps(&tx, &self.steps, id, now)?;
            current_step = 2;
        }

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Ticket {
            id,
            protocol,
            title: title.into(),
            description: description.map(String::from),
            category,
            status: TicketStatus::Open,
            current_step,
            insurer_reference: insurer_reference.map(String::from),
            created_at: now,
            completed_at: None,
            steps,
        })
    }

    /// Retrieves a ticket by its ID, with workflow steps eagerly loaded.
    pub fn get_ticket(&self, id: u64) -> Result<Option<Ticket>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_TICKET_SQL)
            .map_err(|e| WorkflowError::database_error("Failed to prepare query", e))?;

        let mut ticket = stmt
            .query_row(params![id as i64], Self::build_ticket_from_row)
            .optional()
            .map_err(|e| WorkflowError::database_error("Failed to query ticket", e))?;

        if let Some(ref mut ticket) = ticket {
            ticket.steps = self.get_steps(ticket.id)?;
        }

        Ok(ticket)
    }

    /// Lists ticket summaries, newest first. Finalized tickets are excluded
    /// unless requested.
    pub fn list_tickets(&self, include_finalized: bool) -> Result<Vec<TicketSummary>> {
        let view_name = if include_finalized {
            ALL_TICKET_SUMMARIES_VIEW
        } else {
            TICKET_SUMMARIES_VIEW
        };

        let query =
            format!("SELECT {TICKET_SUMMARY_COLUMNS} FROM {view_name} ORDER BY created_at DESC");

        let mut stmt = self
            .connection
            .prepare(&query)
            .map_err(|e| WorkflowError::database_error("Failed to prepare query", e))?;

        let summaries = stmt
            .query_map([], |row| {
                let category_str: String = row.get(3)?;
                let category = category_str.parse::<TicketCategory>().map_err(|_| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        Type::Text,
                        format!("Invalid category: {category_str}").into(),
                    )
                })?;

                let status_str: String = row.get(4)?;
                let status = status_str.parse::<TicketStatus>().map_err(|_| {
                    rusqlite::Error::FromSqlConversionFailure(
                        4,
                        Type::Text,
                        format!("Invalid ticket status: {status_str}").into(),
                    )
                })?;

                Ok(TicketSummary {
                    id: row.get::<_, i64>(0)? as u64,
                    protocol: row.get(1)?,
                    title: row.get(2)?,
                    category,
                    status,
                    current_step: row.get::<_, i64>(5)? as u32,
                    created_at: row.get::<_, String>(6)?.parse::<Timestamp>().map_err(
                        |e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)),
                    )?,
                    total_steps: row.get::<_, i64>(7)? as u32,
                    completed_steps: row.get::<_, i64>(8)? as u32,
                    late_steps: row.get::<_, i64>(9)? as u32,
                })
            })
            .map_err(|e| WorkflowError::database_error("Failed to query tickets", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| WorkflowError::database_error("Failed to fetch tickets", e))?;

        Ok(summaries)
    }
}
