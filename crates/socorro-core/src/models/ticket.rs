//! Ticket model definition and protocol generation.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{StepInstance, TicketCategory, TicketStatus};

/// Represents a roadside-assistance service ticket.
///
/// The workflow engine owns only `current_step`, `status` and `completed_at`;
/// everything else is descriptive intake data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    /// Unique identifier for the ticket
    pub id: u64,

    /// External protocol code shown to operators and insurers
    pub protocol: String,

    /// Brief title/summary of the ticket
    pub title: String,

    /// Detailed multi-line description of the occurrence
    pub description: Option<String>,

    /// Service category; towing tickets carry the staged workflow
    pub category: TicketCategory,

    /// Coarse ticket status, projected from workflow transitions
    #[serde(default)]
    pub status: TicketStatus,

    /// Active workflow step number mirrored from the step instances
    pub current_step: u32,

    /// Insurer protocol reference mirrored from step 2
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurer_reference: Option<String>,

    /// Timestamp when the ticket was opened (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the ticket was finalized (UTC)
    pub completed_at: Option<Timestamp>,

    /// Associated workflow steps, in step order (empty for non-towing tickets)
    #[serde(default)]
    pub steps: Vec<StepInstance>,
}

/// Generates a ticket protocol code: `CH` + uppercase base-36 of the unix
/// millisecond timestamp + a base-36 entropy suffix from the subsecond nanos.
pub fn generate_protocol(now: Timestamp) -> String {
    let millis = now.as_millisecond().max(0) as u64;
    let nanos = now.subsec_nanosecond().max(0) as u64;
    format!(
        "CH{}{}",
        to_base36(millis),
        &format!("{:0>4}", to_base36(nanos))[..4]
    )
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_format() {
        let protocol = generate_protocol(Timestamp::now());
        assert!(protocol.starts_with("CH"));
        assert!(protocol.len() > 6);
        assert!(protocol
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_base36_roundtrip_digits() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
    }
}
