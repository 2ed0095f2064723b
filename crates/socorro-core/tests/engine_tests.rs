mod common;

use common::create_test_engine;
use socorro_core::{
    params::{AdvanceStep, FinalizeTicket, Id, ListTickets, OpenTicket, RenewProviderWait},
    StepStatus, TicketStatus, WorkflowError,
};

fn towing_params(title: &str) -> OpenTicket {
    OpenTicket {
        title: title.to_string(),
        description: None,
        category: "towing".to_string(),
        insurer_reference: None,
    }
}

#[tokio::test]
async fn test_open_ticket_starts_workflow() {
    let (_temp_dir, engine) = create_test_engine().await;

    let ticket = engine
        .open_ticket(&towing_params("Engine fire on the shoulder"))
        .await
        .expect("Failed to open ticket");

    assert_eq!(ticket.current_step, 2);
    assert_eq!(ticket.steps.len(), 7);
    assert_eq!(ticket.steps[1].status, StepStatus::InProgress);
}

#[tokio::test]
async fn test_open_ticket_rejects_unknown_category() {
    let (_temp_dir, engine) = create_test_engine().await;

    let err = engine
        .open_ticket(&OpenTicket {
            title: "Bad category".to_string(),
            description: None,
            category: "airlift".to_string(),
            insurer_reference: None,
        })
        .await
        .expect_err("Unknown category should be rejected");
    assert!(matches!(err, WorkflowError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_get_steps_display_wrapper() {
    let (_temp_dir, engine) = create_test_engine().await;

    let ticket = engine
        .open_ticket(&towing_params("Blown tire"))
        .await
        .expect("Failed to open ticket");

    let steps = engine
        .get_steps(&Id { id: ticket.id })
        .await
        .expect("Failed to get steps");
    assert_eq!(steps.len(), 7);

    let output = format!("{}", steps);
    assert!(output.contains("Awaiting insurer ticket opening"));
    assert!(output.contains("➤ In Progress"));
}

#[tokio::test]
async fn test_advance_and_renew_through_engine() {
    let (_temp_dir, engine) = create_test_engine().await;

    let ticket = engine
        .open_ticket(&towing_params("Slid off the road"))
        .await
        .expect("Failed to open ticket");

    let advancement = engine
        .advance_step(&AdvanceStep {
            ticket_id: ticket.id,
            step_number: 2,
            insurer_reference: Some("INS-42".to_string()),
            travel_minutes: None,
            notes: None,
        })
        .await
        .expect("Failed to advance step 2");
    assert_eq!(advancement.ticket_status, TicketStatus::InProgress);

    let renewed = engine
        .renew_provider_wait(&RenewProviderWait {
            ticket_id: ticket.id,
            note: "Provider dispatch pending".to_string(),
        })
        .await
        .expect("Failed to renew deadline");
    assert!(renewed
        .notes
        .expect("Note expected")
        .contains("Provider dispatch pending"));
}

#[tokio::test]
async fn test_finalize_and_listing() {
    let (_temp_dir, engine) = create_test_engine().await;

    let first = engine
        .open_ticket(&towing_params("Ticket to close"))
        .await
        .expect("Failed to open ticket");
    engine
        .open_ticket(&towing_params("Ticket to keep"))
        .await
        .expect("Failed to open ticket");

    let finalized = engine
        .finalize_ticket(&FinalizeTicket {
            ticket_id: first.id,
            final_notes: Some("Delivered".to_string()),
        })
        .await
        .expect("Failed to finalize ticket");
    assert_eq!(finalized.status, TicketStatus::Finalized);

    let open_only = engine
        .list_tickets(&ListTickets::default())
        .await
        .expect("Failed to list tickets");
    assert_eq!(open_only.len(), 1);

    let all = engine
        .list_tickets(&ListTickets {
            include_finalized: true,
        })
        .await
        .expect("Failed to list all tickets");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_sweep_with_no_late_steps() {
    let (_temp_dir, engine) = create_test_engine().await;

    engine
        .open_ticket(&towing_params("Fresh ticket"))
        .await
        .expect("Failed to open ticket");

    let late = engine
        .sweep_late_steps()
        .await
        .expect("Sweep should succeed");
    assert!(late.is_empty());
}
