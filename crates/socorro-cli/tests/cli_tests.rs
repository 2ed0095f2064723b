use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color flag for testing
fn socorro_cmd() -> Command {
    let mut cmd = Command::cargo_bin("socorro").expect("Failed to find socorro binary");
    cmd.arg("--no-color");
    cmd
}

#[test]
fn test_cli_open_ticket_success() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    socorro_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "ticket",
            "open",
            "Flat tire on the interstate",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Opened ticket CH"))
        .stdout(predicate::str::contains("# 1. Flat tire on the interstate"))
        .stdout(predicate::str::contains("➤ In Progress"));
}

#[test]
fn test_cli_open_ticket_with_description() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    socorro_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "ticket",
            "open",
            "Dead battery downtown",
            "--description",
            "Customer stuck in a parking garage",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dead battery downtown"))
        .stdout(predicate::str::contains("Customer stuck in a parking garage"));
}

#[test]
fn test_cli_open_standard_ticket_has_no_workflow() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    socorro_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "ticket",
            "open",
            "Lost key replacement",
            "--category",
            "standard",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No workflow steps for this ticket."));
}

#[test]
fn test_cli_list_empty_tickets() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    socorro_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "ticket",
            "list",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No open tickets found"));
}

#[test]
fn test_cli_list_tickets_shows_progress() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    socorro_cmd()
        .args(["--database-file", db_arg, "ticket", "open", "Towing job"])
        .assert()
        .success();

    socorro_cmd()
        .args(["--database-file", db_arg, "ticket", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Open Tickets"))
        .stdout(predicate::str::contains("Towing job"))
        .stdout(predicate::str::contains("(1/7)"));
}

#[test]
fn test_cli_show_ticket() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    socorro_cmd()
        .args(["--database-file", db_arg, "ticket", "open", "Show me"])
        .assert()
        .success();

    socorro_cmd()
        .args(["--database-file", db_arg, "ticket", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# 1. Show me"))
        .stdout(predicate::str::contains("- Protocol: CH"))
        .stdout(predicate::str::contains("## Workflow"));
}

#[test]
fn test_cli_show_missing_ticket() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    socorro_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "ticket",
            "show",
            "999",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ticket with ID 999 not found"));
}

#[test]
fn test_cli_step_list() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    socorro_cmd()
        .args(["--database-file", db_arg, "ticket", "open", "Step listing"])
        .assert()
        .success();

    socorro_cmd()
        .args(["--database-file", db_arg, "step", "list", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Workflow Steps"))
        .stdout(predicate::str::contains("### 1. Information entry"))
        .stdout(predicate::str::contains(
            "### 2. Awaiting insurer ticket opening",
        ))
        .stdout(predicate::str::contains("### 7. Vehicle delivered"));
}

#[test]
fn test_cli_advance_requires_insurer_reference() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    socorro_cmd()
        .args(["--database-file", db_arg, "ticket", "open", "No reference"])
        .assert()
        .success();

    socorro_cmd()
        .args(["--database-file", db_arg, "step", "advance", "1", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("insurer_reference"));
}

#[test]
fn test_cli_advance_with_reference() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    socorro_cmd()
        .args(["--database-file", db_arg, "ticket", "open", "Advancing"])
        .assert()
        .success();

    socorro_cmd()
        .args([
            "--database-file",
            db_arg,
            "step",
            "advance",
            "1",
            "2",
            "--reference",
            "INS-1234",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed step 2"))
        .stdout(predicate::str::contains("Ticket opened - awaiting provider"));
}

#[test]
fn test_cli_set_reference_then_advance() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    socorro_cmd()
        .args(["--database-file", db_arg, "ticket", "open", "Stored ref"])
        .assert()
        .success();

    socorro_cmd()
        .args([
            "--database-file",
            db_arg,
            "step",
            "set-reference",
            "1",
            "INS-5678",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored insurer reference"));

    socorro_cmd()
        .args(["--database-file", db_arg, "step", "advance", "1", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed step 2"));
}

#[test]
fn test_cli_renew_provider_wait() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    socorro_cmd()
        .args(["--database-file", db_arg, "ticket", "open", "Slow insurer"])
        .assert()
        .success();
    socorro_cmd()
        .args([
            "--database-file",
            db_arg,
            "step",
            "advance",
            "1",
            "2",
            "--reference",
            "INS-9",
        ])
        .assert()
        .success();

    socorro_cmd()
        .args([
            "--database-file",
            db_arg,
            "step",
            "renew",
            "1",
            "Still searching for a provider",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Renewed the provider-wait deadline for step 3",
        ))
        .stdout(predicate::str::contains("Still searching for a provider"));
}

#[test]
fn test_cli_renew_requires_active_provider_wait() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    socorro_cmd()
        .args(["--database-file", db_arg, "ticket", "open", "Too early"])
        .assert()
        .success();

    socorro_cmd()
        .args(["--database-file", db_arg, "step", "renew", "1", "Nope"])
        .assert()
        .failure();
}

#[test]
fn test_cli_set_travel_estimate() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    socorro_cmd()
        .args(["--database-file", db_arg, "ticket", "open", "Long haul"])
        .assert()
        .success();

    socorro_cmd()
        .args(["--database-file", db_arg, "step", "set-travel", "1", "45"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Stored travel estimate of 45 minutes",
        ));
}

#[test]
fn test_cli_finalize_ticket_and_listing() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    socorro_cmd()
        .args(["--database-file", db_arg, "ticket", "open", "Close me"])
        .assert()
        .success();

    socorro_cmd()
        .args([
            "--database-file",
            db_arg,
            "ticket",
            "finalize",
            "1",
            "--notes",
            "Delivered to the body shop",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Finalized ticket 'Close me' (ID: 1)"))
        .stdout(predicate::str::contains("Delivered to the body shop"));

    socorro_cmd()
        .args(["--database-file", db_arg, "ticket", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No open tickets found"));

    socorro_cmd()
        .args(["--database-file", db_arg, "ticket", "list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# All Tickets"))
        .stdout(predicate::str::contains("Close me"));
}

#[test]
fn test_cli_initialize_workflow_on_standard_ticket() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    socorro_cmd()
        .args([
            "--database-file",
            db_arg,
            "ticket",
            "open",
            "Retrofit",
            "--category",
            "standard",
        ])
        .assert()
        .success();

    socorro_cmd()
        .args(["--database-file", db_arg, "step", "init", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Workflow Steps"))
        .stdout(predicate::str::contains("### 2. Awaiting insurer ticket opening"));
}

#[test]
fn test_cli_sweep_with_nothing_overdue() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    socorro_cmd()
        .args(["--database-file", db_arg, "ticket", "open", "Fresh"])
        .assert()
        .success();

    socorro_cmd()
        .args(["--database-file", db_arg, "sweep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No steps past their deadline."));
}

#[test]
fn test_cli_command_aliases() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    socorro_cmd()
        .args(["--database-file", db_arg, "t", "o", "Alias check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alias check"));

    socorro_cmd()
        .args(["--database-file", db_arg, "s", "ls", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Workflow Steps"));
}

#[test]
fn test_cli_default_command_lists_tickets() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    socorro_cmd()
        .args(["--database-file", db_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No open tickets found"));
}

#[test]
fn test_cli_rejects_invalid_category() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    socorro_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "ticket",
            "open",
            "Bad category",
            "--category",
            "airlift",
        ])
        .assert()
        .failure();
}
