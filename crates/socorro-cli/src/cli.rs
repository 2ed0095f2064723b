//! Command handling and CLI argument definitions using clap
//!
//! This module defines the subcommand argument structures and the `Cli`
//! handler that executes them. Argument structs carry the clap-specific
//! attributes and convert into core parameter types via `From`, keeping the
//! core crate free of CLI framework concerns.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use log::info;
use socorro_core::{
    display::{CreateResult, FinalizeResult, OperationStatus},
    params::{
        AdvanceStep, FinalizeTicket, Id, ListTickets, OpenTicket, RenewProviderWait,
        UpdateInsurerReference, UpdateTravelTime,
    },
    WorkflowEngine,
};
use tokio::signal::unix::{signal, SignalKind};

use crate::renderer::TerminalRenderer;

/// Open a new service ticket
///
/// Towing tickets start their workflow immediately: intake is recorded as
/// completed and the ticket begins awaiting the insurer ticket opening.
#[derive(Args)]
pub struct OpenTicketArgs {
    /// Title of the ticket
    pub title: String,
    /// Optional description providing more context about the incident
    #[arg(short, long)]
    pub description: Option<String>,
    /// Service category for the ticket
    #[arg(short, long, default_value_t = CategoryArg::Towing)]
    pub category: CategoryArg,
    /// Insurer reference number, when already known at intake
    #[arg(short = 'r', long)]
    pub reference: Option<String>,
}

impl From<OpenTicketArgs> for OpenTicket {
    fn from(val: OpenTicketArgs) -> Self {
        OpenTicket {
            title: val.title,
            description: val.description,
            category: val.category.to_string(),
            insurer_reference: val.reference,
        }
    }
}

/// List service tickets
#[derive(Args)]
pub struct ListTicketsArgs {
    /// Include finalized tickets in the listing
    #[arg(long)]
    pub all: bool,
}

impl From<ListTicketsArgs> for ListTickets {
    fn from(val: ListTicketsArgs) -> Self {
        ListTickets {
            include_finalized: val.all,
        }
    }
}

/// Show details of a specific ticket
#[derive(Args)]
pub struct ShowTicketArgs {
    /// ID of the ticket to display
    #[arg(help = "Unique identifier of the ticket to show details for")]
    pub id: u64,
}

impl From<ShowTicketArgs> for Id {
    fn from(val: ShowTicketArgs) -> Self {
        Id { id: val.id }
    }
}

/// Finalize a ticket
///
/// Completes the delivery step and closes the ticket. Finalizing again
/// overwrites the delivery notes with the latest value.
#[derive(Args)]
pub struct FinalizeTicketArgs {
    /// ID of the ticket to finalize
    pub id: u64,
    /// Closing notes recorded on the delivery step
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl From<FinalizeTicketArgs> for FinalizeTicket {
    fn from(val: FinalizeTicketArgs) -> Self {
        FinalizeTicket {
            ticket_id: val.id,
            final_notes: val.notes,
        }
    }
}

#[derive(Subcommand)]
pub enum TicketCommands {
    /// Open a new service ticket
    #[command(alias = "o")]
    Open(OpenTicketArgs),
    /// List service tickets
    #[command(aliases = ["l", "ls"])]
    List(ListTicketsArgs),
    /// Show details of a specific ticket
    #[command(alias = "s")]
    Show(ShowTicketArgs),
    /// Finalize a ticket, completing its delivery step
    #[command(alias = "f")]
    Finalize(FinalizeTicketArgs),
}

/// List the workflow steps of a ticket
#[derive(Args)]
pub struct ListStepsArgs {
    /// ID of the ticket whose steps to display
    pub ticket_id: u64,
}

impl From<ListStepsArgs> for Id {
    fn from(val: ListStepsArgs) -> Self {
        Id { id: val.ticket_id }
    }
}

/// Advance the active workflow step
///
/// Completes the step and activates its successor. Completing the insurer
/// opening step requires a reference number, either given here or stored
/// earlier with `set-reference`.
#[derive(Args)]
pub struct AdvanceStepArgs {
    /// ID of the ticket to advance
    pub ticket_id: u64,
    /// Number of the step to complete
    pub step_number: u32,
    /// Insurer reference number (required when completing step 2)
    #[arg(short = 'r', long)]
    pub reference: Option<String>,
    /// Travel estimate in minutes, used as the deadline when the transport
    /// step activates
    #[arg(short, long)]
    pub travel_minutes: Option<u32>,
    /// Notes to record on the completed step
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl From<AdvanceStepArgs> for AdvanceStep {
    fn from(val: AdvanceStepArgs) -> Self {
        AdvanceStep {
            ticket_id: val.ticket_id,
            step_number: val.step_number,
            insurer_reference: val.reference,
            travel_minutes: val.travel_minutes,
            notes: val.notes,
        }
    }
}

/// Renew the provider-wait deadline
///
/// Grants the provider search a fresh 15-minute deadline and appends a
/// timestamped note explaining the renewal.
#[derive(Args)]
pub struct RenewArgs {
    /// ID of the ticket whose provider wait to renew
    pub ticket_id: u64,
    /// Reason for the renewal, appended to the step notes
    pub note: String,
}

impl From<RenewArgs> for RenewProviderWait {
    fn from(val: RenewArgs) -> Self {
        RenewProviderWait {
            ticket_id: val.ticket_id,
            note: val.note,
        }
    }
}

/// Store the insurer reference number on a ticket
#[derive(Args)]
pub struct SetReferenceArgs {
    /// ID of the ticket to update
    pub ticket_id: u64,
    /// Insurer reference number
    pub reference: String,
}

impl From<SetReferenceArgs> for UpdateInsurerReference {
    fn from(val: SetReferenceArgs) -> Self {
        UpdateInsurerReference {
            ticket_id: val.ticket_id,
            insurer_reference: val.reference,
        }
    }
}

/// Store a manual travel estimate for the transport step
#[derive(Args)]
pub struct SetTravelArgs {
    /// ID of the ticket to update
    pub ticket_id: u64,
    /// Estimated travel time in minutes
    pub minutes: u32,
}

impl From<SetTravelArgs> for UpdateTravelTime {
    fn from(val: SetTravelArgs) -> Self {
        UpdateTravelTime {
            ticket_id: val.ticket_id,
            minutes: val.minutes,
        }
    }
}

/// Attach the towing workflow to an existing ticket
#[derive(Args)]
pub struct InitWorkflowArgs {
    /// ID of the ticket to attach the workflow to
    pub ticket_id: u64,
}

impl From<InitWorkflowArgs> for Id {
    fn from(val: InitWorkflowArgs) -> Self {
        Id { id: val.ticket_id }
    }
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// List the workflow steps of a ticket
    #[command(aliases = ["l", "ls"])]
    List(ListStepsArgs),
    /// Complete the active step and activate its successor
    #[command(alias = "a")]
    Advance(AdvanceStepArgs),
    /// Renew the provider-wait deadline with a note
    #[command(alias = "r")]
    Renew(RenewArgs),
    /// Store the insurer reference number on a ticket
    SetReference(SetReferenceArgs),
    /// Store a manual travel estimate for the transport step
    SetTravel(SetTravelArgs),
    /// Attach the towing workflow to an existing ticket
    Init(InitWorkflowArgs),
}

/// Mark in-progress steps past their deadline as late
#[derive(Args)]
pub struct SweepArgs {
    /// Keep running, sweeping at a fixed interval
    #[arg(long)]
    pub watch: bool,
    /// Seconds between sweeps in watch mode
    #[arg(long, default_value_t = 60)]
    pub interval: u64,
}

/// Command-line argument representation of service categories
///
/// Used with the `--category` flag when opening tickets. Only towing tickets
/// carry the step workflow.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum CategoryArg {
    /// Vehicle towing with the full workflow
    Towing,
    /// Windshield repair
    Windshield,
    /// Other roadside assistance
    Standard,
}

impl std::fmt::Display for CategoryArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryArg::Towing => write!(f, "towing"),
            CategoryArg::Windshield => write!(f, "windshield"),
            CategoryArg::Standard => write!(f, "standard"),
        }
    }
}

/// Executes parsed commands against the workflow engine and renders results.
pub struct Cli {
    engine: WorkflowEngine,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(engine: WorkflowEngine, renderer: TerminalRenderer) -> Self {
        Self { engine, renderer }
    }

    pub async fn handle_ticket_command(&self, command: TicketCommands) -> Result<()> {
        match command {
            TicketCommands::Open(args) => {
                let ticket = self.engine.open_ticket(&args.into()).await?;
                self.renderer.render(&CreateResult::new(ticket).to_string())
            }
            TicketCommands::List(args) => self.list_tickets(&args.into()).await,
            TicketCommands::Show(args) => {
                let params: Id = args.into();
                match self.engine.get_ticket(&params).await? {
                    Some(ticket) => self.renderer.render(&ticket.to_string()),
                    None => self.renderer.render(
                        &OperationStatus::failure(format!(
                            "Ticket with ID {} not found",
                            params.id
                        ))
                        .to_string(),
                    ),
                }
            }
            TicketCommands::Finalize(args) => {
                let ticket = self.engine.finalize_ticket(&args.into()).await?;
                self.renderer
                    .render(&FinalizeResult::new(ticket).to_string())
            }
        }
    }

    pub async fn handle_step_command(&self, command: StepCommands) -> Result<()> {
        match command {
            StepCommands::List(args) => {
                let steps = self.engine.get_steps(&args.into()).await?;
                self.renderer.render(&format!("# Workflow Steps\n\n{steps}"))
            }
            StepCommands::Advance(args) => {
                let advancement = self.engine.advance_step(&args.into()).await?;
                self.renderer.render(&advancement.to_string())
            }
            StepCommands::Renew(args) => {
                let step = self.engine.renew_provider_wait(&args.into()).await?;
                let status = OperationStatus::success(format!(
                    "Renewed the provider-wait deadline for step {}.",
                    step.step_number
                ));
                self.renderer.render(&format!("{status}\n{step}"))
            }
            StepCommands::SetReference(args) => {
                let step = self.engine.update_insurer_reference(&args.into()).await?;
                let status = OperationStatus::success(format!(
                    "Stored insurer reference on ticket {}.",
                    step.ticket_id
                ));
                self.renderer.render(&status.to_string())
            }
            StepCommands::SetTravel(args) => {
                let step = self.engine.update_travel_time(&args.into()).await?;
                let status = OperationStatus::success(format!(
                    "Stored travel estimate of {} minutes on ticket {}.",
                    step.manual_travel_minutes.unwrap_or_default(),
                    step.ticket_id
                ));
                self.renderer.render(&status.to_string())
            }
            StepCommands::Init(args) => {
                let steps = self.engine.initialize_workflow(&args.into()).await?;
                self.renderer.render(&format!("# Workflow Steps\n\n{steps}"))
            }
        }
    }

    pub async fn list_tickets(&self, params: &ListTickets) -> Result<()> {
        let summaries = self.engine.list_tickets(params).await?;

        let title = if summaries.is_empty() {
            if params.include_finalized {
                "No tickets found"
            } else {
                "No open tickets found"
            }
        } else if params.include_finalized {
            "All Tickets"
        } else {
            "Open Tickets"
        };

        self.renderer.render(&format!("# {title}\n\n{summaries}"))
    }

    pub async fn sweep(&self, args: SweepArgs) -> Result<()> {
        if !args.watch {
            return self.sweep_once().await;
        }

        let mut ticker = tokio::time::interval(Duration::from_secs(args.interval.max(1)));
        let mut sigint = signal(SignalKind::interrupt()).context("Failed to install handler")?;
        let mut sigterm = signal(SignalKind::terminate()).context("Failed to install handler")?;

        loop {
            tokio::select! {
                _ = ticker.tick() => self.sweep_once().await?,
                _ = sigint.recv() => break,
                _ = sigterm.recv() => break,
            }
        }

        info!("Sweep watch stopped");
        Ok(())
    }

    async fn sweep_once(&self) -> Result<()> {
        let late = self.engine.sweep_late_steps().await?;
        if late.is_empty() {
            self.renderer.render(
                &OperationStatus::success("No steps past their deadline.".to_string()).to_string(),
            )
        } else {
            self.renderer.render(&format!("# Newly Late Steps\n\n{late}"))
        }
    }
}
