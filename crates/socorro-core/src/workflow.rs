//! Static step table for the towing workflow.
//!
//! The seven-step towing process is defined by a fixed, ordered table of
//! [`StepDefinition`] entries. The table is immutable at run time and is
//! injected into the [`crate::engine::WorkflowEngine`] rather than living as
//! module-level state, so tests and deployments can run with alternate SLA
//! minutes.

use serde::{Deserialize, Serialize};

/// Total number of steps in the towing workflow.
pub const STEP_COUNT: u32 = 7;

/// Step number of the provider-wait step whose deadline can be renewed.
pub const PROVIDER_WAIT_STEP: u32 = 3;

/// Step number of the travel step whose deadline comes from the operator's
/// travel estimate.
pub const TRAVEL_STEP: u32 = 6;

/// Minutes added to the provider-wait deadline per renewal.
pub const RENEWAL_MINUTES: u32 = 15;

/// One entry of the static step table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    /// Position in the workflow, 1-based and totally ordered
    pub step_number: u32,

    /// Human-readable label for the step
    pub name: String,

    /// Deadline offset in minutes applied when the step is activated.
    /// Zero means no automatic deadline; the activating action supplies
    /// one explicitly (or none at all for the terminal step).
    pub default_deadline_minutes: u32,
}

/// Immutable, ordered table of step definitions.
///
/// `StepTable::default()` yields the fixed towing table. Construct with
/// [`StepTable::new`] to run the engine against different SLA windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTable {
    definitions: Vec<StepDefinition>,
}

impl StepTable {
    /// Creates a table from explicit definitions.
    ///
    /// The definitions must already be ordered by `step_number` starting at 1
    /// with no gaps; callers building alternate tables own that invariant.
    pub fn new(definitions: Vec<StepDefinition>) -> Self {
        Self { definitions }
    }

    /// Looks up a definition by its 1-based step number.
    pub fn get(&self, step_number: u32) -> Option<&StepDefinition> {
        self.definitions
            .iter()
            .find(|d| d.step_number == step_number)
    }

    /// Number of steps in the table.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the table holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// The final step number, after which no activation happens.
    pub fn last_step(&self) -> u32 {
        self.definitions
            .last()
            .map(|d| d.step_number)
            .unwrap_or_default()
    }

    /// Iterator over the definitions in workflow order.
    pub fn iter(&self) -> std::slice::Iter<'_, StepDefinition> {
        self.definitions.iter()
    }
}

impl Default for StepTable {
    /// The fixed towing workflow: seven steps with their SLA minutes.
    fn default() -> Self {
        let def = |step_number: u32, name: &str, default_deadline_minutes: u32| StepDefinition {
            step_number,
            name: name.to_string(),
            default_deadline_minutes,
        };

        Self::new(vec![
            def(1, "Information entry", 0),
            def(2, "Awaiting insurer ticket opening", 15),
            def(3, "Ticket opened - awaiting provider", 30),
            def(4, "In progress - provider located", 60),
            def(5, "Provider at origin location", 30),
            // Deadline is operator-supplied travel time, not a table default
            def(6, "Vehicle en route to destination", 0),
            def(7, "Vehicle delivered", 0),
        ])
    }
}

impl<'a> IntoIterator for &'a StepTable {
    type Item = &'a StepDefinition;
    type IntoIter = std::slice::Iter<'a, StepDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.definitions.iter()
    }
}
