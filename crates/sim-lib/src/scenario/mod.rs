//! Scripted demo scenarios
//!
//! Fixed sequences printed with pauses between steps. They share the
//! reporter's interrupt signal but carry no state between runs.

mod costs;
mod invocations;
mod storage;

pub use costs::{demo_cost_scenarios, CostScenario, CostTotals};
pub use invocations::{simulate_invocations, InvocationPlan};
pub use storage::{
    demo_storage_operations, simulate_storage_operations, StorageOp, StorageOperation,
};

/// How a scenario ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioOutcome {
    Completed { steps: usize },
    Interrupted { steps: usize },
}

impl ScenarioOutcome {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, ScenarioOutcome::Interrupted { .. })
    }

    pub fn steps(&self) -> usize {
        match self {
            ScenarioOutcome::Completed { steps } | ScenarioOutcome::Interrupted { steps } => *steps,
        }
    }
}

/// Write a line, ignoring closed-pipe style failures
pub(crate) fn emit_line(out: &mut dyn std::io::Write, line: &str) {
    if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
        tracing::debug!(error = %e, "Failed to write scenario line");
    }
}
