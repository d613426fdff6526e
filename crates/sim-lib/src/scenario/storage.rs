//! Simulated object-storage operations

use super::{emit_line, ScenarioOutcome};
use crate::shutdown::ShutdownSignal;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StorageOp {
    Put,
    Get,
    List,
}

impl std::fmt::Display for StorageOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageOp::Put => write!(f, "PUT"),
            StorageOp::Get => write!(f, "GET"),
            StorageOp::List => write!(f, "LIST"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageOperation {
    pub op: StorageOp,
    pub size_kb: u32,
    pub description: String,
}

impl StorageOperation {
    fn new(op: StorageOp, size_kb: u32, description: &str) -> Self {
        Self {
            op,
            size_kb,
            description: description.to_string(),
        }
    }

    fn detail(&self) -> String {
        match self.op {
            StorageOp::Put => format!("      Uploading {}KB...", self.size_kb),
            StorageOp::Get => format!("      Downloading {}KB...", self.size_kb),
            StorageOp::List => "      Listing contents...".to_string(),
        }
    }
}

/// The five operations of the demo run
pub fn demo_storage_operations() -> Vec<StorageOperation> {
    vec![
        StorageOperation::new(StorageOp::Put, 50, "Upload small file"),
        StorageOperation::new(StorageOp::Get, 50, "Download file"),
        StorageOperation::new(StorageOp::List, 0, "List buckets"),
        StorageOperation::new(StorageOp::Put, 100, "Upload medium file"),
        StorageOperation::new(StorageOp::Get, 100, "Download file"),
    ]
}

/// Print each operation, pausing `pause` for the transfer and half of it to settle
pub async fn simulate_storage_operations(
    operations: &[StorageOperation],
    pause: Duration,
    out: &mut dyn Write,
    shutdown: &mut ShutdownSignal,
) -> ScenarioOutcome {
    for (i, op) in operations.iter().enumerate() {
        if shutdown.is_triggered() {
            return ScenarioOutcome::Interrupted { steps: i };
        }

        emit_line(
            out,
            &format!("   Operation {}: {} - {}", i + 1, op.op, op.description),
        );

        if !shutdown.sleep(pause).await {
            return ScenarioOutcome::Interrupted { steps: i };
        }

        emit_line(out, &op.detail());

        if !shutdown.sleep(pause / 2).await {
            return ScenarioOutcome::Interrupted { steps: i + 1 };
        }
    }

    ScenarioOutcome::Completed {
        steps: operations.len(),
    }
}
