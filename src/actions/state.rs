// SPDX-License-Identifier: MIT

//! Execution states and run-after gating modes

use serde::{Deserialize, Serialize};

/// Terminal or in-flight outcome of an action run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExecutionState {
    Aborted,
    Cancelled,
    Failed,
    Faulted,
    Ignored,
    Paused,
    Running,
    Skipped,
    Succeeded,
    Suspended,
    TimedOut,
    Waiting,
}

impl ExecutionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionState::Aborted => "Aborted",
            ExecutionState::Cancelled => "Cancelled",
            ExecutionState::Failed => "Failed",
            ExecutionState::Faulted => "Faulted",
            ExecutionState::Ignored => "Ignored",
            ExecutionState::Paused => "Paused",
            ExecutionState::Running => "Running",
            ExecutionState::Skipped => "Skipped",
            ExecutionState::Succeeded => "Succeeded",
            ExecutionState::Suspended => "Suspended",
            ExecutionState::TimedOut => "TimedOut",
            ExecutionState::Waiting => "Waiting",
        }
    }
}

impl std::fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a child action is gated on its parent's outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Run only when the parent succeeded (default)
    #[default]
    Normal,
    /// Run whatever the parent's outcome
    Force,
    /// Run only when the parent failed
    OnlyIfFailed,
}

impl RunMode {
    /// Parent states that allow the child to run
    pub fn state_set(&self) -> Vec<ExecutionState> {
        match self {
            RunMode::Normal => vec![ExecutionState::Succeeded],
            RunMode::Force => vec![
                ExecutionState::Succeeded,
                ExecutionState::Failed,
                ExecutionState::Skipped,
                ExecutionState::TimedOut,
            ],
            RunMode::OnlyIfFailed => vec![ExecutionState::Failed],
        }
    }
}
