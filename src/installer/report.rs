//! Installation results, one row per plan step.

use std::fmt;
use std::path::PathBuf;

use crate::orchestrator::StepReport;

/// What happened to one plan step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// The step changed at least one staged file.
    Applied,
    /// The step ran and everything was already in place.
    Unchanged,
    /// The step could not run; holds the reason.
    Skipped(String),
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Applied => f.write_str("applied"),
            StepStatus::Unchanged => f.write_str("unchanged"),
            StepStatus::Skipped(reason) => write!(f, "skipped: {}", reason),
        }
    }
}

/// Result of a single plan step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    /// Short description, e.g. `merge app/User.php`.
    pub task: String,
    pub status: StepStatus,
    /// Per-construct outcomes, for merge steps.
    pub constructs: Vec<StepReport>,
}

impl TaskReport {
    pub fn new(task: impl Into<String>, status: StepStatus) -> Self {
        Self {
            task: task.into(),
            status,
            constructs: Vec::new(),
        }
    }

    /// Constructs that had content to write but could not write it.
    pub fn degraded(&self) -> impl Iterator<Item = &StepReport> {
        self.constructs.iter().filter(|step| step.outcome.is_degraded())
    }
}

/// Result of a whole installation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Step results in plan order.
    pub steps: Vec<TaskReport>,
    /// Project files whose content differs from disk after all steps.
    pub changed_files: Vec<PathBuf>,
    /// Whether `changed_files` were written to disk.
    pub written: bool,
}

impl InstallReport {
    /// Whether the installation changes (or changed) anything.
    pub fn has_changes(&self) -> bool {
        !self.changed_files.is_empty()
    }

    /// Number of steps that were skipped.
    pub fn skipped(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step.status, StepStatus::Skipped(_)))
            .count()
    }

    /// Number of constructs across all merge steps that degraded.
    pub fn degraded(&self) -> usize {
        self.steps.iter().map(|step| step.degraded().count()).sum()
    }
}
