use serde::Serialize;
use thiserror::Error;

use crate::group::GroupSummary;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of processing one group: either its summary or why it failed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupOutcome {
    Completed(GroupSummary),
    Failed { error: String },
}

/// Per-group entry handed to a [`Reporter`].
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub label: String,
    pub outcome: GroupOutcome,
}

impl GroupReport {
    pub fn completed(summary: GroupSummary) -> Self {
        Self {
            label: summary.label.clone(),
            outcome: GroupOutcome::Completed(summary),
        }
    }

    pub fn failed(label: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            outcome: GroupOutcome::Failed {
                error: error.into(),
            },
        }
    }

    /// The summary, if the group completed.
    pub fn summary(&self) -> Option<&GroupSummary> {
        match &self.outcome {
            GroupOutcome::Completed(summary) => Some(summary),
            GroupOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, GroupOutcome::Failed { .. })
    }
}

pub trait Reporter: Send + Sync {
    fn report(&self, results: &[GroupReport]) -> Result<(), ReportError>;
}

mod json;
mod terminal;
pub use json::JsonReporter;
pub use terminal::TerminalReporter;
