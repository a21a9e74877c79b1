use thiserror::Error;

/// Rejection of a guarded project command.
///
/// Governance checks themselves never fail; they return verdicts. These errors
/// come from the command layer on [`crate::models::Project`] when a verdict is
/// false, a name does not resolve, or a status change is not allowed.
#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("Phase not found: {0}")]
    PhaseNotFound(String),

    #[error("Result not found: {0}")]
    ResultNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Checklist item not found: {0}")]
    ChecklistItemNotFound(String),

    #[error("Milestone not found: {0}")]
    MilestoneNotFound(usize),

    #[error("Iteration not found: {0}")]
    IterationNotFound(u32),

    #[error("Iteration {0} already exists")]
    DuplicateIteration(u32),

    #[error("Invalid {entity} transition from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: &'static str,
        to: &'static str,
    },

    #[error("Governance criteria not met: {0}")]
    CriteriaNotMet(String),

    #[error("Iterations require the agile approach")]
    NotAgile,

    #[error("Iteration {0} is not a release candidate")]
    NotReleaseCandidate(u32),

    #[error("Missing mandatory roles: {}", .0.join(", "))]
    MissingRoles(Vec<String>),

    #[error("Project name is required")]
    MissingProjectName,
}

impl GovernanceError {
    /// True for errors caused by a name or number that does not resolve.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PhaseNotFound(_)
                | Self::ResultNotFound(_)
                | Self::DocumentNotFound(_)
                | Self::ChecklistItemNotFound(_)
                | Self::MilestoneNotFound(_)
                | Self::IterationNotFound(_)
        )
    }
}

/// Failure to read a catalog override.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}
