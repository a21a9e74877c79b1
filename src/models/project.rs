use chrono::{DateTime, NaiveDate, Utc};
use hermes_core::ids::PhaseKey;
use hermes_core::models::{Approach, MasterData, Project, ProjectSize};
use hermes_core::progress::ProjectMetrics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A governed project as persisted by the store.
///
/// The aggregate is flattened so clients see `master_data`, `phases` and the
/// other collections next to the record's id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProject {
    pub id: Uuid,
    #[serde(flatten)]
    pub project: Project,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row-level view of a project, read without decoding the aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub approach: Approach,
    pub size: ProjectSize,
    pub current_phase: PhaseKey,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project. Unset master data fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectInput {
    #[serde(flatten)]
    pub master_data: MasterData,
}

/// Input for updating master data. All fields are optional for partial updates.
///
/// A changed `project_size` re-applies tailoring. A changed `approach`
/// rebuilds phases, documents, milestones and iterations for the new approach.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectInput {
    pub project_name: Option<String>,
    pub client: Option<String>,
    pub project_manager: Option<String>,
    pub user_representative: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub project_size: Option<ProjectSize>,
    pub approach: Option<Approach>,
}

/// Governance health of one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectHealth {
    pub id: Uuid,
    pub project_name: String,
    pub current_phase: PhaseKey,
    #[serde(flatten)]
    pub metrics: ProjectMetrics,
    pub updated_at: DateTime<Utc>,
}

/// Counts over all stored projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_projects: usize,
    pub classical_projects: usize,
    pub agile_projects: usize,
    pub projects_by_size: BTreeMap<ProjectSize, usize>,
}
