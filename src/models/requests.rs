use hermes_core::models::{DocumentStatus, ResultStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetDocumentStatusInput {
    pub status: DocumentStatus,
}

/// Response of a document status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStatusResponse {
    pub document: hermes_core::models::Document,
    /// Whether the linked result was completed as a consequence.
    pub result_synced: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetResultStatusInput {
    pub status: ResultStatus,
}

/// Input for adding a result to a phase from the template catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddResultInput {
    pub template: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetChecklistItemInput {
    pub item: String,
    pub checked: bool,
}

/// Response of an advance attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceResponse {
    pub advanced: bool,
    pub current_phase: hermes_core::ids::PhaseKey,
}
