//! Phase completion and milestone-gated advance.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{checklist_completed, required_documents_completed, results_approved};
use crate::ids::DocumentName;
use crate::models::{today, Document, Phase, PhaseStatus, Project};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseValidation {
    pub results_completed: bool,
    pub documents_ready: bool,
    pub checklists_completed: bool,
    pub can_complete: bool,
}

impl PhaseValidation {
    /// Names of the criteria that are not met.
    pub fn failures(&self) -> Vec<&'static str> {
        let mut failures = Vec::new();
        if !self.results_completed {
            failures.push("approval-required results not approved");
        }
        if !self.documents_ready {
            failures.push("required documents not completed");
        }
        if !self.checklists_completed {
            failures.push("checklist incomplete");
        }
        failures
    }
}

/// Check whether `phase` satisfies its governance criteria.
///
/// A phase with no results, no required documents and an empty checklist can
/// always be completed.
pub fn validate_phase_completion(
    phase: &Phase,
    documents: &BTreeMap<DocumentName, Document>,
) -> PhaseValidation {
    let results_completed = results_approved(phase);
    let documents_ready = required_documents_completed(phase, documents);
    let checklists_completed = checklist_completed(phase);
    PhaseValidation {
        results_completed,
        documents_ready,
        checklists_completed,
        can_complete: results_completed && documents_ready && checklists_completed,
    }
}

/// Mark the phase completed and stamp its end date.
///
/// The caller must have checked [`PhaseValidation::can_complete`]. A phase
/// that is already completed keeps its end date.
pub fn complete_phase(phase: &mut Phase) {
    if phase.status == PhaseStatus::Completed {
        return;
    }
    phase.status = PhaseStatus::Completed;
    phase.end_date = Some(today());
    tracing::info!(phase = %phase.key, "Phase completed");
}

/// Move the project past its current phase if it may close.
///
/// Requires both that the current phase passes validation and that a
/// milestone scoped to it has been reached. On success the current phase is
/// completed and, unless it is the last one, the next phase becomes active and
/// current. A next phase that already left `NotStarted` keeps its status and
/// dates. Returns true when the current phase was completed.
pub fn auto_advance_phase(project: &mut Project) -> bool {
    let current = project.master_data.current_phase.clone();
    let Some(idx) = project.phase_index(current.as_str()) else {
        tracing::debug!(phase = %current, "Current phase is unknown, not advancing");
        return false;
    };

    let validation = validate_phase_completion(&project.phases[idx], &project.documents);
    let milestone_reached = project
        .milestones
        .iter()
        .any(|m| m.phase == current && m.is_reached());

    if !validation.can_complete || !milestone_reached {
        tracing::debug!(
            phase = %current,
            can_complete = validation.can_complete,
            milestone_reached,
            "Phase not ready to advance"
        );
        return false;
    }

    complete_phase(&mut project.phases[idx]);

    if let Some(next) = project.phases.get_mut(idx + 1) {
        if next.status == PhaseStatus::NotStarted {
            next.status = PhaseStatus::Active;
            next.start_date = Some(today());
        }
        project.master_data.current_phase = next.key.clone();
        tracing::info!(from = %current, to = %next.key, "Advanced to next phase");
    }
    true
}
