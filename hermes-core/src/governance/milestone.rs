//! Milestone reachability.

use serde::{Deserialize, Serialize};

use super::{checklist_completed, required_documents_completed, results_approved};
use crate::models::{today, Milestone, MilestoneStatus, Project};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneValidation {
    pub phase_results_complete: bool,
    pub required_documents_complete: bool,
    pub checklists_complete: bool,
    pub can_reach: bool,
}

impl MilestoneValidation {
    /// Names of the criteria that are not met.
    pub fn failures(&self) -> Vec<&'static str> {
        let mut failures = Vec::new();
        if !self.phase_results_complete {
            failures.push("approval-required results not approved");
        }
        if !self.required_documents_complete {
            failures.push("required documents not completed");
        }
        if !self.checklists_complete {
            failures.push("checklist incomplete");
        }
        if failures.is_empty() && !self.can_reach {
            failures.push("milestone phase does not exist");
        }
        failures
    }
}

impl Default for MilestoneValidation {
    fn default() -> Self {
        Self {
            phase_results_complete: true,
            required_documents_complete: true,
            checklists_complete: true,
            can_reach: true,
        }
    }
}

/// Check the milestone's phase against the governance criteria.
///
/// A milestone whose phase does not exist cannot be reached; the
/// sub-checks then stay at their default and carry no meaning.
pub fn validate_milestone_completion(milestone: &Milestone, project: &Project) -> MilestoneValidation {
    let mut validation = MilestoneValidation::default();
    let Some(phase) = project.phase(milestone.phase.as_str()) else {
        validation.can_reach = false;
        return validation;
    };

    validation.phase_results_complete = results_approved(phase);
    validation.required_documents_complete = required_documents_completed(phase, &project.documents);
    validation.checklists_complete = checklist_completed(phase);
    validation.can_reach = validation.phase_results_complete
        && validation.required_documents_complete
        && validation.checklists_complete;
    validation
}

/// Mark the milestone reached, dated today.
///
/// The caller must have checked [`MilestoneValidation::can_reach`]. A reached
/// milestone keeps its original date.
pub fn reach(milestone: &mut Milestone) {
    if milestone.is_reached() {
        return;
    }
    milestone.status = MilestoneStatus::Reached;
    milestone.date = Some(today());
    tracing::info!(milestone = %milestone.name, phase = %milestone.phase, "Milestone reached");
}
