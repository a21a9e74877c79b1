//! Release approval under the agile approach.

use serde::{Deserialize, Serialize};

use crate::ids::{DocumentName, ResultName};
use crate::models::{today, Iteration, IterationStatus, Milestone, MilestoneStatus, Project, ResultStatus};
use crate::progress::{budget_usage, BUDGET_HEALTH_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseValidation {
    pub release_document_complete: bool,
    /// True when the release result is *completed*. Approval happens as part
    /// of [`approve_release`], so an already approved result does not pass.
    pub release_result_approved: bool,
    pub budget_healthy: bool,
    pub milestones_on_track: bool,
    pub can_approve: bool,
}

impl ReleaseValidation {
    /// Names of the criteria that are not met.
    pub fn failures(&self) -> Vec<&'static str> {
        let mut failures = Vec::new();
        if !self.release_document_complete {
            failures.push("release report not completed");
        }
        if !self.release_result_approved {
            failures.push("release result not completed");
        }
        if !self.budget_healthy {
            failures.push("budget usage above 90%");
        }
        if !self.milestones_on_track {
            failures.push("mandatory build-phase milestones not reached");
        }
        failures
    }
}

/// Name of the document reporting on iteration `number`.
pub fn release_document_name(number: u32) -> DocumentName {
    DocumentName::new(format!("Release Report {number}"))
}

/// Name of the result delivered by iteration `number`.
pub fn release_result_name(number: u32) -> ResultName {
    ResultName::new(format!("Release {number}"))
}

/// Check whether the iteration's release may be approved.
pub fn validate_release_approval(iteration: &Iteration, project: &Project) -> ReleaseValidation {
    let release_document_complete = project
        .document(release_document_name(iteration.number).as_str())
        .is_some_and(|doc| doc.is_completed());

    let build_phase = project.build_phase_key();
    let release_result_approved = project
        .phase(build_phase.as_str())
        .and_then(|phase| phase.result(release_result_name(iteration.number).as_str()))
        .is_some_and(|result| result.status == ResultStatus::Completed);

    let budget_healthy = budget_usage(project) <= BUDGET_HEALTH_LIMIT;

    let milestones_on_track = project
        .milestones
        .iter()
        .filter(|m| m.mandatory && m.phase == build_phase)
        .all(|m| m.is_reached());

    ReleaseValidation {
        release_document_complete,
        release_result_approved,
        budget_healthy,
        milestones_on_track,
        can_approve: release_document_complete
            && release_result_approved
            && budget_healthy
            && milestones_on_track,
    }
}

/// Approve the release of iteration `number`.
///
/// The caller must have checked [`ReleaseValidation::can_approve`]. Marks the
/// iteration approved and completed, approves the release result, and records
/// a reached, non-mandatory milestone for the release in the build phase.
pub fn approve_release(number: u32, project: &mut Project) {
    let build_phase = project.build_phase_key();
    let date = today();

    let Some(iteration) = project.iteration_mut(number) else {
        return;
    };
    iteration.release_approved = true;
    iteration.status = IterationStatus::Completed;
    let milestone_name = format!("Release {} - {}", iteration.number, iteration.name);

    if let Some(result) = project
        .phase_mut(build_phase.as_str())
        .and_then(|phase| phase.result_mut(release_result_name(number).as_str()))
    {
        result.status = ResultStatus::Approved;
        result.approval_date = Some(date);
    }

    project.milestones.push(Milestone {
        name: milestone_name,
        phase: build_phase,
        date: Some(date),
        status: MilestoneStatus::Reached,
        mandatory: false,
    });

    tracing::info!(iteration = number, "Release approved");
}
