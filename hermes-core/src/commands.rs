//! Guarded commands on a project.
//!
//! These are the operations a presentation layer issues. Each one resolves
//! its names, checks the status transition table and, for the gated actions,
//! consults the matching governor before mutating. A document status change
//! always runs the document sync before returning, so governors queried
//! afterwards see post-sync state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::GovernanceError;
use crate::governance::release::{release_document_name, release_result_name};
use crate::governance::{self, MilestoneValidation, PhaseValidation, ReleaseValidation};
use crate::ids::{PhaseKey, ResultName};
use crate::models::{
    today, Approach, BudgetTransaction, CreateIterationInput, Document, DocumentStatus, Iteration,
    IterationStatus, Milestone, MilestoneStatus, PhaseResult, PhaseStatus, Project, ProjectSize,
    ResultStatus,
};
use crate::sync::sync_document_to_result;
use crate::tailoring::apply_tailoring;

/// Input for adding a user-defined milestone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMilestoneInput {
    pub name: String,
    pub phase: PhaseKey,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Partial update of an iteration's progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIterationInput {
    pub completed_user_stories: Option<u32>,
    pub status: Option<IterationStatus>,
}

fn criteria_not_met(failures: Vec<&'static str>) -> GovernanceError {
    GovernanceError::CriteriaNotMet(failures.join(", "))
}

impl Project {
    /// Change the declared size and re-apply tailoring.
    pub fn change_size(&mut self, size: ProjectSize, catalog: &Catalog) {
        self.master_data.project_size = size;
        apply_tailoring(self, catalog);
    }

    /// Switch the approach and rebuild the project structure for it.
    ///
    /// Phases, documents, milestones and iterations are recreated from the
    /// catalog as for a new project. The budget ledger and role assignments
    /// carry over. The first phase of the new sequence becomes current and
    /// active. Choosing the current approach changes nothing.
    pub fn change_approach(
        &mut self,
        approach: Approach,
        catalog: &Catalog,
    ) -> Result<(), GovernanceError> {
        if self.master_data.approach == approach {
            return Ok(());
        }

        let mut master_data = self.master_data.clone();
        master_data.approach = approach;
        let mut rebuilt = Project::initialize(master_data, catalog)?;
        rebuilt.budget_entries = std::mem::take(&mut self.budget_entries);
        rebuilt.roles.append(&mut self.roles);
        if let Some(first) = rebuilt.phases.first_mut() {
            first.status = PhaseStatus::Active;
            first.start_date = Some(today());
        }

        tracing::info!(
            from = self.master_data.approach.as_str(),
            to = approach.as_str(),
            "Approach changed, project structure rebuilt"
        );
        *self = rebuilt;
        Ok(())
    }

    /// Set a document's status and propagate it to the linked result.
    ///
    /// Returns true when the sync updated a result.
    pub fn set_document_status(
        &mut self,
        name: &str,
        status: DocumentStatus,
    ) -> Result<bool, GovernanceError> {
        let doc = self
            .documents
            .get_mut(name)
            .ok_or_else(|| GovernanceError::DocumentNotFound(name.to_string()))?;
        doc.status = status;
        let doc = doc.clone();
        Ok(sync_document_to_result(&doc, self))
    }

    pub fn set_result_status(
        &mut self,
        phase: &str,
        result: &str,
        status: ResultStatus,
    ) -> Result<(), GovernanceError> {
        let target = self
            .phase_mut(phase)
            .ok_or_else(|| GovernanceError::PhaseNotFound(phase.to_string()))?
            .result_mut(result)
            .ok_or_else(|| GovernanceError::ResultNotFound(result.to_string()))?;

        if !target.status.can_transition_to(status) {
            return Err(GovernanceError::InvalidTransition {
                entity: "result",
                from: target.status.as_str(),
                to: status.as_str(),
            });
        }
        if status == ResultStatus::Approved && target.status != ResultStatus::Approved {
            target.approval_date = Some(today());
        }
        target.status = status;
        Ok(())
    }

    /// Check or uncheck an existing checklist item.
    pub fn set_checklist_item(
        &mut self,
        phase: &str,
        item: &str,
        checked: bool,
    ) -> Result<(), GovernanceError> {
        let value = self
            .phase_mut(phase)
            .ok_or_else(|| GovernanceError::PhaseNotFound(phase.to_string()))?
            .checklist
            .get_mut(item)
            .ok_or_else(|| GovernanceError::ChecklistItemNotFound(item.to_string()))?;
        *value = checked;
        Ok(())
    }

    /// Add a result from the template catalog, replacing a result of the same name.
    /// Names without a template produce a plain result.
    pub fn add_result_from_template(
        &mut self,
        phase: &str,
        template: &str,
        catalog: &Catalog,
    ) -> Result<&PhaseResult, GovernanceError> {
        let result = catalog.new_result(&ResultName::from(template));
        let target = self
            .phase_mut(phase)
            .ok_or_else(|| GovernanceError::PhaseNotFound(phase.to_string()))?;
        let name = result.name.clone();
        target.add_result(result);
        target
            .results
            .get(&name)
            .ok_or_else(|| GovernanceError::ResultNotFound(name.to_string()))
    }

    pub fn phase_validation(&self, phase: &str) -> Result<PhaseValidation, GovernanceError> {
        let phase = self
            .phase(phase)
            .ok_or_else(|| GovernanceError::PhaseNotFound(phase.to_string()))?;
        Ok(governance::validate_phase_completion(phase, &self.documents))
    }

    /// Complete a phase whose criteria hold, then try to advance the project.
    ///
    /// A phase that has not started can only be completed while it is the
    /// current phase.
    pub fn complete_phase(&mut self, phase: &str) -> Result<PhaseValidation, GovernanceError> {
        let validation = self.phase_validation(phase)?;
        let current = self.master_data.current_phase.clone();
        let target = self
            .phase_mut(phase)
            .ok_or_else(|| GovernanceError::PhaseNotFound(phase.to_string()))?;

        let ahead = target.status == PhaseStatus::NotStarted && target.key != current;
        if ahead || !target.status.can_transition_to(PhaseStatus::Completed) {
            return Err(GovernanceError::InvalidTransition {
                entity: "phase",
                from: target.status.as_str(),
                to: PhaseStatus::Completed.as_str(),
            });
        }
        if !validation.can_complete {
            tracing::warn!(phase, "Phase completion rejected");
            return Err(criteria_not_met(validation.failures()));
        }

        governance::complete_phase(target);
        governance::auto_advance_phase(self);
        Ok(validation)
    }

    pub fn milestone_validation(&self, index: usize) -> Result<MilestoneValidation, GovernanceError> {
        let milestone = self
            .milestones
            .get(index)
            .ok_or(GovernanceError::MilestoneNotFound(index))?;
        Ok(governance::validate_milestone_completion(milestone, self))
    }

    /// Reach a milestone whose phase satisfies the governance criteria.
    pub fn reach_milestone(&mut self, index: usize) -> Result<&Milestone, GovernanceError> {
        let validation = self.milestone_validation(index)?;
        let milestone = &mut self.milestones[index];

        if milestone.is_reached() {
            return Err(GovernanceError::InvalidTransition {
                entity: "milestone",
                from: milestone.status.as_str(),
                to: MilestoneStatus::Reached.as_str(),
            });
        }
        if !validation.can_reach {
            tracing::warn!(milestone = %milestone.name, "Milestone rejected");
            return Err(criteria_not_met(validation.failures()));
        }

        governance::reach(milestone);
        Ok(&*milestone)
    }

    /// Append a planned milestone. The phase is not required to exist.
    pub fn add_milestone(&mut self, input: CreateMilestoneInput) -> usize {
        let mut milestone = Milestone::new(input.name, input.phase, input.mandatory);
        milestone.date = input.date;
        self.milestones.push(milestone);
        self.milestones.len() - 1
    }

    /// Manually flag a milestone as delayed. Reached milestones stay reached.
    pub fn set_milestone_delayed(&mut self, index: usize) -> Result<(), GovernanceError> {
        let milestone = self
            .milestones
            .get_mut(index)
            .ok_or(GovernanceError::MilestoneNotFound(index))?;
        if !milestone.status.can_transition_to(MilestoneStatus::Delayed) {
            return Err(GovernanceError::InvalidTransition {
                entity: "milestone",
                from: milestone.status.as_str(),
                to: MilestoneStatus::Delayed.as_str(),
            });
        }
        milestone.status = MilestoneStatus::Delayed;
        Ok(())
    }

    /// Create an iteration together with its release result and release report.
    ///
    /// The release result `Release {n}` is added to the build phase and the
    /// document `Release Report {n}` is linked to it, unless they exist already.
    pub fn add_iteration(
        &mut self,
        input: CreateIterationInput,
        catalog: &Catalog,
    ) -> Result<&Iteration, GovernanceError> {
        if !self.is_agile() {
            return Err(GovernanceError::NotAgile);
        }
        if self.iteration(input.number).is_some() {
            return Err(GovernanceError::DuplicateIteration(input.number));
        }

        let number = input.number;
        let name = input
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("Sprint {number}"));
        let goals = input
            .goals
            .into_iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();

        let result_name = release_result_name(number);
        let build_phase = self.build_phase_key();
        if let Some(phase) = self.phase_mut(build_phase.as_str()) {
            if phase.result(result_name.as_str()).is_none() {
                let mut result = catalog.new_result(&result_name);
                result.description = format!("Release result for {name}");
                result.approval_required = true;
                result.responsible_role.get_or_insert_with(|| "project_manager".into());
                phase.add_result(result);
            }
        }

        let doc_name = release_document_name(number);
        if !self.documents.contains_key(&doc_name) {
            let doc = Document::new(doc_name.clone(), "Project Manager").linked_to(result_name);
            self.documents.insert(doc_name, doc);
        }

        self.iterations.push(Iteration {
            number,
            name,
            start_date: input.start_date,
            end_date: input.end_date,
            total_user_stories: input.total_user_stories,
            completed_user_stories: 0,
            release_candidate: input.release_candidate,
            release_approved: false,
            status: IterationStatus::Planned,
            goals,
        });
        tracing::info!(iteration = number, "Iteration created");

        self.iteration(number)
            .ok_or(GovernanceError::IterationNotFound(number))
    }

    /// Update story progress and status. Completed stories are capped at the total.
    pub fn update_iteration(
        &mut self,
        number: u32,
        input: UpdateIterationInput,
    ) -> Result<&Iteration, GovernanceError> {
        let iteration = self
            .iteration_mut(number)
            .ok_or(GovernanceError::IterationNotFound(number))?;

        if let Some(status) = input.status {
            if status != iteration.status && !iteration.status.can_transition_to(status) {
                return Err(GovernanceError::InvalidTransition {
                    entity: "iteration",
                    from: iteration.status.as_str(),
                    to: status.as_str(),
                });
            }
            iteration.status = status;
        }
        if let Some(completed) = input.completed_user_stories {
            iteration.completed_user_stories = completed.min(iteration.total_user_stories);
        }
        Ok(&*iteration)
    }

    pub fn release_validation(&self, number: u32) -> Result<ReleaseValidation, GovernanceError> {
        let iteration = self
            .iteration(number)
            .ok_or(GovernanceError::IterationNotFound(number))?;
        Ok(governance::validate_release_approval(iteration, self))
    }

    /// Approve the release of a release-candidate iteration.
    pub fn approve_release(&mut self, number: u32) -> Result<ReleaseValidation, GovernanceError> {
        let iteration = self
            .iteration(number)
            .ok_or(GovernanceError::IterationNotFound(number))?;
        if !iteration.release_candidate {
            return Err(GovernanceError::NotReleaseCandidate(number));
        }
        if iteration.release_approved {
            return Err(GovernanceError::InvalidTransition {
                entity: "release",
                from: "approved",
                to: "approved",
            });
        }

        let validation = governance::validate_release_approval(iteration, self);
        if !validation.can_approve {
            tracing::warn!(iteration = number, "Release approval rejected");
            return Err(criteria_not_met(validation.failures()));
        }

        governance::approve_release(number, self);
        Ok(validation)
    }

    pub fn add_budget_transaction(&mut self, transaction: BudgetTransaction) {
        self.budget_entries.push(transaction);
    }
}
