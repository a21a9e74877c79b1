//! Governors: the rules that gate phase completion, milestone reachability and
//! release approval.
//!
//! Every `validate_*` function is pure and returns a verdict struct. The
//! matching mutating functions (`complete_phase`, `reach`, `approve_release`)
//! assume the caller has consulted the verdict; they do not check again. The
//! guarded commands on [`crate::models::Project`] do that consultation.

pub mod milestone;
pub mod phase;
pub mod release;

use std::collections::BTreeMap;

use crate::ids::DocumentName;
use crate::models::{Document, Phase, ResultStatus};

pub use milestone::{reach, validate_milestone_completion, MilestoneValidation};
pub use phase::{auto_advance_phase, complete_phase, validate_phase_completion, PhaseValidation};
pub use release::{approve_release, validate_release_approval, ReleaseValidation};

/// Every approval-required result in the phase is approved.
pub(crate) fn results_approved(phase: &Phase) -> bool {
    phase
        .results
        .values()
        .all(|r| !r.approval_required || r.status == ResultStatus::Approved)
}

/// Every listed document that resolves and is required is completed.
/// Names that resolve to nothing do not block.
pub(crate) fn required_documents_completed(
    phase: &Phase,
    documents: &BTreeMap<DocumentName, Document>,
) -> bool {
    phase
        .required_documents
        .iter()
        .filter_map(|name| documents.get(name))
        .all(|doc| !doc.required || doc.is_completed())
}

/// The checklist is empty or fully checked.
pub(crate) fn checklist_completed(phase: &Phase) -> bool {
    phase.checklist.values().all(|checked| *checked)
}
