//! Document → result status propagation.

use crate::models::{Document, DocumentStatus, Project, ResultStatus};

/// Push a completed document's status onto its linked result.
///
/// Does nothing unless the document is completed and linked. Phases are
/// scanned in sequence and only the first phase holding a result with the
/// linked name is considered. A result that is already completed or approved
/// is left untouched, and nothing here ever moves a result backwards.
///
/// Returns true when a result was updated.
pub fn sync_document_to_result(document: &Document, project: &mut Project) -> bool {
    if document.status != DocumentStatus::Completed {
        return false;
    }
    let Some(linked) = document.linked_result.as_ref().filter(|name| !name.is_empty()) else {
        return false;
    };

    let Some(phase) = project
        .phases
        .iter_mut()
        .find(|phase| phase.results.contains_key(linked))
    else {
        tracing::debug!(document = %document.name, result = %linked, "Linked result not found");
        return false;
    };

    let Some(result) = phase.results.get_mut(linked) else {
        return false;
    };
    if result.is_done() {
        return false;
    }

    result.status = ResultStatus::Completed;
    tracing::debug!(
        document = %document.name,
        phase = %phase.key,
        result = %linked,
        "Result completed from document"
    );
    true
}
