//! Size-driven tailoring.
//!
//! Tailoring merges what a project size demands into an existing project. It
//! is monotonic: checklist items are only ever added, never removed or reset,
//! so applying it repeatedly is harmless.

use crate::catalog::Catalog;
use crate::models::{Project, TailoringSnapshot};

/// Apply the size configuration for `project.master_data.project_size`.
///
/// - Documents named in the required list become required, those in the
///   optional list become optional; all others keep their flag.
/// - Every phase gains the missing items of its checklist variant with value
///   `false`. Existing items and their values are left alone.
/// - Extra roles missing from the role map are added with a derived label.
/// - The tailoring snapshot is overwritten.
pub fn apply_tailoring(project: &mut Project, catalog: &Catalog) {
    let size = project.master_data.project_size;
    let config = catalog.size_config(size);

    for (name, doc) in project.documents.iter_mut() {
        if config.required_documents.contains(name) {
            doc.required = true;
        } else if config.optional_documents.contains(name) {
            doc.required = false;
        }
    }

    for phase in project.phases.iter_mut() {
        let items = catalog.checklist_for(phase.key.as_str(), config.simplified_checklists);
        for item in items {
            if !phase.checklist.contains_key(item) {
                phase.checklist.insert(item.clone(), false);
            }
        }
    }

    for role in &config.extra_roles {
        if !project.roles.contains_key(role) {
            project.roles.insert(role.clone(), role.default_label());
        }
    }

    tracing::debug!(
        size = size.as_str(),
        simplified = config.simplified_checklists,
        "Tailoring applied"
    );

    project.tailoring = Some(TailoringSnapshot {
        applied_size: size,
        config,
    });
}
