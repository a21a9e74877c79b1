//! Project initialization from master data and the catalog.

use crate::catalog::Catalog;
use crate::error::GovernanceError;
use crate::models::{Document, MasterData, Milestone, Phase, Project};
use crate::tailoring::apply_tailoring;

/// Labels of the mandatory role holders that are still empty.
pub fn validate_minimal_roles(master_data: &MasterData) -> Vec<String> {
    let mut missing = Vec::new();
    if master_data.project_manager.trim().is_empty() {
        missing.push("Project Manager".to_string());
    }
    if master_data.user_representative.trim().is_empty() {
        missing.push("User Representative".to_string());
    }
    if master_data.client.trim().is_empty() {
        missing.push("Client".to_string());
    }
    missing
}

impl Project {
    /// Build a new project for the given master data.
    ///
    /// Creates the phase sequence of the chosen approach with its standard
    /// results and required-document lists, the standard documents plus every
    /// document the size configuration names, and the default roles. Documents
    /// start optional and tailoring then marks the size's required ones. One
    /// planned milestone is created per mandatory milestone of the size; a
    /// milestone with no matching phase in this approach lands on the first
    /// phase.
    ///
    /// The first phase becomes `current_phase` but is not activated.
    pub fn initialize(master_data: MasterData, catalog: &Catalog) -> Result<Self, GovernanceError> {
        let missing = validate_minimal_roles(&master_data);
        if !missing.is_empty() {
            return Err(GovernanceError::MissingRoles(missing));
        }
        if master_data.project_name.trim().is_empty() {
            return Err(GovernanceError::MissingProjectName);
        }

        let approach = master_data.approach;
        let size = master_data.project_size;
        let mut project = Project {
            master_data,
            roles: catalog.roles.clone(),
            ..Default::default()
        };

        for template in catalog.phase_templates(approach) {
            let mut phase = Phase::new(template.key.clone(), template.label.clone());
            if let Some(docs) = catalog.phase_documents.get(&template.key) {
                phase.required_documents = docs.clone();
            }
            for name in catalog.phase_results.get(&template.key).into_iter().flatten() {
                phase.add_result(catalog.new_result(name));
            }
            project.phases.push(phase);
        }

        for standard in &catalog.standard_documents {
            let mut doc = Document::new(standard.name.clone(), standard.responsible.clone());
            doc.required = false;
            doc.linked_result = standard.linked_result.clone();
            project.documents.insert(standard.name.clone(), doc);
        }

        let config = catalog.size_config(size);
        for name in config
            .required_documents
            .iter()
            .chain(config.optional_documents.iter())
        {
            project.documents.entry(name.clone()).or_insert_with(|| {
                let mut doc = Document::new(name.clone(), "Project Manager");
                doc.required = false;
                doc
            });
        }

        apply_tailoring(&mut project, catalog);

        if let Some(first) = project.phases.first().map(|p| p.key.clone()) {
            let milestones: Vec<Milestone> = config
                .mandatory_milestones
                .iter()
                .map(|name| {
                    let phase = catalog
                        .milestone_phase(name, |key| project.phase(key).is_some())
                        .cloned()
                        .unwrap_or_else(|| first.clone());
                    Milestone::new(name.clone(), phase, true)
                })
                .collect();
            project.milestones = milestones;
            project.master_data.current_phase = first;
        }

        tracing::info!(
            project = %project.master_data.project_name,
            approach = approach.as_str(),
            size = size.as_str(),
            phases = project.phases.len(),
            "Project initialized"
        );

        Ok(project)
    }
}
