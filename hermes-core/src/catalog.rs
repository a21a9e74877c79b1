//! Static tailoring catalog.
//!
//! The catalog holds everything tailoring and initialization read but never
//! mutate: size configurations, checklist variants, result templates, default
//! roles, the phase sequences of both approaches, and where standard results,
//! documents and mandatory milestones are placed. [`Catalog::default`] is the
//! built-in HERMES catalog; [`Catalog::load`] reads a JSON override.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::ids::{DocumentName, PhaseKey, ResultName, RoleKey};
use crate::models::{Approach, PhaseResult, ProjectSize};

/// Phase that holds iterative work under the agile approach.
pub const BUILD_PHASE: &str = "implementation";
/// Build phase used when a project has no `implementation` phase.
pub const BUILD_PHASE_FALLBACK: &str = "realization";

/// Tailoring rules for one project size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeConfig {
    #[serde(default)]
    pub required_documents: Vec<DocumentName>,
    #[serde(default)]
    pub optional_documents: Vec<DocumentName>,
    #[serde(default)]
    pub simplified_checklists: bool,
    #[serde(default)]
    pub mandatory_milestones: Vec<String>,
    #[serde(default)]
    pub extra_roles: Vec<RoleKey>,
}

/// Checklist variants for one phase. A phase without a simplified variant uses
/// the comprehensive one even when simplification is requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChecklistSet {
    #[serde(default)]
    pub comprehensive: Vec<String>,
    #[serde(default)]
    pub simplified: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTemplate {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub approval_required: bool,
    #[serde(default)]
    pub role: Option<RoleKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTemplate {
    pub key: PhaseKey,
    pub label: String,
}

/// A document every project starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardDocument {
    pub name: DocumentName,
    pub responsible: String,
    #[serde(default)]
    pub linked_result: Option<ResultName>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub sizes: BTreeMap<ProjectSize, SizeConfig>,
    #[serde(default)]
    pub checklists: BTreeMap<PhaseKey, ChecklistSet>,
    #[serde(default)]
    pub result_templates: BTreeMap<ResultName, ResultTemplate>,
    #[serde(default)]
    pub roles: BTreeMap<RoleKey, String>,
    pub classical_phases: Vec<PhaseTemplate>,
    pub agile_phases: Vec<PhaseTemplate>,
    /// Results created in each phase at initialization.
    #[serde(default)]
    pub phase_results: BTreeMap<PhaseKey, Vec<ResultName>>,
    /// Documents each phase lists as required.
    #[serde(default)]
    pub phase_documents: BTreeMap<PhaseKey, Vec<DocumentName>>,
    #[serde(default)]
    pub standard_documents: Vec<StandardDocument>,
    /// Candidate phases for each mandatory milestone, in preference order.
    #[serde(default)]
    pub milestone_phases: BTreeMap<String, Vec<PhaseKey>>,
}

impl Catalog {
    /// Read a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = serde_json::from_str(&content)?;
        Ok(catalog)
    }

    /// Size configuration for `size`, falling back to the medium configuration
    /// and then to an empty one.
    pub fn size_config(&self, size: ProjectSize) -> SizeConfig {
        self.sizes
            .get(&size)
            .or_else(|| {
                tracing::debug!(size = size.as_str(), "No size config, falling back to medium");
                self.sizes.get(&ProjectSize::Medium)
            })
            .cloned()
            .unwrap_or_default()
    }

    /// Checklist items for a phase. Unknown phases have no checklist.
    pub fn checklist_for(&self, phase: &str, simplified: bool) -> &[String] {
        let Some(set) = self.checklists.get(phase) else {
            return &[];
        };
        match (&set.simplified, simplified) {
            (Some(items), true) => items,
            _ => &set.comprehensive,
        }
    }

    pub fn phase_templates(&self, approach: Approach) -> &[PhaseTemplate] {
        match approach {
            Approach::Classical => &self.classical_phases,
            Approach::Agile => &self.agile_phases,
        }
    }

    pub fn result_template(&self, name: &str) -> Option<&ResultTemplate> {
        self.result_templates.get(name)
    }

    /// A fresh result named `name`, filled from its template when one exists.
    pub fn new_result(&self, name: &ResultName) -> PhaseResult {
        let mut result = PhaseResult::new(name.clone());
        if let Some(template) = self.result_template(name.as_str()) {
            result.description = template.description.clone();
            result.approval_required = template.approval_required;
            result.responsible_role = template.role.clone();
        }
        result
    }

    /// First candidate phase for a milestone that `exists` accepts.
    pub fn milestone_phase(&self, milestone: &str, exists: impl Fn(&str) -> bool) -> Option<&PhaseKey> {
        self.milestone_phases
            .get(milestone)?
            .iter()
            .find(|key| exists(key.as_str()))
    }
}

fn names<T: From<&'static str>>(items: &[&'static str]) -> Vec<T> {
    items.iter().map(|s| T::from(*s)).collect()
}

fn items(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn phases(entries: &[(&'static str, &str)]) -> Vec<PhaseTemplate> {
    entries
        .iter()
        .map(|(key, label)| PhaseTemplate {
            key: PhaseKey::from(*key),
            label: label.to_string(),
        })
        .collect()
}

fn template(description: &str, approval_required: bool, role: &'static str) -> ResultTemplate {
    ResultTemplate {
        description: description.to_string(),
        approval_required,
        role: Some(RoleKey::from(role)),
    }
}

fn standard(name: &'static str, responsible: &str, linked: bool) -> StandardDocument {
    StandardDocument {
        name: DocumentName::from(name),
        responsible: responsible.to_string(),
        linked_result: linked.then(|| ResultName::from(name)),
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let sizes = BTreeMap::from([
            (
                ProjectSize::Small,
                SizeConfig {
                    required_documents: names(&["Project Charter", "Acceptance Protocol"]),
                    optional_documents: names(&["Study", "Migration Concept"]),
                    simplified_checklists: true,
                    mandatory_milestones: items(&["Project Initialization", "Project Completion"]),
                    extra_roles: vec![],
                },
            ),
            (
                ProjectSize::Medium,
                SizeConfig {
                    required_documents: names(&[
                        "Project Charter",
                        "Project Management Plan",
                        "Requirements Specification",
                        "Solution Concept",
                        "Acceptance Protocol",
                    ]),
                    optional_documents: names(&["Migration Concept"]),
                    simplified_checklists: false,
                    mandatory_milestones: items(&[
                        "Project Initialization",
                        "Implementation Decision",
                        "Project Completion",
                    ]),
                    extra_roles: names(&["project_controller"]),
                },
            ),
            (
                ProjectSize::Large,
                SizeConfig {
                    required_documents: names(&[
                        "Project Charter",
                        "Project Management Plan",
                        "Requirements Specification",
                        "Solution Concept",
                        "Test Concept",
                        "Acceptance Protocol",
                        "Project Completion Report",
                    ]),
                    optional_documents: vec![],
                    simplified_checklists: false,
                    mandatory_milestones: items(&[
                        "Project Initialization",
                        "Implementation Decision",
                        "Phase Release Concept",
                        "Phase Release Realization",
                        "Project Completion",
                    ]),
                    extra_roles: names(&["project_controller", "quality_manager"]),
                },
            ),
        ]);

        let checklists = BTreeMap::from([
            (
                PhaseKey::from("initialization"),
                ChecklistSet {
                    comprehensive: items(&[
                        "Project mandate verified",
                        "Stakeholder analysis performed",
                        "Budget & resources sufficient",
                        "High-level risks identified",
                        "Project approach decided",
                    ]),
                    simplified: Some(items(&["Project mandate exists", "Responsible persons assigned"])),
                },
            ),
            (
                PhaseKey::from("concept"),
                ChecklistSet {
                    comprehensive: items(&[
                        "Requirements validated with users",
                        "Solution alternatives assessed",
                        "Economic efficiency proven",
                        "Security & protection considered",
                    ]),
                    simplified: Some(items(&["Requirements discussed", "Solution direction agreed"])),
                },
            ),
            (
                PhaseKey::from("implementation"),
                ChecklistSet {
                    comprehensive: items(&[
                        "Test strategy defined",
                        "Migration concept finalized",
                        "Operational readiness planned",
                    ]),
                    simplified: None,
                },
            ),
            (
                PhaseKey::from("completion"),
                ChecklistSet {
                    comprehensive: items(&[
                        "Operational handover completed",
                        "Final acceptance signed",
                        "Lessons learned documented",
                        "Financial closure performed",
                    ]),
                    simplified: Some(items(&["Handover done", "Acceptance obtained"])),
                },
            ),
        ]);

        let result_templates = BTreeMap::from([
            (
                ResultName::from("Project Charter"),
                template("Formal project initiation document", true, "project_manager"),
            ),
            (
                ResultName::from("Stakeholder Analysis"),
                template("Identification and analysis of stakeholders", false, "project_manager"),
            ),
            (
                ResultName::from("Requirements Specification"),
                template("Detailed requirements", true, "user_representative"),
            ),
            (
                ResultName::from("Solution Concept"),
                template("High-level solution description", true, "project_manager"),
            ),
            (
                ResultName::from("Release 1"),
                template("First product release", true, "project_manager"),
            ),
            (
                ResultName::from("Release 2"),
                template("Second product release", true, "project_manager"),
            ),
        ]);

        let roles = BTreeMap::from([
            (RoleKey::from("client"), "Client".to_string()),
            (RoleKey::from("project_manager"), "Project Manager".to_string()),
            (RoleKey::from("user_representative"), "User Representative".to_string()),
            (RoleKey::from("project_controller"), "Project Controller".to_string()),
            (RoleKey::from("quality_manager"), "Quality Manager".to_string()),
        ]);

        let phase_results = BTreeMap::from([
            (
                PhaseKey::from("initialization"),
                names(&["Project Charter", "Stakeholder Analysis"]),
            ),
            (
                PhaseKey::from("concept"),
                names(&["Requirements Specification", "Solution Concept"]),
            ),
            (PhaseKey::from("realization"), names(&["Test Concept"])),
            (PhaseKey::from("implementation"), names(&["Test Concept"])),
            (PhaseKey::from("introduction"), names(&["Acceptance Protocol"])),
        ]);

        let phase_documents = BTreeMap::from([
            (
                PhaseKey::from("initialization"),
                names(&["Project Charter", "Project Management Plan"]),
            ),
            (
                PhaseKey::from("concept"),
                names(&["Requirements Specification", "Solution Concept", "Study"]),
            ),
            (
                PhaseKey::from("realization"),
                names(&["Test Concept", "Migration Concept"]),
            ),
            (PhaseKey::from("implementation"), names(&["Test Concept"])),
            (PhaseKey::from("introduction"), names(&["Acceptance Protocol"])),
            (
                PhaseKey::from("completion"),
                names(&["Acceptance Protocol", "Project Completion Report"]),
            ),
        ]);

        let standard_documents = vec![
            standard("Project Charter", "Project Manager", true),
            standard("Stakeholder Analysis", "Project Manager", true),
            standard("Requirements Specification", "User Representative", true),
            standard("Solution Concept", "Project Manager", true),
            standard("Acceptance Protocol", "Client", false),
            standard("Project Completion Report", "Project Manager", false),
        ];

        let milestone_phases = BTreeMap::from([
            ("Project Initialization".to_string(), names(&["initialization"])),
            (
                "Implementation Decision".to_string(),
                names(&["concept", "initialization"]),
            ),
            ("Phase Release Concept".to_string(), names(&["concept"])),
            ("Phase Release Realization".to_string(), names(&["realization"])),
            ("Project Completion".to_string(), names(&["completion"])),
        ]);

        Self {
            sizes,
            checklists,
            result_templates,
            roles,
            classical_phases: phases(&[
                ("initialization", "Initialization"),
                ("concept", "Concept"),
                ("realization", "Realization"),
                ("introduction", "Introduction"),
                ("completion", "Completion"),
            ]),
            agile_phases: phases(&[
                ("initialization", "Initialization"),
                ("implementation", "Implementation"),
                ("completion", "Completion"),
            ]),
            phase_results,
            phase_documents,
            standard_documents,
            milestone_phases,
        }
    }
}
