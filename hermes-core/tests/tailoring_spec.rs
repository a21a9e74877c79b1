use chrono::NaiveDate;
use hermes_core::catalog::Catalog;
use hermes_core::ids::RoleKey;
use hermes_core::models::*;
use hermes_core::tailoring::apply_tailoring;
use hermes_core::GovernanceError;
use speculate2::speculate;

fn master(size: ProjectSize, approach: Approach) -> MasterData {
    MasterData {
        project_name: "Portal Renewal".to_string(),
        client: "Federal Office".to_string(),
        project_manager: "A. Muster".to_string(),
        user_representative: "B. Beispiel".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 8),
        budget: 100_000.0,
        approach,
        project_size: size,
        ..Default::default()
    }
}

fn required_documents(project: &Project) -> Vec<String> {
    project
        .documents
        .values()
        .filter(|d| d.required)
        .map(|d| d.name.to_string())
        .collect()
}

fn checklist_keys(project: &Project, phase: &str) -> Vec<String> {
    project
        .phase(phase)
        .expect("phase exists")
        .checklist
        .keys()
        .cloned()
        .collect()
}

speculate! {
    before {
        let catalog = Catalog::default();
    }

    describe "initialize" {
        it "rejects missing role holders" {
            let mut data = master(ProjectSize::Small, Approach::Classical);
            data.project_manager = String::new();
            data.client = "  ".to_string();

            let err = Project::initialize(data, &catalog).unwrap_err();
            match err {
                GovernanceError::MissingRoles(missing) => {
                    assert_eq!(missing, vec!["Project Manager".to_string(), "Client".to_string()]);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        it "rejects an empty project name" {
            let mut data = master(ProjectSize::Small, Approach::Classical);
            data.project_name = String::new();

            let err = Project::initialize(data, &catalog).unwrap_err();
            assert!(matches!(err, GovernanceError::MissingProjectName));
        }

        it "creates the classical phase sequence" {
            let project = Project::initialize(master(ProjectSize::Medium, Approach::Classical), &catalog)
                .expect("Failed to initialize");

            let keys: Vec<&str> = project.phases.iter().map(|p| p.key.as_str()).collect();
            assert_eq!(keys, vec!["initialization", "concept", "realization", "introduction", "completion"]);
            assert_eq!(project.master_data.current_phase, "initialization");
            assert!(project.phases.iter().all(|p| p.status == PhaseStatus::NotStarted));
        }

        it "creates the agile phase sequence" {
            let project = Project::initialize(master(ProjectSize::Medium, Approach::Agile), &catalog)
                .expect("Failed to initialize");

            let keys: Vec<&str> = project.phases.iter().map(|p| p.key.as_str()).collect();
            assert_eq!(keys, vec!["initialization", "implementation", "completion"]);
            assert_eq!(project.build_phase_key(), "implementation");
        }

        it "places mandatory milestones on their phases" {
            let project = Project::initialize(master(ProjectSize::Large, Approach::Classical), &catalog)
                .expect("Failed to initialize");

            let placed: Vec<(&str, &str)> = project
                .milestones
                .iter()
                .map(|m| (m.name.as_str(), m.phase.as_str()))
                .collect();
            assert_eq!(placed, vec![
                ("Project Initialization", "initialization"),
                ("Implementation Decision", "concept"),
                ("Phase Release Concept", "concept"),
                ("Phase Release Realization", "realization"),
                ("Project Completion", "completion"),
            ]);
            assert!(project.milestones.iter().all(|m| m.mandatory && m.status == MilestoneStatus::Planned));
        }

        it "places milestones without a matching agile phase on the first phase" {
            let project = Project::initialize(master(ProjectSize::Large, Approach::Agile), &catalog)
                .expect("Failed to initialize");

            let realization = project
                .milestones
                .iter()
                .find(|m| m.name == "Phase Release Realization")
                .expect("milestone exists");
            assert_eq!(realization.phase, "initialization");
        }

        it "creates default results from templates" {
            let project = Project::initialize(master(ProjectSize::Medium, Approach::Classical), &catalog)
                .expect("Failed to initialize");

            let charter = project.phase("initialization").unwrap().result("Project Charter").unwrap();
            assert!(charter.approval_required);
            assert_eq!(charter.responsible_role, Some(RoleKey::from("project_manager")));

            let test_concept = project.phase("realization").unwrap().result("Test Concept").unwrap();
            assert!(!test_concept.approval_required);
            assert!(test_concept.description.is_empty());
        }
    }

    describe "apply_tailoring" {
        it "marks exactly the small document list required" {
            let project = Project::initialize(master(ProjectSize::Small, Approach::Classical), &catalog)
                .expect("Failed to initialize");

            assert_eq!(required_documents(&project), vec!["Acceptance Protocol", "Project Charter"]);
        }

        it "uses simplified checklists for small projects" {
            let project = Project::initialize(master(ProjectSize::Small, Approach::Classical), &catalog)
                .expect("Failed to initialize");

            assert_eq!(
                checklist_keys(&project, "initialization"),
                vec!["Project mandate exists", "Responsible persons assigned"]
            );
            assert!(checklist_keys(&project, "realization").is_empty());
        }

        it "falls back to the comprehensive checklist when no simplified one exists" {
            let project = Project::initialize(master(ProjectSize::Small, Approach::Agile), &catalog)
                .expect("Failed to initialize");

            assert_eq!(checklist_keys(&project, "implementation").len(), 3);
        }

        it "is idempotent" {
            let mut project = Project::initialize(master(ProjectSize::Medium, Approach::Classical), &catalog)
                .expect("Failed to initialize");
            let before = project.clone();

            apply_tailoring(&mut project, &catalog);
            apply_tailoring(&mut project, &catalog);

            assert_eq!(project, before);
        }

        it "never resets a checked item" {
            let mut project = Project::initialize(master(ProjectSize::Small, Approach::Classical), &catalog)
                .expect("Failed to initialize");
            project
                .set_checklist_item("initialization", "Project mandate exists", true)
                .expect("Failed to check item");

            apply_tailoring(&mut project, &catalog);

            let phase = project.phase("initialization").unwrap();
            assert_eq!(phase.checklist.get("Project mandate exists"), Some(&true));
        }

        it "only adds items when the size grows" {
            let mut project = Project::initialize(master(ProjectSize::Small, Approach::Classical), &catalog)
                .expect("Failed to initialize");
            project
                .set_checklist_item("initialization", "Project mandate exists", true)
                .expect("Failed to check item");

            project.change_size(ProjectSize::Large, &catalog);

            let phase = project.phase("initialization").unwrap();
            assert_eq!(phase.checklist.len(), 7);
            assert_eq!(phase.checklist.get("Project mandate exists"), Some(&true));
            assert_eq!(phase.checklist.get("Project mandate verified"), Some(&false));
        }

        it "leaves documents outside both lists untouched" {
            let mut project = Project::initialize(master(ProjectSize::Small, Approach::Classical), &catalog)
                .expect("Failed to initialize");
            project.documents.get_mut("Stakeholder Analysis").unwrap().required = true;

            apply_tailoring(&mut project, &catalog);

            assert!(project.document("Stakeholder Analysis").unwrap().required);
        }

        it "turns optional documents off" {
            let mut project = Project::initialize(master(ProjectSize::Medium, Approach::Classical), &catalog)
                .expect("Failed to initialize");
            project.documents.get_mut("Migration Concept").unwrap().required = true;

            apply_tailoring(&mut project, &catalog);

            assert!(!project.document("Migration Concept").unwrap().required);
        }

        it "adds missing extra roles with a derived label" {
            let mut project = Project::initialize(master(ProjectSize::Large, Approach::Classical), &catalog)
                .expect("Failed to initialize");
            project.roles.remove("quality_manager");
            project.roles.insert(RoleKey::from("project_controller"), "Controlling".to_string());

            apply_tailoring(&mut project, &catalog);

            assert_eq!(project.roles.get("quality_manager").map(String::as_str), Some("Quality Manager"));
            assert_eq!(project.roles.get("project_controller").map(String::as_str), Some("Controlling"));
        }

        it "falls back to the medium configuration for unknown sizes" {
            let mut trimmed = Catalog::default();
            trimmed.sizes.remove(&ProjectSize::Large);
            let mut project = Project::initialize(master(ProjectSize::Small, Approach::Classical), &catalog)
                .expect("Failed to initialize");
            project.master_data.project_size = ProjectSize::Large;

            apply_tailoring(&mut project, &trimmed);

            let snapshot = project.tailoring.expect("snapshot recorded");
            assert_eq!(snapshot.applied_size, ProjectSize::Large);
            assert_eq!(snapshot.config, catalog.sizes[&ProjectSize::Medium]);
        }

        it "overwrites the tailoring snapshot" {
            let mut project = Project::initialize(master(ProjectSize::Small, Approach::Classical), &catalog)
                .expect("Failed to initialize");
            assert_eq!(project.tailoring.as_ref().unwrap().applied_size, ProjectSize::Small);

            project.change_size(ProjectSize::Medium, &catalog);

            let snapshot = project.tailoring.as_ref().unwrap();
            assert_eq!(snapshot.applied_size, ProjectSize::Medium);
            assert!(!snapshot.config.simplified_checklists);
        }

        it "reads a catalog override from disk" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("catalog.json");
            let mut custom = Catalog::default();
            custom.sizes.get_mut(&ProjectSize::Small).unwrap().extra_roles = vec![RoleKey::from("security_officer")];
            std::fs::write(&path, serde_json::to_string(&custom).unwrap()).expect("Failed to write catalog");

            let loaded = Catalog::load(&path).expect("Failed to load catalog");
            let project = Project::initialize(master(ProjectSize::Small, Approach::Classical), &loaded)
                .expect("Failed to initialize");

            assert_eq!(project.roles.get("security_officer").map(String::as_str), Some("Security Officer"));
        }
    }
}
