use chrono::NaiveDate;
use hermes_core::catalog::Catalog;
use hermes_core::commands::CreateMilestoneInput;
use hermes_core::governance::auto_advance_phase;
use hermes_core::ids::{DocumentName, PhaseKey, ResultName};
use hermes_core::models::*;
use hermes_core::progress::{budget_usage, total_progress, ProjectMetrics};
use hermes_core::GovernanceError;
use speculate2::speculate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_project(size: ProjectSize, approach: Approach, catalog: &Catalog) -> Project {
    let data = MasterData {
        project_name: "Registry Migration".to_string(),
        client: "Cantonal Office".to_string(),
        project_manager: "C. Keller".to_string(),
        user_representative: "D. Frei".to_string(),
        start_date: Some(date(2024, 2, 1)),
        budget: 100_000.0,
        approach,
        project_size: size,
        ..Default::default()
    };
    Project::initialize(data, catalog).expect("Failed to initialize")
}

/// Complete every required document of the phase, approve its
/// approval-required results and check its whole checklist.
fn satisfy_phase(project: &mut Project, key: &str) {
    let phase = project.phase(key).expect("phase exists").clone();

    let documents: Vec<DocumentName> = phase
        .required_documents
        .iter()
        .filter(|name| project.document(name.as_str()).is_some_and(|d| d.required))
        .cloned()
        .collect();
    for name in documents {
        project
            .set_document_status(name.as_str(), DocumentStatus::Completed)
            .expect("Failed to complete document");
    }

    let results: Vec<ResultName> = phase
        .results
        .values()
        .filter(|r| r.approval_required)
        .map(|r| r.name.clone())
        .collect();
    for name in results {
        project
            .set_result_status(key, name.as_str(), ResultStatus::Approved)
            .expect("Failed to approve result");
    }

    for item in phase.checklist.keys() {
        project
            .set_checklist_item(key, item, true)
            .expect("Failed to check item");
    }
}

/// Index of a milestone scoped to the phase, adding one when none exists.
fn milestone_for(project: &mut Project, key: &str) -> usize {
    match project.milestones.iter().position(|m| m.phase == key) {
        Some(idx) => idx,
        None => project.add_milestone(CreateMilestoneInput {
            name: format!("Gate {key}"),
            phase: PhaseKey::from(key),
            mandatory: true,
            date: None,
        }),
    }
}

fn spend(project: &mut Project, amount: f64, kind: TransactionKind) {
    project.add_budget_transaction(BudgetTransaction {
        date: date(2024, 4, 1),
        category: "Personnel".to_string(),
        amount,
        description: String::new(),
        kind,
    });
}

speculate! {
    before {
        let catalog = Catalog::default();
    }

    describe "a small classical project" {
        before {
            let mut project = new_project(ProjectSize::Small, Approach::Classical, &catalog);
        }

        it "walks through every phase" {
            let keys: Vec<String> = project.phases.iter().map(|p| p.key.to_string()).collect();

            for (i, key) in keys.iter().enumerate() {
                assert_eq!(project.master_data.current_phase, key.as_str());

                satisfy_phase(&mut project, key);
                let idx = milestone_for(&mut project, key);
                project.reach_milestone(idx).expect("Failed to reach milestone");

                assert!(auto_advance_phase(&mut project));
                assert_eq!(project.phases[i].status, PhaseStatus::Completed);
                if let Some(next) = project.phases.get(i + 1) {
                    assert_eq!(next.status, PhaseStatus::Active);
                }
            }

            assert_eq!(project.master_data.current_phase, "completion");
            assert!(project.phases.iter().all(|p| p.status == PhaseStatus::Completed));

            let metrics = ProjectMetrics::of(&project);
            assert_eq!(metrics.phases_completed, 5);
            assert_eq!(metrics.milestones_reached, metrics.milestone_count);
            assert!(metrics.quality_score > 0);
        }

        it "cannot advance past an unfinished phase" {
            let idx = milestone_for(&mut project, "initialization");

            let err = project.reach_milestone(idx).unwrap_err();

            assert!(matches!(err, GovernanceError::CriteriaNotMet(_)));
            assert!(!auto_advance_phase(&mut project));
            assert_eq!(project.master_data.current_phase, "initialization");
        }

        it "completes the charter result from its document" {
            project
                .set_document_status("Project Charter", DocumentStatus::Completed)
                .expect("Failed to complete document");

            let charter = project.phase("initialization").unwrap().result("Project Charter").unwrap();
            assert_eq!(charter.status, ResultStatus::Completed);
            assert!(total_progress(&project) > 0.0);
        }
    }

    describe "an agile release" {
        before {
            let mut project = new_project(ProjectSize::Medium, Approach::Agile, &catalog);
            let gate = project.add_milestone(CreateMilestoneInput {
                name: "Implementation Gate".to_string(),
                phase: "implementation".into(),
                mandatory: true,
                date: None,
            });
            satisfy_phase(&mut project, "implementation");
            project.reach_milestone(gate).expect("Failed to reach gate");

            project
                .add_iteration(
                    CreateIterationInput {
                        number: 1,
                        name: None,
                        start_date: date(2024, 3, 1),
                        end_date: date(2024, 3, 14),
                        total_user_stories: 8,
                        release_candidate: true,
                        goals: vec!["Login".to_string(), " ".to_string()],
                    },
                    &catalog,
                )
                .expect("Failed to add iteration");
            spend(&mut project, 50_000.0, TransactionKind::Actual);
        }

        it "creates the release result and report" {
            let iteration = project.iteration(1).unwrap();
            assert_eq!(iteration.name, "Sprint 1");
            assert_eq!(iteration.goals, vec!["Login".to_string()]);

            let result = project.phase("implementation").unwrap().result("Release 1").unwrap();
            assert!(result.approval_required);
            assert_eq!(result.status, ResultStatus::NotStarted);

            let report = project.document("Release Report 1").unwrap();
            assert_eq!(report.linked_result, Some(ResultName::from("Release 1")));
        }

        it "rejects a duplicate iteration number" {
            let err = project
                .add_iteration(
                    CreateIterationInput {
                        number: 1,
                        name: None,
                        start_date: date(2024, 3, 15),
                        end_date: date(2024, 3, 28),
                        total_user_stories: 0,
                        release_candidate: false,
                        goals: Vec::new(),
                    },
                    &catalog,
                )
                .unwrap_err();
            assert!(matches!(err, GovernanceError::DuplicateIteration(1)));
        }

        it "blocks approval until the report is completed" {
            let validation = project.release_validation(1).expect("iteration exists");

            assert!(!validation.release_document_complete);
            assert!(!validation.release_result_approved);
            assert!(validation.budget_healthy);
            assert!(validation.milestones_on_track);
            assert!(!validation.can_approve);
            assert!(matches!(project.approve_release(1), Err(GovernanceError::CriteriaNotMet(_))));
        }

        it "approves the release once the report is completed" {
            let reached_before = project.milestones.iter().filter(|m| m.is_reached()).count();

            let synced = project
                .set_document_status("Release Report 1", DocumentStatus::Completed)
                .expect("Failed to complete report");
            assert!(synced);

            let validation = project.release_validation(1).expect("iteration exists");
            assert!(validation.release_document_complete);
            assert!(validation.release_result_approved);
            assert!(validation.can_approve);

            project.approve_release(1).expect("Failed to approve release");

            let iteration = project.iteration(1).unwrap();
            assert!(iteration.release_approved);
            assert_eq!(iteration.status, IterationStatus::Completed);

            let result = project.phase("implementation").unwrap().result("Release 1").unwrap();
            assert_eq!(result.status, ResultStatus::Approved);
            assert_eq!(result.approval_date, Some(today()));

            let reached_after = project.milestones.iter().filter(|m| m.is_reached()).count();
            assert_eq!(reached_after, reached_before + 1);
            let release = project.milestones.last().unwrap();
            assert_eq!(release.name, "Release 1 - Sprint 1");
            assert_eq!(release.phase, "implementation");
            assert!(!release.mandatory);

            assert!(!project.release_validation(1).unwrap().release_result_approved);
            assert!(project.approve_release(1).is_err());
        }

        it "blocks approval when the budget is overdrawn" {
            project
                .set_document_status("Release Report 1", DocumentStatus::Completed)
                .expect("Failed to complete report");
            spend(&mut project, 45_000.0, TransactionKind::Actual);
            spend(&mut project, 90_000.0, TransactionKind::Planned);

            assert!((budget_usage(&project) - 0.95).abs() < 1e-9);
            let validation = project.release_validation(1).unwrap();
            assert!(!validation.budget_healthy);
            assert!(!validation.can_approve);
        }

        it "blocks approval while a mandatory build milestone is open" {
            project
                .set_document_status("Release Report 1", DocumentStatus::Completed)
                .expect("Failed to complete report");
            project.add_milestone(CreateMilestoneInput {
                name: "Security Review".to_string(),
                phase: "implementation".into(),
                mandatory: true,
                date: None,
            });

            let validation = project.release_validation(1).unwrap();
            assert!(!validation.milestones_on_track);
            assert!(!validation.can_approve);
        }

        it "refuses iterations that are not release candidates" {
            project
                .add_iteration(
                    CreateIterationInput {
                        number: 2,
                        name: Some("Hardening".to_string()),
                        start_date: date(2024, 3, 15),
                        end_date: date(2024, 3, 28),
                        total_user_stories: 4,
                        release_candidate: false,
                        goals: Vec::new(),
                    },
                    &catalog,
                )
                .expect("Failed to add iteration");

            assert!(matches!(project.approve_release(2), Err(GovernanceError::NotReleaseCandidate(2))));
        }
    }

    describe "iterations" {
        it "are rejected for classical projects" {
            let mut project = new_project(ProjectSize::Medium, Approach::Classical, &catalog);

            let err = project
                .add_iteration(
                    CreateIterationInput {
                        number: 1,
                        name: None,
                        start_date: date(2024, 3, 1),
                        end_date: date(2024, 3, 14),
                        total_user_stories: 0,
                        release_candidate: false,
                        goals: Vec::new(),
                    },
                    &catalog,
                )
                .unwrap_err();
            assert!(matches!(err, GovernanceError::NotAgile));
        }
    }

    describe "an approach change" {
        before {
            let mut project = new_project(ProjectSize::Medium, Approach::Classical, &catalog);
            spend(&mut project, 1_000.0, TransactionKind::Actual);
        }

        it "rebuilds the phases for the agile approach" {
            project
                .change_approach(Approach::Agile, &catalog)
                .expect("Failed to change approach");

            let keys: Vec<&str> = project.phases.iter().map(|p| p.key.as_str()).collect();
            assert_eq!(keys, vec!["initialization", "implementation", "completion"]);
            assert_eq!(project.master_data.approach, Approach::Agile);
            assert_eq!(project.master_data.current_phase, "initialization");
            assert_eq!(project.phases[0].status, PhaseStatus::Active);
            assert_eq!(project.budget_entries.len(), 1);
            assert!(project
                .milestones
                .iter()
                .all(|m| project.phase(m.phase.as_str()).is_some()));
        }

        it "keeps the project when the approach is unchanged" {
            let before = project.clone();

            project
                .change_approach(Approach::Classical, &catalog)
                .expect("Failed to change approach");
            assert_eq!(project, before);
        }
    }
}
