//! Derived project metrics.
//!
//! All functions are pure and total: empty inputs and zero budgets yield 0.

use serde::{Deserialize, Serialize};

use crate::models::{Phase, Project, ResultStatus, TransactionKind};

/// Share budget usage may reach before releases are held back.
pub const BUDGET_HEALTH_LIMIT: f64 = 0.9;

/// Percentage of results in the phase that are completed or approved.
pub fn phase_progress(phase: &Phase) -> f64 {
    let total = phase.results.len();
    if total == 0 {
        return 0.0;
    }
    let done = phase.results.values().filter(|r| r.is_done()).count();
    done as f64 / total as f64 * 100.0
}

/// Mean of [`phase_progress`] over all phases.
pub fn total_progress(project: &Project) -> f64 {
    if project.phases.is_empty() {
        return 0.0;
    }
    let sum: f64 = project.phases.iter().map(phase_progress).sum();
    sum / project.phases.len() as f64
}

/// Sum of actual spend.
pub fn actual_costs(project: &Project) -> f64 {
    project
        .budget_entries
        .iter()
        .filter(|t| t.kind == TransactionKind::Actual)
        .map(|t| t.amount)
        .sum()
}

/// Actual spend as a fraction of the planned budget.
pub fn budget_usage(project: &Project) -> f64 {
    let budget = project.master_data.budget;
    if budget <= 0.0 {
        return 0.0;
    }
    actual_costs(project) / budget
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Coarse risk bucket of [`total_progress`].
pub fn risk_level(project: &Project) -> RiskLevel {
    let progress = total_progress(project);
    if progress > 80.0 {
        RiskLevel::Low
    } else if progress > 50.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Integer percentage of approved results and checked checklist items over
/// all results and checklist items.
pub fn quality_score(project: &Project) -> u32 {
    let mut total = 0usize;
    let mut done = 0usize;
    for phase in &project.phases {
        total += phase.results.len();
        done += phase
            .results
            .values()
            .filter(|r| r.status == ResultStatus::Approved)
            .count();
        total += phase.checklist.len();
        done += phase.checklist.values().filter(|checked| **checked).count();
    }
    if total == 0 {
        return 0;
    }
    (done * 100 / total) as u32
}

/// Snapshot of all metrics, as reported by the health endpoint and the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetrics {
    pub total_progress: f64,
    pub budget_usage: f64,
    pub actual_costs: f64,
    pub risk_level: RiskLevel,
    pub quality_score: u32,
    pub phases_completed: usize,
    pub phase_count: usize,
    pub milestones_reached: usize,
    pub milestone_count: usize,
}

impl ProjectMetrics {
    pub fn of(project: &Project) -> Self {
        Self {
            total_progress: total_progress(project),
            budget_usage: budget_usage(project),
            actual_costs: actual_costs(project),
            risk_level: risk_level(project),
            quality_score: quality_score(project),
            phases_completed: project
                .phases
                .iter()
                .filter(|p| p.status == crate::models::PhaseStatus::Completed)
                .count(),
            phase_count: project.phases.len(),
            milestones_reached: project.milestones.iter().filter(|m| m.is_reached()).count(),
            milestone_count: project.milestones.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetTransaction, PhaseResult};
    use chrono::NaiveDate;

    fn spend(amount: f64, kind: TransactionKind) -> BudgetTransaction {
        BudgetTransaction {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            category: "Personnel".to_string(),
            amount,
            description: String::new(),
            kind,
        }
    }

    /// A phase holding `total` results of which the first `done` are completed.
    fn phase_with(key: &str, done: usize, total: usize) -> Phase {
        let mut phase = Phase::new(key, key);
        for i in 0..total {
            let mut result = PhaseResult::new(format!("{key} {i}"));
            if i < done {
                result.status = ResultStatus::Completed;
            }
            phase.add_result(result);
        }
        phase
    }

    fn project_of(phases: Vec<Phase>) -> Project {
        Project {
            phases,
            ..Default::default()
        }
    }

    #[test]
    fn test_phase_without_results_has_no_progress() {
        assert_eq!(phase_progress(&Phase::new("concept", "Concept")), 0.0);
    }

    #[test]
    fn test_phase_progress_counts_completed_and_approved() {
        let mut phase = phase_with("concept", 1, 4);
        let mut approved = PhaseResult::new("Approved");
        approved.status = ResultStatus::Approved;
        phase.add_result(approved);
        // 2 of 5
        assert_eq!(phase_progress(&phase), 40.0);
    }

    #[test]
    fn test_project_without_phases_has_no_progress() {
        assert_eq!(total_progress(&Project::default()), 0.0);
    }

    #[test]
    fn test_total_progress_averages_every_phase() {
        let project = project_of(vec![
            phase_with("initialization", 2, 2),
            phase_with("concept", 1, 2),
            Phase::new("completion", "Completion"),
        ]);
        assert_eq!(total_progress(&project), 50.0);
    }

    #[test]
    fn test_risk_level_boundaries() {
        let risk = |done, total| risk_level(&project_of(vec![phase_with("concept", done, total)]));

        assert_eq!(risk(17, 20), RiskLevel::Low);
        assert_eq!(risk(4, 5), RiskLevel::Medium);
        assert_eq!(risk(3, 5), RiskLevel::Medium);
        assert_eq!(risk(1, 2), RiskLevel::High);
        assert_eq!(risk_level(&Project::default()), RiskLevel::High);
    }

    #[test]
    fn test_quality_score_without_items_is_zero() {
        assert_eq!(quality_score(&Project::default()), 0);
        let project = project_of(vec![Phase::new("concept", "Concept")]);
        assert_eq!(quality_score(&project), 0);
    }

    #[test]
    fn test_quality_score_truncates() {
        let mut phase = Phase::new("concept", "Concept");
        let mut approved = PhaseResult::new("A");
        approved.status = ResultStatus::Approved;
        phase.add_result(approved);
        phase.add_result(PhaseResult::new("B"));
        phase.checklist.insert("x".to_string(), false);
        let project = Project {
            phases: vec![phase],
            ..Default::default()
        };
        // 1 of 3
        assert_eq!(quality_score(&project), 33);
    }

    #[test]
    fn test_planned_entries_do_not_count() {
        let mut project = Project::default();
        project.master_data.budget = 1000.0;
        project.budget_entries.push(spend(250.0, TransactionKind::Actual));
        project.budget_entries.push(spend(700.0, TransactionKind::Planned));
        assert_eq!(budget_usage(&project), 0.25);
    }

    #[test]
    fn test_zero_budget_is_zero_usage() {
        let mut project = Project::default();
        project.master_data.budget = 0.0;
        project.budget_entries.push(spend(10.0, TransactionKind::Actual));
        assert_eq!(actual_costs(&project), 10.0);
        assert_eq!(budget_usage(&project), 0.0);
    }

    #[test]
    fn test_negative_budget_is_zero_usage() {
        let mut project = Project::default();
        project.master_data.budget = -5.0;
        project.budget_entries.push(spend(10.0, TransactionKind::Actual));
        assert_eq!(budget_usage(&project), 0.0);
    }
}
