use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BudgetTransaction, Document, Iteration, Milestone, Phase};
use crate::catalog::{SizeConfig, BUILD_PHASE, BUILD_PHASE_FALLBACK};
use crate::ids::{DocumentName, PhaseKey, RoleKey};

/// The root aggregate of a HERMES project.
///
/// A project is an explicit value owned by the caller; every engine operation
/// takes it by reference. `phases` is ordered and the order is the methodology
/// sequence. The remaining collections carry no meaningful order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub master_data: MasterData,
    #[serde(default)]
    pub phases: Vec<Phase>,
    #[serde(default)]
    pub documents: BTreeMap<DocumentName, Document>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub iterations: Vec<Iteration>,
    #[serde(default)]
    pub budget_entries: Vec<BudgetTransaction>,
    /// Role key → display label.
    #[serde(default)]
    pub roles: BTreeMap<RoleKey, String>,
    #[serde(default)]
    pub tailoring: Option<TailoringSnapshot>,
}

impl Project {
    pub fn phase(&self, key: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.key == key)
    }

    pub fn phase_mut(&mut self, key: &str) -> Option<&mut Phase> {
        self.phases.iter_mut().find(|p| p.key == key)
    }

    pub fn phase_index(&self, key: &str) -> Option<usize> {
        self.phases.iter().position(|p| p.key == key)
    }

    /// Key of the phase following `key` in sequence, if any.
    pub fn next_phase_key(&self, key: &str) -> Option<&PhaseKey> {
        let idx = self.phase_index(key)?;
        self.phases.get(idx + 1).map(|p| &p.key)
    }

    pub fn current_phase(&self) -> Option<&Phase> {
        self.phase(self.master_data.current_phase.as_str())
    }

    /// The phase holding iterative work: `implementation` when the project has
    /// one, `realization` otherwise. The returned key may not resolve.
    pub fn build_phase_key(&self) -> PhaseKey {
        if self.phase(BUILD_PHASE).is_some() {
            PhaseKey::from(BUILD_PHASE)
        } else {
            PhaseKey::from(BUILD_PHASE_FALLBACK)
        }
    }

    pub fn document(&self, name: &str) -> Option<&Document> {
        self.documents.get(name)
    }

    pub fn iteration(&self, number: u32) -> Option<&Iteration> {
        self.iterations.iter().find(|it| it.number == number)
    }

    pub fn iteration_mut(&mut self, number: u32) -> Option<&mut Iteration> {
        self.iterations.iter_mut().find(|it| it.number == number)
    }

    pub fn is_agile(&self) -> bool {
        self.master_data.approach == Approach::Agile
    }
}

/// Scalar project attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterData {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub project_manager: String,
    #[serde(default)]
    pub user_representative: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Planned budget (CHF).
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub approach: Approach,
    #[serde(default)]
    pub project_size: ProjectSize,
    #[serde(default = "default_current_phase")]
    pub current_phase: PhaseKey,
}

fn default_current_phase() -> PhaseKey {
    PhaseKey::from("initialization")
}

impl Default for MasterData {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            client: String::new(),
            project_manager: String::new(),
            user_representative: String::new(),
            start_date: None,
            budget: 0.0,
            approach: Approach::default(),
            project_size: ProjectSize::default(),
            current_phase: default_current_phase(),
        }
    }
}

/// Project approach.
///
/// - `Classical`: sequential phases, no iterations
/// - `Agile`: the iterative approach; enables iterations and release approval
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Approach {
    #[default]
    Classical,
    #[serde(alias = "iterative")]
    Agile,
}

impl Approach {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classical => "classical",
            Self::Agile => "agile",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "classical" => Some(Self::Classical),
            "agile" | "iterative" => Some(Self::Agile),
            _ => None,
        }
    }
}

/// Declared project size, the input to tailoring.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl ProjectSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "small" => Some(Self::Small),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            _ => None,
        }
    }
}

/// Record of the last tailoring applied to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoringSnapshot {
    pub applied_size: ProjectSize,
    pub config: SizeConfig,
}
