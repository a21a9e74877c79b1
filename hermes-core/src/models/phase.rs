use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{DocumentName, PhaseKey, ResultName, RoleKey};

/// A stage in the project's methodology sequence.
///
/// A phase owns its results exclusively. `required_documents` are names looked
/// up in [`super::Project::documents`]; a name that resolves to nothing is not
/// an error. The checklist maps item text to whether it has been checked.
///
/// # Lifecycle
/// `NotStarted → Active → Completed`. Completed is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub key: PhaseKey,
    /// Display label, e.g. `Concept`.
    pub name: String,
    #[serde(default)]
    pub results: BTreeMap<ResultName, PhaseResult>,
    #[serde(default)]
    pub required_documents: Vec<DocumentName>,
    #[serde(default)]
    pub checklist: BTreeMap<String, bool>,
    #[serde(default)]
    pub status: PhaseStatus,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Phase {
    pub fn new(key: impl Into<PhaseKey>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            results: BTreeMap::new(),
            required_documents: Vec::new(),
            checklist: BTreeMap::new(),
            status: PhaseStatus::NotStarted,
            start_date: None,
            end_date: None,
        }
    }

    /// Insert a result, replacing any result with the same name.
    pub fn add_result(&mut self, result: PhaseResult) {
        self.results.insert(result.name.clone(), result);
    }

    pub fn result(&self, name: &str) -> Option<&PhaseResult> {
        self.results.get(name)
    }

    pub fn result_mut(&mut self, name: &str) -> Option<&mut PhaseResult> {
        self.results.get_mut(name)
    }
}

/// The status of a phase.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    #[default]
    NotStarted,
    Active,
    Completed,
}

impl PhaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(Self::NotStarted),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Phases only move forward. A not-started phase may be completed directly.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::NotStarted, Self::Active)
                | (Self::NotStarted, Self::Completed)
                | (Self::Active, Self::Completed)
        )
    }
}

/// A deliverable tracked inside one phase.
///
/// `approval_date` is stamped only when the result enters
/// [`ResultStatus::Approved`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseResult {
    pub name: ResultName,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ResultStatus,
    #[serde(default)]
    pub approval_required: bool,
    #[serde(default)]
    pub approval_date: Option<NaiveDate>,
    #[serde(default)]
    pub responsible_role: Option<RoleKey>,
}

impl PhaseResult {
    pub fn new(name: impl Into<ResultName>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            status: ResultStatus::NotStarted,
            approval_required: false,
            approval_date: None,
            responsible_role: None,
        }
    }

    pub fn requiring_approval(mut self) -> Self {
        self.approval_required = true;
        self
    }

    /// True for completed and approved results.
    pub fn is_done(&self) -> bool {
        matches!(self.status, ResultStatus::Completed | ResultStatus::Approved)
    }
}

/// The status of a result.
///
/// - `NotStarted`, `InProgress`, `Completed`: freely interchangeable
/// - `Approved`: terminal, supersedes `Completed`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Approved,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Approved => "approved",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "approved" => Some(Self::Approved),
            _ => None,
        }
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        self != Self::Approved || next == Self::Approved
    }
}
