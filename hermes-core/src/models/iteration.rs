use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A sprint under the agile approach.
///
/// An iteration flagged as `release_candidate` can be approved once through
/// [`crate::governance::release`]; `release_approved` never goes back to false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Iteration {
    pub number: u32,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub total_user_stories: u32,
    #[serde(default)]
    pub completed_user_stories: u32,
    #[serde(default)]
    pub release_candidate: bool,
    #[serde(default)]
    pub release_approved: bool,
    #[serde(default)]
    pub status: IterationStatus,
    #[serde(default)]
    pub goals: Vec<String>,
}

impl Iteration {
    /// Share of completed user stories in percent, 0 when no stories are planned.
    pub fn progress(&self) -> f64 {
        if self.total_user_stories == 0 {
            return 0.0;
        }
        f64::from(self.completed_user_stories) / f64::from(self.total_user_stories) * 100.0
    }
}

/// The status of an iteration. Iterations only move forward.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IterationStatus {
    #[default]
    Planned,
    Active,
    Completed,
}

impl IterationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(Self::Planned),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Planned, Self::Active)
                | (Self::Planned, Self::Completed)
                | (Self::Active, Self::Completed)
        )
    }
}

/// Input for creating an iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIterationInput {
    pub number: u32,
    /// Defaults to `Sprint {number}`.
    pub name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub total_user_stories: u32,
    #[serde(default)]
    pub release_candidate: bool,
    #[serde(default)]
    pub goals: Vec<String>,
}
