use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::PhaseKey;

/// A gate scoped to one phase.
///
/// `phase` is a weak reference and may name a phase the project does not have;
/// such a milestone can never be reached.
///
/// # Lifecycle
/// `Planned → Reached`. `Delayed` is set only by an explicit override and can
/// still be reached afterwards. Reached is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    pub phase: PhaseKey,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub status: MilestoneStatus,
    #[serde(default = "default_mandatory")]
    pub mandatory: bool,
}

fn default_mandatory() -> bool {
    true
}

impl Milestone {
    pub fn new(name: impl Into<String>, phase: impl Into<PhaseKey>, mandatory: bool) -> Self {
        Self {
            name: name.into(),
            phase: phase.into(),
            date: None,
            status: MilestoneStatus::Planned,
            mandatory,
        }
    }

    pub fn is_reached(&self) -> bool {
        self.status == MilestoneStatus::Reached
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    Planned,
    Delayed,
    Reached,
}

impl MilestoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Delayed => "delayed",
            Self::Reached => "reached",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(Self::Planned),
            "delayed" => Some(Self::Delayed),
            "reached" => Some(Self::Reached),
            _ => None,
        }
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        self != Self::Reached && self != next
    }
}
