use serde::{Deserialize, Serialize};

use crate::ids::{DocumentName, ResultName};

/// A tracked project document.
///
/// `required` is owned by tailoring. When `linked_result` is set, completing the
/// document pushes the named result forward (see [`crate::sync`]). The link is
/// by name and may point at a result that does not exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: DocumentName,
    /// Label of the responsible role.
    #[serde(default)]
    pub responsible: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub linked_result: Option<ResultName>,
    #[serde(default)]
    pub content: String,
}

fn default_required() -> bool {
    true
}

impl Document {
    pub fn new(name: impl Into<DocumentName>, responsible: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responsible: responsible.into(),
            status: DocumentStatus::NotStarted,
            required: true,
            linked_result: None,
            content: String::new(),
        }
    }

    pub fn linked_to(mut self, result: impl Into<ResultName>) -> Self {
        self.linked_result = Some(result.into());
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == DocumentStatus::Completed
    }
}

/// The status of a document. Any status may follow any other.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}
