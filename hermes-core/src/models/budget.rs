use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An append-only entry in the project's budget ledger.
///
/// Only [`TransactionKind::Actual`] entries count toward spend; planned entries
/// are informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetTransaction {
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: TransactionKind,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    #[default]
    Actual,
    Planned,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Actual => "actual",
            Self::Planned => "planned",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "actual" => Some(Self::Actual),
            "planned" => Some(Self::Planned),
            _ => None,
        }
    }
}
