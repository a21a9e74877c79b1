//! Domain models for a HERMES project.
//!
//! # Core Concepts
//!
//! - [`Project`]: The root aggregate. Everything below is owned by exactly one project.
//! - [`Phase`]: A stage of the methodology sequence. Phase order is significant;
//!   it defines which phase follows which.
//! - [`PhaseResult`]: A deliverable owned by one phase, optionally requiring approval.
//! - [`Document`]: A tracked artifact. Documents reference results and phases
//!   reference documents by name only; those references may dangle.
//! - [`Milestone`]: A gate scoped to one phase.
//! - [`Iteration`]: A sprint under the agile approach, possibly a release candidate.
//! - [`BudgetTransaction`]: Append-only budget ledger entry.

mod budget;
mod document;
mod iteration;
mod milestone;
mod phase;
mod project;

pub use budget::*;
pub use document::*;
pub use iteration::*;
pub use milestone::*;
pub use phase::*;
pub use project::*;

use chrono::NaiveDate;

/// The date used when the engine stamps start, end, approval and reached dates.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
