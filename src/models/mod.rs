//! Store and API records around the governance engine.
//!
//! The engine's [`hermes_core::models::Project`] is the aggregate; this crate
//! only adds what the server needs on top of it:
//!
//! - [`StoredProject`]: a project with its store identity and timestamps.
//! - [`ProjectSummary`]: the row-level view used by listings.
//! - [`ProjectHealth`] and [`Statistics`]: read-only reports.
//! - Request bodies for the guarded commands.

mod project;
mod requests;

pub use project::*;
pub use requests::*;
