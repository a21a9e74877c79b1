//! Tailoring and governance engine for projects run under HERMES.
//!
//! The engine works on a single in-memory [`models::Project`] that the caller
//! owns and passes by reference:
//!
//! - [`tailoring`] derives what a project size requires and merges it in.
//! - [`sync`] pushes completed documents onto the results they back.
//! - [`progress`] computes the derived metrics the governors use.
//! - [`governance`] decides whether a phase may close, a milestone may be
//!   reached and a release may be approved.
//!
//! Governance checks never fail; they return verdicts. The guarded commands in
//! [`commands`] consult those verdicts and return [`GovernanceError`] when an
//! action is not allowed.

pub mod catalog;
pub mod commands;
pub mod error;
pub mod governance;
pub mod ids;
mod init;
pub mod models;
pub mod progress;
pub mod sync;
pub mod tailoring;

pub use catalog::Catalog;
pub use error::{CatalogError, GovernanceError};
pub use init::validate_minimal_roles;
