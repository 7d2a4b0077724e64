#![doc(hidden)]

//! Core library for repo-miner
//!
//! repo-miner collects repository metadata from a code-hosting platform's
//! search API, enriches it with release counts and repository age, and runs
//! the CK static-analysis tool over a selected repository's Java sources,
//! folding CK's per-class output into running aggregate CSV files.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`github`]: Hosting API client, search, releases, and archive download
//! - [`collect`]: Record normalization and enrichment for the collector
//! - [`analyze`]: Repository selection, source-root heuristic, CK invocation,
//!   and metrics aggregation

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod analyze;
#[cfg(not(any(debug_assertions, test)))]
mod analyze;

#[cfg(any(debug_assertions, test))]
pub mod collect;
#[cfg(not(any(debug_assertions, test)))]
mod collect;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod github;
#[cfg(not(any(debug_assertions, test)))]
mod github;

pub use crate::commands::{Host, run};
