//! Command-line interface and orchestration for repo-miner
//!
//! This module implements the CLI commands and wires the other modules
//! together into end-to-end workflows. It handles argument parsing,
//! configuration management, and progress output.
//!
//! ## Commands
//!
//! - **collect**: Query the repository search API page by page, enrich each
//!   result with its release count and age, and write the combined table to
//!   `repos.csv`
//! - **analyze**: Pick one repository from a collected CSV, download and
//!   extract its source snapshot, locate the Java source root, and run the
//!   CK metrics tool over it
//! - **aggregate**: Fold one repository's CK output into the accumulated
//!   per-class, per-method, and per-repository tables
//! - **init**: Generate a default configuration file
//!
//! The `run` function parses command-line arguments using clap and routes
//! to the appropriate command handler. The `common` module provides shared
//! functionality like logging setup, configuration loading, and API token
//! resolution.

mod aggregate;
mod analyze;
mod collect;
mod common;
mod config;
mod host;
mod init;
mod run;

pub use aggregate::{AggregateArgs, aggregate_metrics};
pub use analyze::{AnalyzeArgs, analyze_repo};
pub use collect::{CollectArgs, collect_repos};
pub use common::{CommonArgs, LogLevel};
pub use config::Config;
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
