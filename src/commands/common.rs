//! Shared plumbing for repo-miner commands: logging setup, configuration
//! loading, and credential resolution.

use super::config::Config;
use crate::Result;
use camino::Utf8PathBuf;
use clap::{Args, ValueEnum};
use std::fs;
use std::io;

const LOG_TARGET: &str = "   common";

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments shared by every subcommand
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN")]
    pub github_token: Option<String>,

    /// File holding an access token, used when --github-token is absent
    #[arg(long, value_name = "PATH", default_value = "token.txt")]
    pub token_file: Utf8PathBuf,

    /// Path to configuration file (default is `repo-miner.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

impl CommonArgs {
    /// Initialize logging and load the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed
    pub fn init(&self) -> Result<Config> {
        init_logging(self.log_level);
        Config::load(self.config.as_ref())
    }

    /// Resolve the API token: explicit flag (or `GITHUB_TOKEN`) first, then
    /// the token file. A missing or empty token file yields `None` so the
    /// tool still works unauthenticated, at reduced rate limits.
    pub fn resolve_token(&self) -> Option<String> {
        if let Some(token) = &self.github_token {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }

        match fs::read_to_string(&self.token_file) {
            Ok(text) => {
                let token = text.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Could not read token file '{}': {e:#}", self.token_file);
                None
            }
        }
    }
}

/// Initialize logger based on log level
fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // try_init: commands may run more than once within a single test process
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}
