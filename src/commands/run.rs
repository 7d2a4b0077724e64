//! Command dispatch logic for repo-miner

use super::{AggregateArgs, AnalyzeArgs, CollectArgs, InitArgs, aggregate_metrics, analyze_repo, collect_repos, init_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "repo-miner", version, author, long_about = None)]
#[command(about = "Collect GitHub repositories and mine their code metrics")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: MinerSubcommand,
}

#[derive(Subcommand, Debug)]
enum MinerSubcommand {
    /// Search for repositories, enrich them, and write repos.csv
    Collect(Box<CollectArgs>),
    /// Download one repository's sources and run CK on them
    Analyze(Box<AnalyzeArgs>),
    /// Fold a repository's CK output into the accumulated tables
    Aggregate(AggregateArgs),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Parse command-line arguments and execute the selected subcommand.
/// Designed to be called from main.rs with the program arguments.
///
/// # Errors
///
/// Returns an error if argument parsing fails or the command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);

    match &cli.command {
        MinerSubcommand::Collect(collect_args) => collect_repos(host, collect_args).await,
        MinerSubcommand::Analyze(analyze_args) => analyze_repo(host, analyze_args).await,
        MinerSubcommand::Aggregate(aggregate_args) => aggregate_metrics(host, aggregate_args),
        MinerSubcommand::Init(init_args) => init_config(host, init_args),
    }
}
