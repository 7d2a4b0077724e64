//! The analyze command: pick a repository, download its sources, and run CK

use super::Host;
use super::common::CommonArgs;
use crate::analyze::{check_java, ensure_tool, find_java_root, load_rows, run_ck, select};
use crate::github::{Client, download_and_extract, fetch_repo_info};
use crate::{Result, commands::Config};
use camino::Utf8PathBuf;
use clap::Parser;
use log::{debug, info};
use ohno::{IntoAppError, bail};
use std::fs;
use std::io::Write;
use std::path::Path;

const LOG_TARGET: &str = "  analyze";

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Repository to analyze: a 1-based row number, `owner/name`, or a URL
    #[arg(value_name = "SELECTOR")]
    pub selector: String,

    /// Branch to download (default is the repository's default branch)
    #[arg(value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Collected CSV to select from
    #[arg(long, value_name = "PATH")]
    pub csv: Option<Utf8PathBuf>,

    /// Path to the CK jar
    #[arg(long, value_name = "PATH", env = "CK_JAR")]
    pub ck_jar: Option<Utf8PathBuf>,
}

pub async fn analyze_repo<H: Host>(host: &mut H, args: &AnalyzeArgs) -> Result<()> {
    let mut config = args.common.init()?;
    if let Some(ck_jar) = &args.ck_jar {
        config.ck_jar = ck_jar.clone();
    }

    ensure_tool(config.ck_jar.as_std_path())?;
    check_java().await?;

    let csv_path = args.csv.as_ref().unwrap_or(&config.repos_csv);
    let rows = load_rows(csv_path.as_std_path())?;
    let full_name = select(&rows, &args.selector)?;
    let (owner, repo) = full_name
        .split_once('/')
        .into_app_err_with(|| format!("'{full_name}' is not an owner/name pair"))?;

    let client = Client::new(args.common.resolve_token().as_deref(), config.api_base_url.clone(), config.request_timeout)?;

    let branch = match &args.branch {
        Some(branch) => branch.clone(),
        None => {
            let info = fetch_repo_info(&client, owner, repo).await?;
            if info.archived {
                bail!("'{full_name}' is archived; pass a branch explicitly to analyze it anyway");
            }
            info.default_branch().to_string()
        }
    };

    let src_dir = config.work_dir.as_std_path().join(owner).join(repo);
    download_and_extract(&client, owner, repo, &branch, &src_dir, config.download_timeout).await?;

    let Some(java_root) = find_java_root(&src_dir, &config.ignored_dirs) else {
        let _ = writeln!(host.output(), "{full_name} contains no Java sources, nothing to analyze");
        cleanup(&config, &src_dir);
        return Ok(());
    };

    debug!(target: LOG_TARGET, "Java source root: '{}'", java_root.display());

    let out_dir = config.ck_output_dir.as_std_path().join(owner).join(repo);
    run_ck(&config, &java_root, &out_dir).await?;

    cleanup(&config, &src_dir);
    let _ = writeln!(host.output(), "CK metrics for {full_name} written to {}", out_dir.display());
    Ok(())
}

/// Remove the extracted source tree once CK is done with it
fn cleanup(config: &Config, src_dir: &Path) {
    if !config.cleanup_sources {
        return;
    }

    if let Err(e) = fs::remove_dir_all(src_dir) {
        info!(target: LOG_TARGET, "Could not remove '{}': {e:#}", src_dir.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::common::{CommonArgs, LogLevel};
    use crate::commands::host::TestHost;

    #[tokio::test]
    async fn test_missing_ck_jar_fails_before_any_network() {
        let args = AnalyzeArgs {
            common: CommonArgs {
                github_token: None,
                token_file: Utf8PathBuf::from("/nonexistent/token.txt"),
                config: None,
                log_level: LogLevel::None,
            },
            selector: "1".to_string(),
            branch: None,
            csv: None,
            ck_jar: Some(Utf8PathBuf::from("/nonexistent/ck.jar")),
        };

        let mut host = TestHost::new();
        let err = analyze_repo(&mut host, &args).await.unwrap_err();
        assert!(format!("{err:#}").contains("ck.jar"));
    }
}
