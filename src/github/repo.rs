//! Repository-detail endpoint
//!
//! Used by the analysis pipeline to read the default branch and the
//! archived flag before downloading a snapshot.

use super::client::{ApiResult, Client};
use crate::Result;
use ohno::bail;
use serde::Deserialize;

const LOG_TARGET: &str = "     repo";

/// The subset of the repository-detail response the analysis pipeline needs
#[derive(Debug, Deserialize)]
pub struct RepoInfo {
    pub default_branch: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

impl RepoInfo {
    /// The branch to snapshot when none was requested explicitly
    #[must_use]
    pub fn default_branch(&self) -> &str {
        self.default_branch.as_deref().filter(|b| !b.is_empty()).unwrap_or("master")
    }
}

/// Fetch repository details for `owner/repo`
pub async fn fetch_repo_info(client: &Client, owner: &str, repo: &str) -> Result<RepoInfo> {
    let url = format!("{}/repos/{owner}/{repo}", client.base_url());

    log::info!(target: LOG_TARGET, "Fetching repository details for '{owner}/{repo}'");

    match client.get(&url).await {
        ApiResult::Success(resp) => match resp.json().await {
            Ok(info) => Ok(info),
            Err(e) => bail!("could not parse repository details for '{owner}/{repo}': {e}"),
        },
        ApiResult::NotFound => bail!("repository '{owner}/{repo}' not found"),
        ApiResult::RateLimited(_) => bail!("rate limited fetching repository details for '{owner}/{repo}'"),
        ApiResult::Failed(e) => Err(e),
    }
}
