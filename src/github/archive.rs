//! Archive snapshot fetcher
//!
//! Downloads a zip snapshot of a repository at a branch and extracts it into
//! a destination directory. The hosting API wraps the tree in a single
//! `<owner>-<repo>-<sha>` root directory, which is unwrapped here.

use super::client::{ApiResult, Client};
use crate::Result;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use zip::ZipArchive;

const LOG_TARGET: &str = "  archive";

/// Download the zipball for `owner/repo` at `branch` and extract it so the
/// repository's tree sits directly at `dest_dir`.
///
/// A 404 for the branch-qualified URL falls back to the branch-less variant
/// before giving up. Any pre-existing `dest_dir` is replaced.
pub async fn download_and_extract(
    client: &Client,
    owner: &str,
    repo: &str,
    branch: &str,
    dest_dir: &Path,
    download_timeout: Duration,
) -> Result<()> {
    let url = format!("{}/repos/{owner}/{repo}/zipball/{branch}", client.base_url());

    log::info!(target: LOG_TARGET, "Downloading snapshot of '{owner}/{repo}' at '{branch}'");

    let resp = match client.get_with_timeout(&url, download_timeout).await {
        ApiResult::Success(resp) => resp,
        ApiResult::NotFound => {
            // The branch may not exist; the branch-less URL serves the default
            let fallback = format!("{}/repos/{owner}/{repo}/zipball", client.base_url());
            log::debug!(target: LOG_TARGET, "Branch '{branch}' not found, retrying without a branch");
            match client.get_with_timeout(&fallback, download_timeout).await {
                ApiResult::Success(resp) => resp,
                ApiResult::NotFound => bail!("no archive available for '{owner}/{repo}'"),
                ApiResult::RateLimited(_) => bail!("rate limited downloading archive for '{owner}/{repo}'"),
                ApiResult::Failed(e) => return Err(e),
            }
        }
        ApiResult::RateLimited(_) => bail!("rate limited downloading archive for '{owner}/{repo}'"),
        ApiResult::Failed(e) => return Err(e),
    };

    let bytes = resp
        .bytes()
        .await
        .into_app_err_with(|| format!("downloading archive for '{owner}/{repo}'"))?;

    log::debug!(target: LOG_TARGET, "Downloaded {} byte(s) for '{owner}/{repo}'", bytes.len());

    extract_zipball(&bytes, dest_dir)
}

/// Extract a zipball into `dest_dir`, unwrapping the single root directory.
pub fn extract_zipball(bytes: &[u8], dest_dir: &Path) -> Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).into_app_err("opening repository archive")?;

    if dest_dir.exists() {
        fs::remove_dir_all(dest_dir).into_app_err_with(|| format!("clearing '{}'", dest_dir.display()))?;
    }
    let parent = dest_dir.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    fs::create_dir_all(parent).into_app_err_with(|| format!("creating '{}'", parent.display()))?;

    // Stage in a sibling temp dir so the final move is a same-filesystem rename
    let staging = tempfile::tempdir_in(parent).into_app_err("creating extraction staging directory")?;
    archive.extract(staging.path()).into_app_err("extracting repository archive")?;

    let root = fs::read_dir(staging.path())
        .into_app_err("reading extracted archive")?
        .filter_map(std::result::Result::ok)
        .find(|entry| entry.file_type().is_ok_and(|t| t.is_dir()));

    let Some(root) = root else {
        bail!("archive has no root directory");
    };

    fs::rename(root.path(), dest_dir).into_app_err_with(|| format!("moving extracted tree to '{}'", dest_dir.display()))?;
    Ok(())
}
