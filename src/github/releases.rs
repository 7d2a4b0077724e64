//! Release-count resolver
//!
//! Determines how many published releases a repository has without walking
//! the whole listing: requesting one release per page makes the `Link`
//! header's `rel="last"` page number equal to the release count.

use super::client::{ApiResult, Client};
use crate::Result;
use core::time::Duration;
use ohno::bail;
use reqwest::header::LINK;
use url::Url;

const LOG_TARGET: &str = " releases";

/// Resolve the total number of published releases for a repository.
///
/// - 404 means the repository has no release data we can reach; that counts
///   as zero rather than an error.
/// - A rate-limited response gets one fixed-backoff retry, after which any
///   non-success is fatal.
/// - If the `Link` header is missing or unparseable, fall back to counting
///   the items in the returned page (accurate only when the total is <= 1).
pub async fn resolve_release_count(client: &Client, owner: &str, repo: &str, backoff: Duration) -> Result<u64> {
    let url = format!("{}/repos/{owner}/{repo}/releases?per_page=1&page=1", client.base_url());

    let resp = match client.get(&url).await {
        ApiResult::Success(resp) => resp,
        ApiResult::NotFound => return Ok(0),
        ApiResult::RateLimited(info) => {
            if let Some(info) = info {
                log::debug!(
                    target: LOG_TARGET,
                    "Rate limited listing releases for '{owner}/{repo}': {} remaining, resets at {}",
                    info.remaining,
                    info.reset_at
                );
            }
            log::info!(target: LOG_TARGET, "Backing off {}ms before retrying '{owner}/{repo}'", backoff.as_millis());
            tokio::time::sleep(backoff).await;

            match client.get(&url).await {
                ApiResult::Success(resp) => resp,
                ApiResult::NotFound => return Ok(0),
                ApiResult::RateLimited(_) => {
                    bail!("release listing for '{owner}/{repo}' still rate limited after retry")
                }
                ApiResult::Failed(e) => return Err(e),
            }
        }
        ApiResult::Failed(e) => return Err(e),
    };

    let link_header = resp.headers().get(LINK).and_then(|h| h.to_str().ok()).map(str::to_owned);

    let items: Vec<serde_json::Value> = match resp.json().await {
        Ok(items) => items,
        Err(e) => bail!("could not parse release listing for '{owner}/{repo}': {e}"),
    };

    if let Some(count) = link_header.as_deref().and_then(last_page_number) {
        return Ok(count);
    }

    Ok(items.len() as u64)
}

/// Extract the `page` query parameter of the `rel="last"` link relation.
///
/// Returns `None` on any parse failure so the caller can fall back to
/// counting page items.
fn last_page_number(link_header: &str) -> Option<u64> {
    let last_part = link_header.split(',').find(|part| part.contains(r#"rel="last""#))?;
    let raw_url = last_part.split(';').next()?.trim().strip_prefix('<')?.strip_suffix('>')?;
    let url = Url::parse(raw_url).ok()?;
    let (_, page) = url.query_pairs().find(|(key, _)| key == "page")?;
    page.parse().ok()
}
