//! Repository search endpoint
//!
//! Models for the search API's result items. Every field is optional: the
//! API omits fields freely and a missing field must never fail
//! deserialization.

use super::client::{ApiResult, Client};
use crate::Result;
use ohno::bail;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

const LOG_TARGET: &str = "   search";

/// One page of the search endpoint's response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// Raw repository record from the search API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchItem {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub html_url: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: Option<u64>,
    pub forks_count: Option<u64>,
    pub open_issues_count: Option<u64>,
    pub watchers_count: Option<u64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub pushed_at: Option<String>,
    pub size: Option<u64>,
    pub default_branch: Option<String>,
    pub license: Option<License>,
    pub owner: Option<Owner>,
    pub private: Option<bool>,
    pub archived: Option<bool>,
}

/// Nested license sub-object; may be absent or partially filled
#[derive(Debug, Clone, Deserialize)]
pub struct License {
    pub spdx_id: Option<String>,
}

/// Nested owner sub-object
#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    pub login: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Fetch one page of search results, sorted by stars descending.
///
/// Any non-200 response is fatal: the collector never produces partial
/// output from a half-finished search.
pub async fn fetch_page(client: &Client, query: &str, page_size: u8, page: u32) -> Result<Vec<SearchItem>> {
    let encoded_query = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
    let url = format!(
        "{}/search/repositories?q={encoded_query}&sort=stars&order=desc&per_page={page_size}&page={page}",
        client.base_url()
    );

    log::info!(target: LOG_TARGET, "Requesting search page {page}");

    match client.get(&url).await {
        ApiResult::Success(resp) => {
            let body: SearchResponse = match resp.json().await {
                Ok(b) => b,
                Err(e) => bail!("could not parse search response for page {page}: {e}"),
            };
            log::debug!(target: LOG_TARGET, "Search page {page} returned {} item(s)", body.items.len());
            Ok(body.items)
        }
        ApiResult::NotFound => bail!("search endpoint returned 404 for page {page}"),
        ApiResult::RateLimited(info) => {
            if let Some(info) = info {
                log::debug!(target: LOG_TARGET, "Rate limited on search page {page}: {} remaining, resets at {}", info.remaining, info.reset_at);
            }
            bail!("search request for page {page} was rate limited")
        }
        ApiResult::Failed(e) => Err(e),
    }
}
