//! The collect command: search, enrich, and write repos.csv

use super::Host;
use super::common::CommonArgs;
use crate::collect::{RepoRecord, age_years, write_csv};
use crate::github::{Client, fetch_page, resolve_release_count};
use crate::{Result, commands::Config};
use camino::Utf8PathBuf;
use chrono::Utc;
use clap::Parser;
use log::{debug, warn};
use std::cmp::Reverse;
use std::io::Write;

const LOG_TARGET: &str = "  collect";

#[derive(Parser, Debug)]
pub struct CollectArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Search query override (default comes from the config)
    #[arg(long, value_name = "QUERY")]
    pub query: Option<String>,

    /// Maximum number of result pages to fetch
    #[arg(long, value_name = "N")]
    pub max_pages: Option<u32>,

    /// Output CSV path override
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,
}

pub async fn collect_repos<H: Host>(host: &mut H, args: &CollectArgs) -> Result<()> {
    let config = args.common.init()?;

    let token = args.common.resolve_token();
    if token.is_none() {
        warn!(target: LOG_TARGET, "No API token available, expect low rate limits");
    }

    let client = Client::new(token.as_deref(), config.api_base_url.clone(), config.request_timeout)?;
    let query = args.query.as_ref().unwrap_or(&config.search_query);
    let max_pages = args.max_pages.unwrap_or(config.max_pages);
    let output = args.output.as_ref().unwrap_or(&config.repos_csv);

    let items = fetch_all_pages(host, &client, query, config.page_size, max_pages).await?;
    let mut records = enrich(host, &client, &config, items).await?;

    records.sort_by_key(|record| Reverse(record.stargazers_count.unwrap_or(0)));

    write_csv(&records, output.as_std_path())?;
    let _ = writeln!(host.output(), "Wrote {} repositories to {output}", records.len());
    Ok(())
}

/// Fetch result pages until the configured limit or an empty page
async fn fetch_all_pages<H: Host>(
    host: &mut H,
    client: &Client,
    query: &str,
    page_size: u8,
    max_pages: u32,
) -> Result<Vec<crate::github::SearchItem>> {
    let mut items = Vec::new();

    for page in 1..=max_pages {
        let _ = writeln!(host.output(), "Fetching page {page} of {max_pages}");
        let page_items = fetch_page(client, query, page_size, page).await?;
        if page_items.is_empty() {
            debug!(target: LOG_TARGET, "Page {page} is empty, stopping pagination");
            break;
        }

        items.extend(page_items);
    }

    Ok(items)
}

/// Flatten each search item and attach release count and age. Repositories
/// without a usable full name keep a `None` release count.
async fn enrich<H: Host>(host: &mut H, client: &Client, config: &Config, items: Vec<crate::github::SearchItem>) -> Result<Vec<RepoRecord>> {
    let now = Utc::now();
    let total = items.len();
    let mut records = Vec::with_capacity(total);

    for (i, item) in items.iter().enumerate() {
        // Spread release probes out to stay under secondary rate limits
        if i > 0 {
            tokio::time::sleep(config.release_probe_delay).await;
        }

        let mut record = RepoRecord::from_search_item(item);
        record.age_years = age_years(record.created_at.as_deref(), now);

        if let Some((owner, repo)) = record.full_name.as_deref().and_then(|name| name.split_once('/')) {
            let _ = writeln!(host.output(), "[{}/{total}] {owner}/{repo}", i + 1);
            record.releases_count = Some(resolve_release_count(client, owner, repo, config.rate_limit_backoff).await?);
        } else {
            debug!(target: LOG_TARGET, "Skipping release probe for item without a full name");
        }

        records.push(record);
    }

    Ok(records)
}
