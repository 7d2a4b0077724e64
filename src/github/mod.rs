//! Hosting API access: client plumbing, repository search, release-count
//! resolution, repository details, and archive snapshots.

mod archive;
mod client;
mod releases;
mod repo;
mod search;

pub use archive::download_and_extract;
pub use client::{ApiResult, Client, RateLimitInfo};
pub use releases::resolve_release_count;
pub use repo::{RepoInfo, fetch_repo_info};
pub use search::{License, Owner, SearchItem, fetch_page};
