//! Normalized repository records and the repos.csv layout

use crate::Result;
use crate::github::SearchItem;
use ohno::IntoAppError;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column order of repos.csv; must match the field order of [`RepoRecord`]
pub const CSV_COLUMNS: [&str; 22] = [
    "id",
    "name",
    "full_name",
    "html_url",
    "description",
    "language",
    "stargazers_count",
    "forks_count",
    "open_issues_count",
    "watchers_count",
    "created_at",
    "updated_at",
    "pushed_at",
    "size",
    "default_branch",
    "license_spdx_id",
    "owner_login",
    "owner_type",
    "private",
    "archived",
    "releases_count",
    "age_years",
];

/// One flattened repository record, immutable once enriched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoRecord {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub html_url: Option<String>,
    pub description: String,
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
    pub license_spdx_id: Option<String>,
    pub owner_login: Option<String>,
    pub owner_type: Option<String>,
    pub private: Option<bool>,
    pub archived: Option<bool>,
    pub releases_count: Option<u64>,
    pub age_years: Option<f64>,
}

impl RepoRecord {
    /// Flatten a raw search item. Absent fields map to `None`; the nested
    /// license and owner sub-objects are unwrapped; the description is
    /// scrubbed of line breaks for CSV safety. Never fails.
    #[must_use]
    pub fn from_search_item(item: &SearchItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            full_name: item.full_name.clone(),
            html_url: item.html_url.clone(),
            description: scrub_description(item.description.as_deref().unwrap_or_default()),
            language: item.language.clone(),
            stargazers_count: item.stargazers_count,
            forks_count: item.forks_count,
            open_issues_count: item.open_issues_count,
            watchers_count: item.watchers_count,
            created_at: item.created_at.clone(),
            updated_at: item.updated_at.clone(),
            pushed_at: item.pushed_at.clone(),
            size: item.size,
            default_branch: item.default_branch.clone(),
            license_spdx_id: item.license.as_ref().and_then(|l| l.spdx_id.clone()),
            owner_login: item.owner.as_ref().and_then(|o| o.login.clone()),
            owner_type: item.owner.as_ref().and_then(|o| o.kind.clone()),
            private: item.private,
            archived: item.archived,
            releases_count: None,
            age_years: None,
        }
    }
}

/// Replace each carriage return and newline with a single space.
/// This is CSV safety, not semantic cleaning.
fn scrub_description(description: &str) -> String {
    description.replace(['\r', '\n'], " ")
}

/// Write all records to `path` in one shot, UTF-8 with a byte-order mark so
/// spreadsheet tools pick the right encoding.
pub fn write_csv(records: &[RepoRecord], path: &Path) -> Result<()> {
    let mut file = File::create(path).into_app_err_with(|| format!("creating '{}'", path.display()))?;
    file.write_all(b"\xEF\xBB\xBF")?;

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(CSV_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}
