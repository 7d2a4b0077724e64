//! Repository selection from a collected CSV
//!
//! The collected table's column set varies across producers, so rows are
//! plain name-to-value maps and the full name is resolved through a
//! prioritized list of candidate columns.

use crate::Result;
use ohno::{IntoAppError, bail};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One CSV row with no assumed header
pub type CsvRow = HashMap<String, String>;

/// Columns that may carry the full name directly, in priority order
const FULL_NAME_COLUMNS: &[&str] = &["repo_full_name", "full_name", "name_with_owner"];

/// Columns that may carry a repository URL, in priority order
const URL_COLUMNS: &[&str] = &["html_url", "url", "repo_url"];

/// Path marker that precedes the owner/name segments in repository URLs
const HOST_MARKER: &str = "github.com/";

/// Load all rows of a collected CSV, tolerating a UTF-8 byte-order mark
pub fn load_rows(path: &Path) -> Result<Vec<CsvRow>> {
    let text = fs::read_to_string(path).into_app_err_with(|| format!("reading '{}'", path.display()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row.into_app_err_with(|| format!("parsing '{}'", path.display()))?);
    }

    if rows.is_empty() {
        bail!("'{}' contains no repositories", path.display());
    }

    Ok(rows)
}

/// Resolve a row's canonical `owner/name`, trying the full-name columns,
/// then owner+name concatenation, then URL extraction. `None` when the row
/// has no usable identity.
#[must_use]
pub fn full_name_of(row: &CsvRow) -> Option<String> {
    for column in FULL_NAME_COLUMNS {
        if let Some(value) = row.get(*column) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    if let (Some(owner), Some(name)) = (row.get("owner"), row.get("name")) {
        let (owner, name) = (owner.trim(), name.trim());
        if !owner.is_empty() && !name.is_empty() {
            return Some(format!("{owner}/{name}"));
        }
    }

    for column in URL_COLUMNS {
        if let Some(full_name) = row.get(*column).and_then(|url| owner_repo_from_url(url)) {
            return Some(full_name);
        }
    }

    None
}

/// Resolve a selector against the rows: a 1-based row index, a repository
/// URL, or an `owner/name` pair (matched case-insensitively against each
/// row's resolved full name, with a literal pair accepted as a last resort).
pub fn select(rows: &[CsvRow], selector: &str) -> Result<String> {
    let selector = selector.trim();

    if !selector.is_empty() && selector.bytes().all(|b| b.is_ascii_digit()) {
        let index: usize = selector.parse::<usize>().into_app_err_with(|| format!("parsing row index '{selector}'"))?;
        if index == 0 || index > rows.len() {
            bail!("row index {index} is out of range (1..={})", rows.len());
        }
        return full_name_of(&rows[index - 1]).into_app_err("selected row has no resolvable full name");
    }

    let wanted = if selector.starts_with("http://") || selector.starts_with("https://") {
        owner_repo_from_url(selector).into_app_err_with(|| format!("could not extract owner/name from URL '{selector}'"))?
    } else {
        selector.to_string()
    };

    for row in rows {
        if let Some(full_name) = full_name_of(row) {
            if full_name.eq_ignore_ascii_case(&wanted) {
                return Ok(full_name);
            }
        }
    }

    // A literal owner/name pair is usable even when absent from the table
    if wanted.matches('/').count() == 1 {
        return Ok(wanted);
    }

    bail!("repository '{selector}' not found in the collected CSV")
}

/// Take the two path segments following the host marker
fn owner_repo_from_url(url: &str) -> Option<String> {
    let tail = url.rsplit(HOST_MARKER).next()?;
    let mut segments = tail.split('/');
    let owner = segments.next()?.trim();
    let name = segments.next()?.trim();
    (!owner.is_empty() && !name.is_empty()).then(|| format!("{owner}/{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> CsvRow {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn test_full_name_from_full_name_column() {
        assert_eq!(full_name_of(&row(&[("full_name", "a/b")])).as_deref(), Some("a/b"));
    }

    #[test]
    fn test_full_name_column_priority() {
        let r = row(&[("repo_full_name", "x/y"), ("full_name", "a/b")]);
        assert_eq!(full_name_of(&r).as_deref(), Some("x/y"));
    }

    #[test]
    fn test_full_name_from_owner_and_name() {
        let r = row(&[("owner", " acme "), ("name", "widget")]);
        assert_eq!(full_name_of(&r).as_deref(), Some("acme/widget"));
    }

    #[test]
    fn test_full_name_from_url_column() {
        let r = row(&[("html_url", "https://github.com/acme/widget")]);
        assert_eq!(full_name_of(&r).as_deref(), Some("acme/widget"));
    }

    #[test]
    fn test_full_name_unresolvable() {
        assert!(full_name_of(&row(&[("stars", "10")])).is_none());
        assert!(full_name_of(&row(&[("full_name", "  ")])).is_none());
    }

    #[test]
    fn test_select_by_index() {
        let rows = vec![row(&[("full_name", "a/b")]), row(&[("full_name", "c/d")])];
        assert_eq!(select(&rows, "2").unwrap(), "c/d");
    }

    #[test]
    fn test_select_index_out_of_range() {
        let rows = vec![row(&[("full_name", "a/b")])];
        assert!(select(&rows, "0").is_err());
        assert!(select(&rows, "2").is_err());
    }

    #[test]
    fn test_select_by_name_case_insensitive() {
        let rows = vec![row(&[("full_name", "Acme/Widget")])];
        assert_eq!(select(&rows, "acme/widget").unwrap(), "Acme/Widget");
    }

    #[test]
    fn test_select_by_url() {
        let rows = vec![row(&[("full_name", "a/b")]), row(&[("full_name", "c/d")])];
        assert_eq!(select(&rows, "https://github.com/a/b/tree/main").unwrap(), "a/b");
    }

    #[test]
    fn test_select_url_without_enough_segments() {
        let rows = vec![row(&[("full_name", "a/b")])];
        assert!(select(&rows, "https://github.com/a").is_err());
    }

    #[test]
    fn test_select_literal_pair_fallback() {
        let rows = vec![row(&[("full_name", "a/b")])];
        assert_eq!(select(&rows, "x/y").unwrap(), "x/y");
    }

    #[test]
    fn test_select_not_found() {
        let rows = vec![row(&[("full_name", "a/b")])];
        assert!(select(&rows, "not-a-repo").is_err());
        assert!(select(&rows, "too/many/segments").is_err());
    }

    #[test]
    fn test_load_rows_strips_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repos.csv");
        fs::write(&path, "\u{feff}full_name,stars\na/b,10\n").unwrap();

        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("full_name").unwrap(), "a/b");
    }

    #[test]
    fn test_load_rows_empty_table_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repos.csv");
        fs::write(&path, "full_name,stars\n").unwrap();

        assert!(load_rows(&path).is_err());
    }

    #[test]
    fn test_load_rows_missing_file_is_error() {
        assert!(load_rows(Path::new("/no/such/file.csv")).is_err());
    }
}
