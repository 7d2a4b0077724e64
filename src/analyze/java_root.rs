//! Java source root detection
//!
//! Extracted archives follow a handful of well-known layouts. The common
//! ones are probed directly; anything else falls back to a scan that picks
//! the directory holding the most `.java` files.

use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const LOG_TARGET: &str = "     java";

/// Layouts probed before falling back to a scan, in priority order
const CANDIDATE_ROOTS: &[&str] = &[
    "src/main/java",
    "app/src/main/java",
    "src/main",
    "src",
    "app",
    "java",
];

/// Locate the directory to hand to the analyzer. `None` when the tree holds
/// no Java sources at all.
#[must_use]
pub fn find_java_root(repo_dir: &Path, ignored_dirs: &[String]) -> Option<PathBuf> {
    for candidate in CANDIDATE_ROOTS {
        let path = repo_dir.join(candidate);
        if path.is_dir() && contains_java_file(&path, ignored_dirs) {
            return Some(path);
        }
    }

    densest_java_dir(repo_dir, ignored_dirs)
}

fn contains_java_file(dir: &Path, ignored_dirs: &[String]) -> bool {
    walk(dir, ignored_dirs).any(|entry| is_java_file(&entry))
}

/// Scan the whole tree and return the single directory with the most
/// direct `.java` children. Ties keep the first directory encountered.
fn densest_java_dir(repo_dir: &Path, ignored_dirs: &[String]) -> Option<PathBuf> {
    let mut counts: Vec<(PathBuf, usize)> = Vec::new();

    for entry in walk(repo_dir, ignored_dirs) {
        if !is_java_file(&entry) {
            continue;
        }

        let Some(parent) = entry.path().parent() else {
            continue;
        };

        match counts.iter_mut().find(|(dir, _)| dir == parent) {
            Some((_, count)) => *count += 1,
            None => counts.push((parent.to_path_buf(), 1)),
        }
    }

    let (best, count) = counts.into_iter().reduce(|best, candidate| {
        if candidate.1 > best.1 { candidate } else { best }
    })?;

    debug!(target: LOG_TARGET, "densest java directory is '{}' with {count} files", best.display());
    Some(best)
}

fn walk(dir: &Path, ignored_dirs: &[String]) -> impl Iterator<Item = walkdir::DirEntry> {
    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(move |entry| !is_ignored_dir(entry, ignored_dirs))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(target: LOG_TARGET, "skipping unreadable entry: {e}");
                None
            }
        })
}

// Configured names may carry a trailing slash, the form the analyzer wants
fn is_ignored_dir(entry: &walkdir::DirEntry, ignored_dirs: &[String]) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| ignored_dirs.iter().any(|ignored| ignored.trim_end_matches('/') == name))
}

fn is_java_file(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_file()
        && entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("java"))
}
