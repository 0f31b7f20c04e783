use std::collections::HashSet;

use regex::Regex;

use crate::storage::FileEntry;

/// Picks listed files by matching their display name.
pub struct NameFilter {
    regex: Regex,
}

impl NameFilter {
    pub fn new(pattern: &str) -> Result<NameFilter, regex::Error> {
        Ok(NameFilter {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn select(&self, entries: &[FileEntry]) -> Vec<String> {
        entries
            .iter()
            .filter(|entry| self.regex.is_match(&entry.name))
            .map(|entry| entry.path.clone())
            .collect()
    }
}

/// Explicit paths followed by filter matches, each path once, in first-seen
/// order.
pub fn delete_targets(
    paths: &[String],
    filter: Option<&NameFilter>,
    entries: &[FileEntry],
) -> Vec<String> {
    let matched = filter.map(|filter| filter.select(entries)).unwrap_or_default();
    let mut seen = HashSet::new();
    paths
        .iter()
        .cloned()
        .chain(matched)
        .filter(|path| seen.insert(path.clone()))
        .collect()
}
