use std::fmt::Display;

use serde::Deserialize;

/// A remote file as reported by a directory listing. `path` is the key used
/// for every deletion and status lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    pub path: String,
}

impl FileEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, path: impl Into<String>) -> Self {
        FileEntry {
            id: id.into(),
            name: name.into(),
            path: path.into(),
        }
    }
}

impl Display for FileEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The account a storage session is authenticated as.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub username: String,
}
