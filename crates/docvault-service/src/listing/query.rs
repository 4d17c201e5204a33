//! Filter and sort projection over a folder's files.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use docvault_core::types::{FileSort, FileSortKey};
use docvault_entity::file::{File, parse_file_size};

/// A view over a file list: optional filters plus an optional sort.
///
/// Applying a query never mutates its input, so the same list can be
/// re-projected as the user changes filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileQuery {
    /// Case-insensitive substring of the file name.
    #[serde(default)]
    pub name: Option<String>,
    /// Case-insensitive substring of the uploader's name.
    #[serde(default)]
    pub uploaded_by: Option<String>,
    /// Ordering; input order is kept when absent.
    #[serde(default)]
    pub sort: Option<FileSort>,
}

impl FileQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by file name substring.
    pub fn with_name(mut self, needle: impl Into<String>) -> Self {
        self.name = Some(needle.into());
        self
    }

    /// Filter by uploader name substring.
    pub fn with_uploaded_by(mut self, needle: impl Into<String>) -> Self {
        self.uploaded_by = Some(needle.into());
        self
    }

    /// Order the result.
    pub fn sorted(mut self, sort: FileSort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Project `files` through the filters and sort.
    pub fn apply(&self, files: &[File]) -> Vec<File> {
        let name = normalized(self.name.as_deref());
        let uploader = normalized(self.uploaded_by.as_deref());

        let mut result: Vec<File> = files
            .iter()
            .filter(|f| matches(&f.name, name.as_deref()))
            .filter(|f| matches(&f.uploaded_by_user_name, uploader.as_deref()))
            .cloned()
            .collect();

        if let Some(sort) = self.sort {
            result.sort_by(|a, b| sort.direction.apply(compare(sort.key, a, b)));
        }
        result
    }
}

fn normalized(filter: Option<&str>) -> Option<String> {
    filter
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_lowercase)
}

fn matches(value: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|n| value.to_lowercase().contains(n))
}

fn compare(key: FileSortKey, a: &File, b: &File) -> Ordering {
    let primary = match key {
        FileSortKey::Name => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
        FileSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        FileSortKey::FileSize => {
            parse_file_size(&a.file_size).total_cmp(&parse_file_size(&b.file_size))
        }
    };
    primary.then_with(|| a.id.cmp(&b.id))
}
