//! Blob path construction and public URL derivation.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_entity::file::model::split_extension;

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Maps blob paths to public URLs under `{base}/{bucket}/` and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUrls {
    prefix: String,
}

impl PublicUrls {
    /// Create a mapping for `bucket` served under `base_url`.
    pub fn new(base_url: &str, bucket: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let bucket = bucket.trim_matches('/');
        Self {
            prefix: format!("{base}/{bucket}/"),
        }
    }

    /// URL for `path`, with every segment percent-encoded.
    pub fn url_for(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .trim_start_matches('/')
            .split('/')
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
            .collect();
        format!("{}{}", self.prefix, encoded.join("/"))
    }

    /// Inverse of [`PublicUrls::url_for`]. `None` for URLs outside the bucket.
    pub fn path_for(&self, url: &str) -> Option<String> {
        let rest = url.strip_prefix(&self.prefix)?;
        let rest = rest.split(['?', '#']).next().unwrap_or(rest);
        if rest.is_empty() {
            return None;
        }
        let decoded: Option<Vec<String>> = rest
            .split('/')
            .map(|segment| {
                percent_decode_str(segment)
                    .decode_utf8()
                    .ok()
                    .map(|s| s.into_owned())
            })
            .collect();
        Some(decoded?.join("/"))
    }
}

/// Path of a first upload: `{folder}/{file_name}`.
pub fn upload_path(folder_name: &str, file_name: &str) -> String {
    format!("{folder_name}/{file_name}")
}

/// Path of a copy or move destination: `{folder}/{base}-{millis}{ext}`.
///
/// `file_name` is the source's display name; the suffix keeps the path
/// unique even when two transfers pick the same display name.
pub fn timestamped_path(folder_name: &str, file_name: &str, unix_millis: i64) -> String {
    let (base, ext) = split_extension(file_name);
    format!("{folder_name}/{base}-{unix_millis}{ext}")
}

/// Reject paths that are empty or escape the store root.
pub fn validate_path(path: &str) -> AppResult<&str> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(AppError::validation("Blob path must not be empty"));
    }
    if trimmed
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(AppError::validation(format!("Invalid blob path: {path}")));
    }
    Ok(trimmed)
}
