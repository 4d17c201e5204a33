//! Blob writes and catalog commits shared by uploads, copies and moves.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, warn};

use docvault_core::config::OrganizerConfig;
use docvault_core::error::ErrorKind;
use docvault_core::result::AppResult;
use docvault_core::traits::BlobStore;
use docvault_core::types::{FileId, FolderId};
use docvault_database::Catalog;
use docvault_entity::file::{File, FilePlacement, NewFile};
use docvault_storage::paths::timestamped_path;

use crate::listing::ListingService;
use crate::naming::NameSnapshot;

/// Last millisecond suffix handed out by [`next_stamp`].
static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// A millisecond suffix never handed out before in this process.
///
/// Follows the wall clock, but moves at least one past the previous suffix
/// when several placements land in the same millisecond.
pub(crate) fn next_stamp() -> i64 {
    let now = Utc::now().timestamp_millis();
    let update = LAST_STAMP.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
        Some(now.max(last + 1))
    });
    match update {
        Ok(last) | Err(last) => now.max(last + 1),
    }
}

/// Content type recorded for a blob, guessed from the display name.
pub(crate) fn content_type_for(name: &str) -> String {
    mime_guess::from_path(name).first_or_octet_stream().to_string()
}

/// The catalog write that places a file under its final name.
#[derive(Debug, Clone)]
pub(crate) enum RowWrite {
    /// A new row (upload, copy).
    Insert(NewFile),
    /// An existing row changes folder (move).
    Relocate(FileId, FilePlacement),
}

impl RowWrite {
    fn set_name(&mut self, name: String) {
        match self {
            Self::Insert(data) => data.name = name,
            Self::Relocate(_, placement) => placement.name = name,
        }
    }

    async fn apply(&self, catalog: &dyn Catalog) -> AppResult<File> {
        match self {
            Self::Insert(data) => catalog.insert_file(data).await,
            Self::Relocate(id, placement) => catalog.relocate_file(*id, placement).await,
        }
    }
}

/// Writes blobs and commits rows, retrying around collisions.
#[derive(Debug, Clone)]
pub(crate) struct Placer {
    catalog: Arc<dyn Catalog>,
    blobs: Arc<dyn BlobStore>,
    listing: ListingService,
    organizer: OrganizerConfig,
}

impl Placer {
    pub(crate) fn new(
        catalog: Arc<dyn Catalog>,
        blobs: Arc<dyn BlobStore>,
        organizer: OrganizerConfig,
    ) -> Self {
        Self {
            listing: ListingService::new(catalog.clone()),
            catalog,
            blobs,
            organizer,
        }
    }

    pub(crate) fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    pub(crate) fn blobs(&self) -> &dyn BlobStore {
        self.blobs.as_ref()
    }

    pub(crate) fn listing(&self) -> &ListingService {
        &self.listing
    }

    /// Write `data` to `{folder}/{base}-{millis}{ext}`.
    ///
    /// Suffixes are unique within the process. A path occupied by another
    /// writer is retried with a fresh suffix.
    pub(crate) async fn put_timestamped(
        &self,
        folder_name: &str,
        file_name: &str,
        data: Bytes,
        content_type: &str,
    ) -> AppResult<String> {
        let mut attempt: u32 = 0;
        loop {
            let path = timestamped_path(folder_name, file_name, next_stamp());
            match self.blobs.put(&path, data.clone(), content_type).await {
                Ok(stored) => return Ok(stored),
                Err(e)
                    if e.kind == ErrorKind::ConstraintViolation
                        && attempt < self.organizer.path_collision_retries =>
                {
                    debug!(path = %path, attempt, "Blob path occupied, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Commit `write` under a name disambiguated against `snapshot`.
    ///
    /// A name collision at commit time means another writer got there
    /// first; the folder's names are re-read and the commit is retried.
    pub(crate) async fn commit_named(
        &self,
        folder_id: FolderId,
        snapshot: &mut NameSnapshot,
        candidate: &str,
        mut write: RowWrite,
    ) -> AppResult<File> {
        let mut attempt: u32 = 0;
        loop {
            let name = snapshot.claim(candidate);
            write.set_name(name.clone());
            match write.apply(self.catalog.as_ref()).await {
                Ok(file) => return Ok(file),
                Err(e)
                    if e.kind == ErrorKind::ConstraintViolation
                        && attempt < self.organizer.max_name_retries =>
                {
                    attempt += 1;
                    debug!(
                        folder_id = %folder_id,
                        name = %name,
                        attempt,
                        "Name taken concurrently, refreshing folder names"
                    );
                    *snapshot = self.listing.existing_names(folder_id).await?;
                }
                Err(e) => {
                    snapshot.release(&name);
                    return Err(e);
                }
            }
        }
    }

    /// Log a blob that no catalog row references.
    pub(crate) fn report_orphan(&self, path: &str, reason: &str) {
        warn!(path = %path, reason, "Orphaned blob left in store");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_stamp_is_strictly_increasing() {
        let stamps: Vec<i64> = (0..1000).map(|_| next_stamp()).collect();
        assert!(stamps.windows(2).all(|w| w[1] > w[0]));
        assert!(stamps[0] >= Utc::now().timestamp_millis() - 60_000);
    }

    #[test]
    fn test_next_stamp_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..250).map(|_| next_stamp()).collect::<Vec<_>>()))
            .collect();
        let mut all: Vec<i64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
    }
}
