//! Shared fixtures for organizer integration tests.
//!
//! Both stores are in-memory and wrapped so individual tests can inject
//! failures at a chosen step.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::{BlobObjectMeta, BlobStore};
use docvault_core::types::{FileId, FolderId};
use docvault_database::{Catalog, MemoryCatalog};
use docvault_entity::file::{File, FilePlacement, NewFile};
use docvault_entity::folder::{Folder, FolderSummary};
use docvault_service::{Organizer, RequestContext, UploadItem};
use docvault_storage::MemoryBlobStore;

/// Catalog wrapper that can fail or race selected writes.
#[derive(Debug, Default)]
pub struct FlakyCatalog {
    inner: MemoryCatalog,
    failing_inserts: Mutex<HashSet<FolderId>>,
    failing_relocates: AtomicBool,
    racing_inserts: Mutex<HashSet<FolderId>>,
}

impl FlakyCatalog {
    /// Every insert into `folder_id` fails with `StoreUnavailable`.
    pub fn fail_inserts_into(&self, folder_id: FolderId) {
        self.failing_inserts.lock().unwrap().insert(folder_id);
    }

    /// Every relocate fails with `StoreUnavailable`.
    pub fn fail_relocates(&self) {
        self.failing_relocates.store(true, Ordering::SeqCst);
    }

    /// The next insert into `folder_id` is beaten by a concurrent writer
    /// inserting the same name first.
    pub fn race_next_insert_into(&self, folder_id: FolderId) {
        self.racing_inserts.lock().unwrap().insert(folder_id);
    }

    pub fn inner(&self) -> &MemoryCatalog {
        &self.inner
    }
}

#[async_trait]
impl Catalog for FlakyCatalog {
    fn provider_type(&self) -> &str {
        "flaky"
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn create_folder(&self, name: &str) -> AppResult<Folder> {
        self.inner.create_folder(name).await
    }

    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        self.inner.find_folder(id).await
    }

    async fn find_folder_by_name(&self, name: &str) -> AppResult<Option<Folder>> {
        self.inner.find_folder_by_name(name).await
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<bool> {
        self.inner.delete_folder(id).await
    }

    async fn count_files(&self, folder_id: FolderId) -> AppResult<u64> {
        self.inner.count_files(folder_id).await
    }

    async fn list_folders(&self) -> AppResult<Vec<FolderSummary>> {
        self.inner.list_folders().await
    }

    async fn find_file(&self, id: FileId) -> AppResult<Option<File>> {
        self.inner.find_file(id).await
    }

    async fn list_files(&self, folder_id: FolderId) -> AppResult<Vec<File>> {
        self.inner.list_files(folder_id).await
    }

    async fn list_file_names(&self, folder_id: FolderId) -> AppResult<Vec<String>> {
        self.inner.list_file_names(folder_id).await
    }

    async fn insert_file(&self, data: &NewFile) -> AppResult<File> {
        if self.failing_inserts.lock().unwrap().contains(&data.folder_id) {
            return Err(AppError::store_unavailable("catalog offline"));
        }
        let race = self.racing_inserts.lock().unwrap().remove(&data.folder_id);
        if race {
            let mut competitor = data.clone();
            competitor.uploaded_by_user_name = "Someone Else".to_string();
            self.inner.insert_file(&competitor).await?;
        }
        self.inner.insert_file(data).await
    }

    async fn relocate_file(&self, id: FileId, placement: &FilePlacement) -> AppResult<File> {
        if self.failing_relocates.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable("catalog offline"));
        }
        self.inner.relocate_file(id, placement).await
    }

    async fn delete_file(&self, id: FileId) -> AppResult<bool> {
        self.inner.delete_file(id).await
    }
}

/// Blob store wrapper that can fail selected writes or every delete.
#[derive(Debug, Default)]
pub struct FlakyBlobStore {
    inner: MemoryBlobStore,
    failing_put_prefixes: Mutex<Vec<String>>,
    failing_deletes: AtomicBool,
}

impl FlakyBlobStore {
    /// Every put whose path starts with `prefix` fails with `StoreUnavailable`.
    pub fn fail_puts_under(&self, prefix: &str) {
        self.failing_put_prefixes
            .lock()
            .unwrap()
            .push(prefix.to_string());
    }

    /// Every delete fails with `StoreUnavailable`.
    pub fn fail_deletes(&self) {
        self.failing_deletes.store(true, Ordering::SeqCst);
    }

    pub fn paths(&self) -> Vec<String> {
        self.inner.paths()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl BlobStore for FlakyBlobStore {
    fn provider_type(&self) -> &str {
        "flaky"
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn put(&self, path: &str, data: Bytes, content_type: &str) -> AppResult<String> {
        let failing = self
            .failing_put_prefixes
            .lock()
            .unwrap()
            .iter()
            .any(|p| path.starts_with(p.as_str()));
        if failing {
            return Err(AppError::store_unavailable("blob store offline"));
        }
        self.inner.put(path, data, content_type).await
    }

    async fn get(&self, path: &str) -> AppResult<Bytes> {
        self.inner.get(path).await
    }

    async fn delete(&self, paths: &[String]) -> AppResult<()> {
        if self.failing_deletes.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable("blob store offline"));
        }
        self.inner.delete(paths).await
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        self.inner.exists(path).await
    }

    async fn metadata(&self, path: &str) -> AppResult<BlobObjectMeta> {
        self.inner.metadata(path).await
    }

    fn public_url(&self, path: &str) -> String {
        self.inner.public_url(path)
    }

    fn path_from_url(&self, url: &str) -> Option<String> {
        self.inner.path_from_url(url)
    }
}

/// An organizer over fault-injectable in-memory stores.
pub struct TestApp {
    pub catalog: Arc<FlakyCatalog>,
    pub blobs: Arc<FlakyBlobStore>,
    pub organizer: Organizer,
    pub ctx: RequestContext,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let catalog = Arc::new(FlakyCatalog::default());
        let blobs = Arc::new(FlakyBlobStore::default());
        let organizer = Organizer::new(catalog.clone(), blobs.clone(), &config);
        Self {
            catalog,
            blobs,
            organizer,
            ctx: RequestContext::for_user("user-1", "Ann Lee"),
        }
    }

    pub async fn folder(&self, name: &str) -> Folder {
        self.organizer
            .folders
            .create_folder(&self.ctx, name)
            .await
            .expect("create folder")
    }

    pub async fn upload(&self, folder: &Folder, name: &str, body: &str) -> File {
        self.organizer
            .uploads
            .upload_file(&self.ctx, folder.id, UploadItem::new(name, body.to_string()))
            .await
            .expect("upload file")
    }

    pub async fn names_in(&self, folder: &Folder) -> Vec<String> {
        self.organizer
            .listing
            .list_files(folder.id)
            .await
            .expect("list files")
            .into_iter()
            .map(|f| f.name)
            .collect()
    }

    pub fn blob_path(&self, file: &File) -> String {
        self.blobs
            .path_from_url(&file.url)
            .expect("url belongs to the blob store")
    }

    pub async fn blob_of(&self, file: &File) -> Bytes {
        self.blobs
            .get(&self.blob_path(file))
            .await
            .expect("blob present")
    }
}
