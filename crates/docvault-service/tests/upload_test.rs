//! Integration tests for uploads and file deletion.

mod helpers;

use bytes::Bytes;

use docvault_core::config::AppConfig;
use docvault_core::error::ErrorKind;
use docvault_core::traits::BlobStore;
use docvault_core::types::FolderId;
use docvault_service::transfer::ItemResult;
use docvault_service::{Organizer, RequestContext, UploadItem};

#[tokio::test]
async fn test_upload_records_size_and_attribution() {
    let app = helpers::TestApp::new();
    let inbox = app.folder("Inbox").await;

    let file = app.upload(&inbox, " report.pdf ", "quarterly numbers").await;

    assert_eq!(file.name, "report.pdf");
    assert_eq!(file.folder_id, inbox.id);
    assert_eq!(file.file_size, "17 B");
    assert_eq!(file.uploaded_by_user_id, "user-1");
    assert_eq!(file.uploaded_by_user_name, "Ann Lee");
    assert_eq!(file.url, "memory://blobs/pdf/Inbox/report.pdf");
    assert_eq!(app.blob_of(&file).await.as_ref(), b"quarterly numbers");

    let meta = app.blobs.metadata("Inbox/report.pdf").await.unwrap();
    assert_eq!(meta.content_type.as_deref(), Some("application/pdf"));
}

#[tokio::test]
async fn test_upload_same_name_twice() {
    let app = helpers::TestApp::new();
    let inbox = app.folder("Inbox").await;

    app.upload(&inbox, "scan.pdf", "first").await;
    let second = app.upload(&inbox, "Scan.pdf", "second").await;

    assert_eq!(second.name, "Scan(1).pdf");
    assert_eq!(app.blob_path(&second), "Inbox/Scan(1).pdf");
}

#[tokio::test]
async fn test_upload_falls_back_to_timestamped_path() {
    let app = helpers::TestApp::new();
    let inbox = app.folder("Inbox").await;
    app.blobs
        .put("Inbox/x.pdf", Bytes::from_static(b"stray"), "application/pdf")
        .await
        .unwrap();

    let file = app.upload(&inbox, "x.pdf", "fresh").await;

    assert_eq!(file.name, "x.pdf");
    let path = app.blob_path(&file);
    assert!(path.starts_with("Inbox/x-"), "unexpected path {path}");
    assert!(path.ends_with(".pdf"));
    assert_eq!(app.blob_of(&file).await.as_ref(), b"fresh");
}

#[tokio::test]
async fn test_upload_rejects_oversized_payload() {
    let mut config = AppConfig::default();
    config.storage.max_upload_size_bytes = 4;
    let app = helpers::TestApp::with_config(config);
    let inbox = app.folder("Inbox").await;

    let err = app
        .organizer
        .uploads
        .upload_file(&app.ctx, inbox.id, UploadItem::new("big.pdf", "12345"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(app.blobs.len(), 0);
}

#[tokio::test]
async fn test_upload_into_missing_folder() {
    let app = helpers::TestApp::new();

    let err = app
        .organizer
        .uploads
        .upload_file(&app.ctx, FolderId(7), UploadItem::new("a.pdf", "a"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::TargetFolderNotFound);
}

#[tokio::test]
async fn test_upload_catalog_failure_is_upload_failed() {
    let app = helpers::TestApp::new();
    let inbox = app.folder("Inbox").await;
    app.catalog.fail_inserts_into(inbox.id);

    let err = app
        .organizer
        .uploads
        .upload_file(&app.ctx, inbox.id, UploadItem::new("a.pdf", "a"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::UploadFailed);
    assert_eq!(err.root_kind(), ErrorKind::StoreUnavailable);
    assert_eq!(app.blobs.paths(), vec!["Inbox/a.pdf"]);
}

#[tokio::test]
async fn test_upload_folder_is_best_effort() {
    let app = helpers::TestApp::new();
    let items = vec![
        UploadItem::new("a.pdf", "one"),
        UploadItem::new("   ", "nameless"),
        UploadItem::new("a.pdf", "two"),
    ];

    let report = app
        .organizer
        .uploads
        .upload_folder(&app.ctx, "Receipts", items)
        .await
        .unwrap();

    assert!(report.folder_created);
    assert_eq!(report.folder.name, "Receipts");
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);
    match &report.items[1].result {
        ItemResult::Failed { kind, .. } => assert_eq!(*kind, ErrorKind::Validation),
        ItemResult::Succeeded { .. } => panic!("blank name should fail"),
    }
    assert_eq!(app.names_in(&report.folder).await, vec!["a(1).pdf", "a.pdf"]);

    let again = app
        .organizer
        .uploads
        .upload_folder(&app.ctx, "Receipts", vec![UploadItem::new("a.pdf", "three")])
        .await
        .unwrap();
    assert!(!again.folder_created);
    assert_eq!(again.folder.id, report.folder.id);
    match &again.items[0].result {
        ItemResult::Succeeded { file } => assert_eq!(file.name, "a(2).pdf"),
        ItemResult::Failed { message, .. } => panic!("upload failed: {message}"),
    }
}

#[tokio::test]
async fn test_upload_requires_actor() {
    let app = helpers::TestApp::new();

    let err = app
        .organizer
        .uploads
        .upload_folder(&RequestContext::anonymous(), "Receipts", vec![])
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Unauthenticated);
    assert!(app.organizer.listing.list_folders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_file_removes_row_and_blob() {
    let app = helpers::TestApp::new();
    let inbox = app.folder("Inbox").await;
    let file = app.upload(&inbox, "a.pdf", "a").await;

    let deleted = app.organizer.files.delete_file(&app.ctx, file.id).await.unwrap();

    assert_eq!(deleted.id, file.id);
    assert!(app.names_in(&inbox).await.is_empty());
    assert_eq!(app.blobs.len(), 0);

    let err = app
        .organizer
        .files
        .delete_file(&app.ctx, file.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_file_tolerates_blob_failure() {
    let app = helpers::TestApp::new();
    let inbox = app.folder("Inbox").await;
    let file = app.upload(&inbox, "a.pdf", "a").await;
    app.blobs.fail_deletes();

    app.organizer.files.delete_file(&app.ctx, file.id).await.unwrap();

    assert!(app.names_in(&inbox).await.is_empty());
    assert_eq!(app.blobs.len(), 1);
}

#[tokio::test]
async fn test_local_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.catalog.provider = "memory".to_string();
    config.storage.provider = "local".to_string();
    config.storage.local.root_path = dir.path().display().to_string();
    let organizer = Organizer::from_config(&config).await.unwrap();
    let ctx = RequestContext::for_user("user-1", "Ann Lee");

    let inbox = organizer.folders.create_folder(&ctx, "Inbox").await.unwrap();
    let archive = organizer.folders.create_folder(&ctx, "Archive").await.unwrap();
    let file = organizer
        .uploads
        .upload_file(&ctx, inbox.id, UploadItem::new("lease agreement.pdf", "signed"))
        .await
        .unwrap();
    assert!(dir.path().join("Inbox/lease agreement.pdf").exists());
    assert!(file.url.ends_with("/pdf/Inbox/lease%20agreement.pdf"));

    let moved = organizer
        .transfers
        .move_file(&ctx, file.id, archive.id)
        .await
        .unwrap();

    assert_eq!(moved.id, file.id);
    assert!(!dir.path().join("Inbox/lease agreement.pdf").exists());
    let archived: Vec<_> = std::fs::read_dir(dir.path().join("Archive"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(archived.len(), 1);
    assert!(archived[0].starts_with("lease agreement-"));
}
