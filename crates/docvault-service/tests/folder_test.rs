//! Integration tests for folder management and listings.

mod helpers;

use docvault_core::error::ErrorKind;
use docvault_core::types::{FileSort, FileSortKey, SortDirection};
use docvault_service::{FileQuery, RequestContext};

#[tokio::test]
async fn test_delete_folder_requires_empty_folder() {
    let app = helpers::TestApp::new();
    let inbox = app.folder("Inbox").await;
    let file = app.upload(&inbox, "a.pdf", "a").await;

    let err = app
        .organizer
        .folders
        .delete_folder(&app.ctx, inbox.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderNotEmpty);

    app.organizer.files.delete_file(&app.ctx, file.id).await.unwrap();
    app.organizer
        .folders
        .delete_folder(&app.ctx, inbox.id)
        .await
        .unwrap();

    let err = app.organizer.folders.get_folder(inbox.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_list_folders_with_counts() {
    let app = helpers::TestApp::new();
    let inbox = app.folder("Inbox").await;
    let archive = app.folder("Archive").await;
    app.upload(&inbox, "a.pdf", "a").await;
    app.upload(&inbox, "b.pdf", "b").await;

    let folders = app.organizer.listing.list_folders().await.unwrap();

    assert_eq!(folders.len(), 2);
    let count_of = |name: &str| {
        folders
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.total_files)
            .unwrap()
    };
    assert_eq!(count_of("Inbox"), 2);
    assert_eq!(count_of("Archive"), 0);
    assert!(folders.iter().any(|f| f.id == archive.id && f.is_empty()));
}

#[tokio::test]
async fn test_list_files_of_missing_folder() {
    let app = helpers::TestApp::new();
    let inbox = app.folder("Inbox").await;
    app.organizer
        .folders
        .delete_folder(&app.ctx, inbox.id)
        .await
        .unwrap();

    let err = app.organizer.listing.list_files(inbox.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = app
        .organizer
        .listing
        .list_files_in_folder_named("Inbox")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_list_files_by_folder_name() {
    let app = helpers::TestApp::new();
    let inbox = app.folder("Inbox").await;
    app.upload(&inbox, "b.pdf", "b").await;
    app.upload(&inbox, "a.pdf", "a").await;

    let files = app
        .organizer
        .listing
        .list_files_in_folder_named(" Inbox ")
        .await
        .unwrap();

    let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.pdf", "b.pdf"]);
}

#[tokio::test]
async fn test_query_files_filters_and_sorts() {
    let app = helpers::TestApp::new();
    let inbox = app.folder("Inbox").await;
    app.upload(&inbox, "small.pdf", "x").await;
    app.upload(&inbox, "large.pdf", &"x".repeat(4096)).await;
    let bo = RequestContext::for_user("user-2", "Bo Chen");
    app.organizer
        .uploads
        .upload_file(
            &bo,
            inbox.id,
            docvault_service::UploadItem::new("medium.pdf", "x".repeat(2048)),
        )
        .await
        .unwrap();

    let by_size = FileQuery::new().sorted(FileSort::new(FileSortKey::FileSize, SortDirection::Desc));
    let names: Vec<_> = app
        .organizer
        .listing
        .query_files(inbox.id, &by_size)
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["large.pdf", "medium.pdf", "small.pdf"]);

    let by_bo = FileQuery::new().with_uploaded_by("bo");
    let files = app
        .organizer
        .listing
        .query_files(inbox.id, &by_bo)
        .await
        .unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "medium.pdf");

    let by_name = FileQuery::new().with_name("L");
    let files = app
        .organizer
        .listing
        .query_files(inbox.id, &by_name)
        .await
        .unwrap();
    let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["large.pdf", "small.pdf"]);
}

#[tokio::test]
async fn test_import_folders_then_upload() {
    let app = helpers::TestApp::new();
    let names = vec!["Tax".to_string(), "Medical".to_string(), "Tax".to_string()];

    let import = app
        .organizer
        .folders
        .import_folders(&app.ctx, &names)
        .await
        .unwrap();

    assert_eq!(import.created, 2);
    let tax = &import.folders[0];
    app.upload(tax, "w2.pdf", "wages").await;
    assert_eq!(app.names_in(tax).await, vec!["w2.pdf"]);
}
