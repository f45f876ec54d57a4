mod common;

use std::sync::Arc;

use common::*;
use evernote_repository::reference::SourceKind;
use evernote_repository::{
    BrowsableSource, ConfigError, EvernoteRepository, FileReference, RepositoryError, ReturnTypes,
};
use tempfile::TempDir;

fn store_with_attachment() -> Arc<FakeNoteStore> {
    Arc::new(FakeNoteStore {
        notes: vec![note("n1", "Trip", vec![resource("r1", "n1", "map.png")])],
        ..FakeNoteStore::default()
    })
}

fn shared_reference(url: String) -> String {
    FileReference::new("resource:r1|note:n1", &host_user())
        .unwrap()
        .with_share_url(url)
        .to_blob()
        .unwrap()
}

#[tokio::test]
async fn test_reference_without_share_link() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_with_attachment();
    let repo = repository(store.clone(), logged_in_prefs(), options(&temp_dir));

    let blob = repo
        .get_file_reference("resource:r1|note:n1", false)
        .await
        .unwrap();
    let reference = FileReference::from_blob(&blob).unwrap();

    assert_eq!(reference.source_kind, SourceKind::Resource);
    assert_eq!(reference.guid.as_deref(), Some("r1"));
    assert_eq!(reference.note_id.as_deref(), Some("n1"));
    assert_eq!(reference.user_id, 42);
    assert_eq!(reference.user_name, "Ada Lovelace");
    assert_eq!(reference.url, "");
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn test_reference_with_share_link() {
    let temp_dir = TempDir::new().unwrap();
    let connector = Arc::new(FakeConnector::new(store_with_attachment()));
    let repo = EvernoteRepository::new(
        config(),
        options(&temp_dir),
        host_user(),
        logged_in_prefs(),
        connector.clone(),
        Arc::new(FakeOAuth::default()),
    )
    .unwrap();

    let blob = repo
        .get_file_reference("resource:r1|note:n1", true)
        .await
        .unwrap();
    let reference = FileReference::from_blob(&blob).unwrap();

    assert_eq!(reference.source_kind, SourceKind::ShareLink);
    assert_eq!(
        reference.url,
        "https://sandbox.evernote.com/shard/s1/sh/n1/k3y/res/r1"
    );
    let endpoints = connector.endpoints.lock().unwrap();
    assert!(endpoints.iter().any(|e| e.path == "/edam/user" && e.port == 443));
}

#[tokio::test]
async fn test_share_failure() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FakeNoteStore {
        fail_share: true,
        ..FakeNoteStore::default()
    });
    let repo = repository(store, logged_in_prefs(), options(&temp_dir));

    let err = repo
        .get_file_reference("resource:r1|note:n1", true)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ShareFailed));
}

#[tokio::test]
async fn test_share_needs_a_note() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_with_attachment();
    let repo = repository(store.clone(), logged_in_prefs(), options(&temp_dir));

    let err = repo.get_file_reference("resource:r1", true).await.unwrap_err();
    assert!(matches!(err, RepositoryError::ShareFailed));
    assert_eq!(store.call_count(), 0);

    // Without sharing, a bare resource is fine.
    assert!(repo.get_file_reference("resource:r1", false).await.is_ok());
}

#[tokio::test]
async fn test_malformed_source() {
    let temp_dir = TempDir::new().unwrap();
    let repo = repository(
        store_with_attachment(),
        logged_in_prefs(),
        options(&temp_dir),
    );

    let err = repo
        .get_file_reference("note:n1|Trip", false)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Config(ConfigError::MalformedSource(_))
    ));
}

#[tokio::test]
async fn test_download_from_share_link() {
    let temp_dir = TempDir::new().unwrap();
    let addr = serve_share_links().await;
    let store = store_with_attachment();
    let repo = repository(store.clone(), logged_in_prefs(), options(&temp_dir));

    let blob = shared_reference(format!("http://{}/shared/ok", addr));
    let file = repo.get_file(&blob, "map.png").await.unwrap();

    assert!(file.path.starts_with(temp_dir.path()));
    assert_eq!(file.path.file_name().unwrap(), "map.png");
    assert_eq!(tokio::fs::read(&file.path).await.unwrap(), ATTACHMENT);
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn test_failed_share_link_does_not_fall_back() {
    let temp_dir = TempDir::new().unwrap();
    let addr = serve_share_links().await;
    let store = store_with_attachment();
    let repo = repository(store.clone(), logged_in_prefs(), options(&temp_dir));

    let blob = shared_reference(format!("http://{}/shared/gone", addr));
    let err = repo.get_file(&blob, "map.png").await.unwrap_err();

    assert!(matches!(err, RepositoryError::CannotDownload));
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn test_failed_downloads_leave_no_scratch_files() {
    let temp_dir = TempDir::new().unwrap();
    let addr = serve_share_links().await;
    let repo = repository(
        store_with_attachment(),
        logged_in_prefs(),
        options(&temp_dir),
    );

    let blob = shared_reference(format!("http://{}/shared/gone", addr));
    for _ in 0..3 {
        let err = repo.get_file(&blob, "map.png").await.unwrap_err();
        assert!(matches!(err, RepositoryError::CannotDownload));
    }

    let missing = FileReference::new("resource:gone", &host_user())
        .unwrap()
        .to_blob()
        .unwrap();
    assert!(repo.get_file(&missing, "x.png").await.is_err());

    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_unusable_temp_dir_cannot_download() {
    let temp_dir = TempDir::new().unwrap();
    let not_a_dir = temp_dir.path().join("occupied");
    std::fs::write(&not_a_dir, b"").unwrap();

    let store = store_with_attachment();
    let mut opts = options(&temp_dir);
    opts.temp_dir = not_a_dir;
    let repo = repository(store.clone(), logged_in_prefs(), opts);

    let blob = FileReference::new("resource:r1|note:n1", &host_user())
        .unwrap()
        .to_blob()
        .unwrap();
    let err = repo.get_file(&blob, "map.png").await.unwrap_err();

    assert!(matches!(err, RepositoryError::CannotDownload));
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn test_download_from_account_without_share_link() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_with_attachment();
    let repo = repository(store.clone(), logged_in_prefs(), options(&temp_dir));

    let blob = repo
        .get_file_reference("resource:r1|note:n1", false)
        .await
        .unwrap();
    let file = repo.get_file(&blob, "map.png").await.unwrap();

    assert_eq!(tokio::fs::read(&file.path).await.unwrap(), ATTACHMENT);
    assert_eq!(*store.calls.lock().unwrap(), vec!["getResource"]);
}

#[tokio::test]
async fn test_missing_resource_cannot_download() {
    let temp_dir = TempDir::new().unwrap();
    let repo = repository(
        Arc::new(FakeNoteStore::default()),
        logged_in_prefs(),
        options(&temp_dir),
    );

    let blob = FileReference::new("resource:gone", &host_user())
        .unwrap()
        .to_blob()
        .unwrap();
    let err = repo.get_file(&blob, "x.png").await.unwrap_err();
    assert!(matches!(err, RepositoryError::CannotDownload));
}

#[tokio::test]
async fn test_size_of_shared_file() {
    let temp_dir = TempDir::new().unwrap();
    let addr = serve_share_links().await;
    let repo = repository(
        store_with_attachment(),
        logged_in_prefs(),
        options(&temp_dir),
    );

    let url = format!("http://{}/shared/ok", addr);
    let sync = repo
        .get_file_by_reference(&shared_reference(url.clone()))
        .await
        .unwrap();
    assert_eq!(sync.file_path, url);
    assert_eq!(sync.file_size, Some(ATTACHMENT.len() as u64));

    let gone = repo
        .get_file_by_reference(&shared_reference(format!("http://{}/shared/gone", addr)))
        .await
        .unwrap();
    assert_eq!(gone.file_size, None);
}

#[tokio::test]
async fn test_size_check_propagates_transport_errors() {
    let temp_dir = TempDir::new().unwrap();
    let addr = closed_port().await;
    let repo = repository(
        store_with_attachment(),
        logged_in_prefs(),
        options(&temp_dir),
    );

    let err = repo
        .get_file_by_reference(&shared_reference(format!("http://{}/shared/ok", addr)))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Http(_)));
}

#[tokio::test]
async fn test_send_file_redirects_to_share_link() {
    let temp_dir = TempDir::new().unwrap();
    let repo = repository(
        store_with_attachment(),
        logged_in_prefs(),
        options(&temp_dir),
    );

    let url = "https://sandbox.evernote.com/shard/s1/sh/n1/k3y/res/r1".to_string();
    assert_eq!(repo.send_file(&shared_reference(url.clone())).unwrap(), url);

    let unshared = FileReference::new("resource:r1|note:n1", &host_user())
        .unwrap()
        .to_blob()
        .unwrap();
    assert!(matches!(
        repo.send_file(&unshared),
        Err(RepositoryError::CannotDownload)
    ));
}

#[tokio::test]
async fn test_reference_descriptions() {
    let temp_dir = TempDir::new().unwrap();
    let repo = repository(
        store_with_attachment(),
        logged_in_prefs(),
        options(&temp_dir),
    );
    let blob = shared_reference(String::new());

    assert_eq!(
        repo.get_reference_details(&blob, 0).unwrap(),
        "Evernote (Ada Lovelace)"
    );
    assert_eq!(
        repo.get_reference_details(&blob, 666).unwrap(),
        "Error, source missing."
    );
    assert_eq!(
        repo.get_file_source_info("resource:r1|note:n1"),
        "Evernote (Ada Lovelace): resource:r1|note:n1"
    );
    assert!(matches!(
        repo.get_reference_details("not json", 0),
        Err(RepositoryError::Config(ConfigError::MalformedReference(_)))
    ));
}

#[tokio::test]
async fn test_return_types_and_options() {
    let temp_dir = TempDir::new().unwrap();
    let repo = repository(
        store_with_attachment(),
        logged_in_prefs(),
        options(&temp_dir),
    );

    assert_eq!(
        repo.supported_return_types(),
        ReturnTypes::INTERNAL | ReturnTypes::REFERENCE
    );
    assert_eq!(
        EvernoteRepository::type_option_names(),
        &["pluginname", "key", "secret", "usedevapi"]
    );
}
