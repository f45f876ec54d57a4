//! Fakes of the services the repository talks to.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::http::{StatusCode, header};
use axum::routing::get;
use evernote_repository::oauth::{
    AccessGrant, OAuthEndpoints, OAuthError, OAuthHelper, RequestToken,
};
use evernote_repository::prefs::InMemoryPreferences;
use evernote_repository::remote::{
    ErrorCode, Note, NoteFilter, NoteList, NoteMetadata, NoteOptions, NoteStore, Notebook,
    NotesMetadataList, NotesMetadataResultSpec, RemoteError, Resource, ResourceAttributes,
    ResourceData, ResourceOptions, SavedSearch, StoreConnector, StoreEndpoint, Tag, User,
    UserStore,
};
use evernote_repository::{AdminConfig, EvernoteRepository, HostUser, RepositoryOptions};
use tempfile::TempDir;

pub const ACCESS_TOKEN: &str = "S=s1:U=1a2b";
pub const NOTE_STORE_URL: &str = "https://sandbox.evernote.com/shard/s1/notestore";
pub const SHARE_KEY: &str = "k3y";
pub const ATTACHMENT: &[u8] = b"attachment bytes";

/// A metadata search as received by the note store
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataQuery {
    pub filter: NoteFilter,
    pub offset: u32,
    pub max_notes: u32,
}

#[derive(Default)]
pub struct FakeNoteStore {
    pub notebooks: Vec<Notebook>,
    pub tags: Vec<Tag>,
    pub searches: Vec<SavedSearch>,
    pub notes: Vec<Note>,
    pub deny_permission: bool,
    pub fail_share: bool,
    pub queries: Mutex<Vec<MetadataQuery>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeNoteStore {
    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_query(&self) -> Option<MetadataQuery> {
        self.queries.lock().unwrap().last().cloned()
    }

    fn page<T: Clone>(items: &[T], offset: u32, max: u32) -> Vec<T> {
        items
            .iter()
            .skip(offset as usize)
            .take(max as usize)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl NoteStore for FakeNoteStore {
    async fn find_notes_metadata(
        &self,
        token: &str,
        filter: &NoteFilter,
        offset: u32,
        max_notes: u32,
        _spec: &NotesMetadataResultSpec,
    ) -> Result<NotesMetadataList, RemoteError> {
        assert_eq!(token, ACCESS_TOKEN);
        self.record("findNotesMetadata");
        self.queries.lock().unwrap().push(MetadataQuery {
            filter: filter.clone(),
            offset,
            max_notes,
        });
        if self.deny_permission {
            return Err(RemoteError::User {
                code: ErrorCode::PermissionDenied,
                parameter: Some("Note".into()),
            });
        }
        let notes = Self::page(&self.notes, offset, max_notes)
            .into_iter()
            .map(|note| NoteMetadata {
                guid: note.guid,
                title: Some(note.title),
                created: Some(note.created),
                updated: Some(note.updated),
            })
            .collect();
        Ok(NotesMetadataList {
            start_index: offset,
            total_notes: self.notes.len() as u32,
            notes,
        })
    }

    async fn find_notes(
        &self,
        _token: &str,
        _filter: &NoteFilter,
        offset: u32,
        max_notes: u32,
    ) -> Result<NoteList, RemoteError> {
        self.record("findNotes");
        Ok(NoteList {
            start_index: offset,
            total_notes: self.notes.len() as u32,
            notes: Self::page(&self.notes, offset, max_notes),
        })
    }

    async fn list_notebooks(&self, _token: &str) -> Result<Vec<Notebook>, RemoteError> {
        self.record("listNotebooks");
        Ok(self.notebooks.clone())
    }

    async fn list_tags(&self, _token: &str) -> Result<Vec<Tag>, RemoteError> {
        self.record("listTags");
        Ok(self.tags.clone())
    }

    async fn list_searches(&self, _token: &str) -> Result<Vec<SavedSearch>, RemoteError> {
        self.record("listSearches");
        Ok(self.searches.clone())
    }

    async fn get_search(&self, _token: &str, guid: &str) -> Result<SavedSearch, RemoteError> {
        self.record("getSearch");
        self.searches
            .iter()
            .find(|s| s.guid == guid)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound {
                identifier: format!("SavedSearch.guid:{}", guid),
            })
    }

    async fn get_note(
        &self,
        _token: &str,
        guid: &str,
        _options: NoteOptions,
    ) -> Result<Note, RemoteError> {
        self.record("getNote");
        self.notes
            .iter()
            .find(|n| n.guid == guid)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound {
                identifier: format!("Note.guid:{}", guid),
            })
    }

    async fn get_resource(
        &self,
        _token: &str,
        guid: &str,
        options: ResourceOptions,
    ) -> Result<Resource, RemoteError> {
        self.record("getResource");
        assert!(options.with_data);
        self.notes
            .iter()
            .flat_map(|n| n.resources.iter())
            .find(|r| r.guid == guid)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound {
                identifier: format!("Resource.guid:{}", guid),
            })
    }

    async fn share_note(&self, _token: &str, _guid: &str) -> Result<String, RemoteError> {
        self.record("shareNote");
        if self.fail_share {
            return Err(RemoteError::User {
                code: ErrorCode::PermissionDenied,
                parameter: Some("Note.guid".into()),
            });
        }
        Ok(SHARE_KEY.to_string())
    }
}

pub struct FakeUserStore;

#[async_trait]
impl UserStore for FakeUserStore {
    async fn get_user(&self, token: &str) -> Result<User, RemoteError> {
        assert_eq!(token, ACCESS_TOKEN);
        Ok(User {
            id: 1,
            username: Some("ada".into()),
            shard_id: "s1".into(),
        })
    }
}

pub struct FakeConnector {
    pub note_store: Arc<FakeNoteStore>,
    pub endpoints: Mutex<Vec<StoreEndpoint>>,
}

impl FakeConnector {
    pub fn new(note_store: Arc<FakeNoteStore>) -> Self {
        Self {
            note_store,
            endpoints: Mutex::new(Vec::new()),
        }
    }
}

impl StoreConnector for FakeConnector {
    fn note_store(&self, endpoint: &StoreEndpoint) -> Result<Arc<dyn NoteStore>, RemoteError> {
        self.endpoints.lock().unwrap().push(endpoint.clone());
        let store: Arc<dyn NoteStore> = self.note_store.clone();
        Ok(store)
    }

    fn user_store(&self, endpoint: &StoreEndpoint) -> Result<Arc<dyn UserStore>, RemoteError> {
        self.endpoints.lock().unwrap().push(endpoint.clone());
        Ok(Arc::new(FakeUserStore))
    }
}

#[derive(Default)]
pub struct FakeOAuth {
    pub fail_request: bool,
}

#[async_trait]
impl OAuthHelper for FakeOAuth {
    async fn request_token(&self, endpoints: &OAuthEndpoints) -> Result<RequestToken, OAuthError> {
        if self.fail_request {
            return Err(OAuthError::Request {
                endpoint: endpoints.request_token_url.clone(),
                message: "401 Unauthorized".into(),
            });
        }
        Ok(RequestToken {
            token: "req-token".into(),
            secret: "req-secret".into(),
            authorize_url: format!("{}?oauth_token=req-token", endpoints.authorize_url),
        })
    }

    async fn get_access_token(
        &self,
        _endpoints: &OAuthEndpoints,
        token: &str,
        secret: &str,
        verifier: &str,
    ) -> Result<AccessGrant, OAuthError> {
        assert_eq!(token, "req-token");
        assert_eq!(secret, "req-secret");
        if verifier.is_empty() {
            return Err(OAuthError::MissingField("oauth_verifier".into()));
        }
        Ok(AccessGrant {
            access_token: ACCESS_TOKEN.into(),
            note_store_url: NOTE_STORE_URL.into(),
            user_id: "1".into(),
        })
    }
}

pub fn config() -> AdminConfig {
    AdminConfig {
        consumer_key: "consumer".into(),
        consumer_secret: "secret".into(),
        use_sandbox_api: true,
        ssl_compatibility_mode: false,
    }
}

pub fn host_user() -> HostUser {
    HostUser {
        id: 42,
        full_name: "Ada Lovelace".into(),
    }
}

pub fn options(temp_dir: &TempDir) -> RepositoryOptions {
    RepositoryOptions {
        instance_id: 3,
        temp_dir: temp_dir.path().to_path_buf(),
        ..RepositoryOptions::default()
    }
}

/// Preferences of a user who completed the OAuth flow
pub fn logged_in_prefs() -> Arc<InMemoryPreferences> {
    Arc::new(InMemoryPreferences::with_values([
        ("repository_evernote_accesstoken", ACCESS_TOKEN),
        ("repository_evernote_notestoreurl", NOTE_STORE_URL),
        ("repository_evernote_userid", "1"),
    ]))
}

pub fn repository(
    store: Arc<FakeNoteStore>,
    prefs: Arc<InMemoryPreferences>,
    options: RepositoryOptions,
) -> EvernoteRepository {
    EvernoteRepository::new(
        config(),
        options,
        host_user(),
        prefs,
        Arc::new(FakeConnector::new(store)),
        Arc::new(FakeOAuth::default()),
    )
    .unwrap()
}

pub fn note(guid: &str, title: &str, resources: Vec<Resource>) -> Note {
    Note {
        guid: guid.into(),
        title: title.into(),
        created: 1_356_998_400_000,
        updated: 1_357_084_800_000,
        resources,
    }
}

pub fn resource(guid: &str, note_guid: &str, file_name: &str) -> Resource {
    Resource {
        guid: guid.into(),
        note_guid: note_guid.into(),
        mime: None,
        data: Some(ResourceData {
            size: Some(ATTACHMENT.len() as u64),
            body: Some(ATTACHMENT.to_vec()),
        }),
        attributes: Some(ResourceAttributes {
            file_name: Some(file_name.into()),
            source_url: None,
        }),
    }
}

pub fn notebook(guid: &str, name: &str, stack: Option<&str>) -> Notebook {
    Notebook {
        guid: guid.into(),
        name: name.into(),
        stack: stack.map(str::to_string),
        service_created: None,
        service_updated: None,
    }
}

/// Serve `/shared/ok` (200 with the attachment) and `/shared/gone` (404)
/// on a local port.
pub async fn serve_share_links() -> SocketAddr {
    let app = Router::new()
        .route(
            "/shared/ok",
            get(|| async {
                (
                    [(header::CONTENT_LENGTH, ATTACHMENT.len().to_string())],
                    ATTACHMENT,
                )
            }),
        )
        .route("/shared/gone", get(|| async { StatusCode::NOT_FOUND }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
