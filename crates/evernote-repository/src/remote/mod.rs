//! Seams to the Evernote RPC clients.
//!
//! The binary RPC protocol is spoken by an external client library. This
//! module only describes what the repository needs from it:
//! - `NoteStore` - notebooks, tags, searches, notes and attachments
//! - `UserStore` - the authenticated user (for the shard id)
//! - `StoreConnector` - builds both clients from a parsed endpoint

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::config::ConfigError;

mod types;

pub use types::*;

/// EDAM error codes, as carried by user and system exceptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Unknown = 1,
    BadDataFormat = 2,
    PermissionDenied = 3,
    InternalError = 4,
    DataRequired = 5,
    LimitReached = 6,
    QuotaReached = 7,
    InvalidAuth = 8,
    AuthExpired = 9,
    DataConflict = 10,
    EnmlValidation = 11,
    ShardUnavailable = 12,
    LenTooShort = 13,
    LenTooLong = 14,
    TooFew = 15,
    TooMany = 16,
    UnsupportedOperation = 17,
    TakenDown = 18,
    RateLimitReached = 19,
}

impl ErrorCode {
    /// Map a wire code, falling back to `Unknown`.
    pub fn from_code(code: i32) -> Self {
        match code {
            2 => ErrorCode::BadDataFormat,
            3 => ErrorCode::PermissionDenied,
            4 => ErrorCode::InternalError,
            5 => ErrorCode::DataRequired,
            6 => ErrorCode::LimitReached,
            7 => ErrorCode::QuotaReached,
            8 => ErrorCode::InvalidAuth,
            9 => ErrorCode::AuthExpired,
            10 => ErrorCode::DataConflict,
            11 => ErrorCode::EnmlValidation,
            12 => ErrorCode::ShardUnavailable,
            13 => ErrorCode::LenTooShort,
            14 => ErrorCode::LenTooLong,
            15 => ErrorCode::TooFew,
            16 => ErrorCode::TooMany,
            17 => ErrorCode::UnsupportedOperation,
            18 => ErrorCode::TakenDown,
            19 => ErrorCode::RateLimitReached,
            _ => ErrorCode::Unknown,
        }
    }
}

/// Errors raised by the RPC clients.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    #[error("Evernote rejected the request ({code:?}, parameter: {parameter:?})")]
    User {
        code: ErrorCode,
        parameter: Option<String>,
    },

    #[error("Evernote system error ({code:?}): {message}")]
    System { code: ErrorCode, message: String },

    #[error("Evernote object not found: {identifier}")]
    NotFound { identifier: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl RemoteError {
    /// Whether the user must authenticate again.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            RemoteError::User {
                code: ErrorCode::InvalidAuth | ErrorCode::AuthExpired,
                ..
            }
        )
    }
}

pub type Result<T> = std::result::Result<T, RemoteError>;

/// Note store client. Every call takes the user's access token.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn find_notes_metadata(
        &self,
        token: &str,
        filter: &NoteFilter,
        offset: u32,
        max_notes: u32,
        spec: &NotesMetadataResultSpec,
    ) -> Result<NotesMetadataList>;

    /// Full notes (with resources), used by non-dynamic searches
    async fn find_notes(
        &self,
        token: &str,
        filter: &NoteFilter,
        offset: u32,
        max_notes: u32,
    ) -> Result<NoteList>;

    async fn list_notebooks(&self, token: &str) -> Result<Vec<Notebook>>;

    async fn list_tags(&self, token: &str) -> Result<Vec<Tag>>;

    async fn list_searches(&self, token: &str) -> Result<Vec<SavedSearch>>;

    async fn get_search(&self, token: &str, guid: &str) -> Result<SavedSearch>;

    async fn get_note(&self, token: &str, guid: &str, options: NoteOptions) -> Result<Note>;

    async fn get_resource(
        &self,
        token: &str,
        guid: &str,
        options: ResourceOptions,
    ) -> Result<Resource>;

    /// Make a note public and return its share key
    async fn share_note(&self, token: &str, guid: &str) -> Result<String>;
}

/// User store client.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, token: &str) -> Result<User>;
}

/// Where an RPC client should connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEndpoint {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl StoreEndpoint {
    /// Parse a store URL, defaulting the port from the scheme.
    pub fn parse(raw: &str) -> std::result::Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidStoreUrl {
            url: raw.to_string(),
            reason: reason.to_string(),
        };
        let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
        let host = url.host_str().ok_or_else(|| invalid("missing host"))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| invalid("unknown port"))?;
        Ok(Self {
            scheme: url.scheme().to_string(),
            host: host.to_string(),
            port,
            path: url.path().to_string(),
        })
    }

    /// Downgrade to plain HTTP. Only used when SSL compatibility mode is on.
    pub fn into_plain_http(mut self) -> Self {
        if self.scheme == "https" {
            self.scheme = "http".to_string();
            if self.port == 443 {
                self.port = 80;
            }
        }
        self
    }

    pub fn url(&self) -> String {
        format!("{}://{}:{}{}", self.scheme, self.host, self.port, self.path)
    }
}

/// Builds RPC clients for an endpoint.
pub trait StoreConnector: Send + Sync {
    fn note_store(&self, endpoint: &StoreEndpoint) -> Result<Arc<dyn NoteStore>>;

    fn user_store(&self, endpoint: &StoreEndpoint) -> Result<Arc<dyn UserStore>>;
}
