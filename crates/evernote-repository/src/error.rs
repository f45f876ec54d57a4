//! Error type of the repository operations.

use thiserror::Error;

use crate::config::ConfigError;
use crate::oauth::OAuthError;
use crate::prefs::PreferenceError;
use crate::remote::RemoteError;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not logged in to Evernote")]
    NotLoggedIn,

    #[error("Could not get a request token from Evernote: {0}")]
    RequestToken(#[source] OAuthError),

    #[error("OAuth exchange failed: {0}")]
    OAuth(#[source] OAuthError),

    #[error("You do not have the permission to access these notes")]
    PermissionDenied,

    #[error("Cannot download this file")]
    CannotDownload,

    #[error("Error while sharing the note to get a download URL")]
    ShareFailed,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Preferences(#[from] PreferenceError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RepositoryError {
    /// Whether the host should show the login prompt again.
    pub fn requires_login(&self) -> bool {
        match self {
            RepositoryError::NotLoggedIn => true,
            RepositoryError::Remote(err) => err.is_auth_failure(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
