//! OAuth 1.0a glue.
//!
//! Signing and the token exchange are done by an external helper behind
//! [`OAuthHelper`]. This module derives the endpoints and the prompt shown
//! to the user.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::{AdminConfig, RepositoryOptions};

#[derive(Debug, Clone, Error)]
pub enum OAuthError {
    #[error("OAuth request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("OAuth response is missing '{0}'")]
    MissingField(String),

    #[error("Invalid callback URL: {0}")]
    InvalidCallback(String),
}

/// URLs and credentials of one OAuth exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthEndpoints {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub request_token_url: String,
    pub access_token_url: String,
    pub authorize_url: String,
    pub callback_url: String,
}

impl OAuthEndpoints {
    pub fn new(
        config: &AdminConfig,
        options: &RepositoryOptions,
    ) -> Result<Self, OAuthError> {
        let api = config.api_url();
        Ok(Self {
            consumer_key: config.consumer_key.clone(),
            consumer_secret: config.consumer_secret.clone(),
            request_token_url: format!("{}/oauth", api),
            access_token_url: format!("{}/oauth", api),
            authorize_url: format!("{}/OAuth.action", api),
            callback_url: callback_url(&options.www_root, options.instance_id)?,
        })
    }
}

fn callback_url(www_root: &str, instance_id: u64) -> Result<String, OAuthError> {
    let raw = format!(
        "{}/repository/repository_callback.php",
        www_root.trim_end_matches('/')
    );
    let mut url = Url::parse(&raw).map_err(|e| OAuthError::InvalidCallback(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("callback", "yes")
        .append_pair("repo_id", &instance_id.to_string());
    Ok(url.into())
}

/// Temporary credentials from the first leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestToken {
    pub token: String,
    pub secret: String,
    /// Where the user approves access
    pub authorize_url: String,
}

/// Result of the access-token exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    pub access_token: String,
    pub note_store_url: String,
    pub user_id: String,
}

#[async_trait]
pub trait OAuthHelper: Send + Sync {
    async fn request_token(&self, endpoints: &OAuthEndpoints) -> Result<RequestToken, OAuthError>;

    async fn get_access_token(
        &self,
        endpoints: &OAuthEndpoints,
        token: &str,
        secret: &str,
        verifier: &str,
    ) -> Result<AccessGrant, OAuthError>;
}

/// How the host should present the login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LoginPrompt {
    /// Open the authorize URL in a popup (AJAX pickers)
    Popup { url: String },
    /// Plain link to the authorize URL
    Link { url: String },
}

impl LoginPrompt {
    pub fn new(url: String, ajax: bool) -> Self {
        if ajax {
            LoginPrompt::Popup { url }
        } else {
            LoginPrompt::Link { url }
        }
    }

    pub fn url(&self) -> &str {
        match self {
            LoginPrompt::Popup { url } | LoginPrompt::Link { url } => url,
        }
    }
}
