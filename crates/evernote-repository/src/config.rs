//! Admin settings and per-instance options.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// URL of the production API.
pub const API_PROD: &str = "https://www.evernote.com";

/// URL of the development (sandbox) API.
pub const API_DEV: &str = "https://sandbox.evernote.com";

/// Settings an administrator enters once for the repository type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminConfig {
    /// OAuth consumer key issued by Evernote
    #[serde(default)]
    pub consumer_key: String,

    /// OAuth consumer secret issued by Evernote
    #[serde(default)]
    pub consumer_secret: String,

    /// Talk to sandbox.evernote.com instead of production
    #[serde(default)]
    pub use_sandbox_api: bool,

    /// Reach the note store over plain HTTP.
    ///
    /// Works around OpenSSL builds that fail the Evernote handshake. Highly
    /// discouraged.
    #[serde(default)]
    pub ssl_compatibility_mode: bool,
}

impl AdminConfig {
    /// Names of the options stored for the repository type.
    pub const OPTION_NAMES: &'static [&'static str] = &["pluginname", "key", "secret", "usedevapi"];

    /// Load the admin configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AdminConfig =
            serde_json::from_str(&content).with_context(|| "Failed to parse admin config")?;
        tracing::info!("Loaded admin configuration from {:?}", path);
        Ok(config)
    }

    /// Override the consumer credentials from the environment.
    ///
    /// Reads `EVERNOTE_CONSUMER_KEY`, `EVERNOTE_CONSUMER_SECRET` and
    /// `EVERNOTE_USE_SANDBOX` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("EVERNOTE_CONSUMER_KEY") {
            self.consumer_key = key;
        }
        if let Ok(secret) = std::env::var("EVERNOTE_CONSUMER_SECRET") {
            self.consumer_secret = secret;
        }
        if let Ok(sandbox) = std::env::var("EVERNOTE_USE_SANDBOX") {
            self.use_sandbox_api = matches!(sandbox.as_str(), "1" | "true" | "yes");
        }
        self
    }

    /// Check the fields the settings form marks as required.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.consumer_key.trim().is_empty() {
            return Err(ConfigError::MissingConsumerKey);
        }
        if self.consumer_secret.trim().is_empty() {
            return Err(ConfigError::MissingConsumerSecret);
        }
        Ok(())
    }

    /// Root URL of the API this configuration talks to.
    pub fn api_url(&self) -> &'static str {
        if self.use_sandbox_api { API_DEV } else { API_PROD }
    }
}

/// Behaviour of one repository instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryOptions {
    /// Instance id, used in the OAuth callback URL
    #[serde(default)]
    pub instance_id: u64,

    /// Display name of the instance
    #[serde(default = "default_name")]
    pub name: String,

    /// Public root of the host site
    #[serde(default = "default_www_root")]
    pub www_root: String,

    /// Whether the host renders the picker with AJAX (popup login)
    #[serde(default = "default_true")]
    pub ajax: bool,

    /// Notes per page when browsing
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,

    /// Report page/pages to the host
    #[serde(default)]
    pub enable_paging: bool,

    /// Limit browsing (not searching) to notes that have attachments
    #[serde(default = "default_true")]
    pub notes_with_attachments_only: bool,

    /// Maximum results of a search query
    #[serde(default = "default_search_max_results")]
    pub search_max_results: u32,

    /// Load search results lazily, note by note
    #[serde(default = "default_true")]
    pub search_dynload: bool,

    /// Timeout of a share-link download in seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// Evernote web access, shown as "manage"
    #[serde(default = "default_manage_url")]
    pub manage_url: String,

    /// Evernote web logout
    #[serde(default = "default_logout_url")]
    pub logout_url: String,

    /// Where downloaded files are written
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// File extensions the host accepts (without dot). Empty accepts all.
    #[serde(default)]
    pub accepted_types: Vec<String>,
}

impl RepositoryOptions {
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Whether the host accepts a file with this name.
    pub fn accepts(&self, file_name: &str) -> bool {
        if self.accepted_types.is_empty() || self.accepted_types.iter().any(|t| t == "*") {
            return true;
        }
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension {
            Some(ext) => self
                .accepted_types
                .iter()
                .any(|t| t.trim_start_matches('.').eq_ignore_ascii_case(&ext)),
            None => false,
        }
    }
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            instance_id: 0,
            name: default_name(),
            www_root: default_www_root(),
            ajax: true,
            items_per_page: default_items_per_page(),
            enable_paging: false,
            notes_with_attachments_only: true,
            search_max_results: default_search_max_results(),
            search_dynload: true,
            download_timeout_secs: default_download_timeout(),
            manage_url: default_manage_url(),
            logout_url: default_logout_url(),
            temp_dir: default_temp_dir(),
            accepted_types: Vec::new(),
        }
    }
}

fn default_name() -> String {
    "Evernote".to_string()
}

fn default_www_root() -> String {
    "http://localhost".to_string()
}

fn default_true() -> bool {
    true
}

fn default_items_per_page() -> u32 {
    250
}

fn default_search_max_results() -> u32 {
    50
}

fn default_download_timeout() -> u64 {
    30
}

fn default_manage_url() -> String {
    "https://www.evernote.com/Home.action".to_string()
}

fn default_logout_url() -> String {
    "https://www.evernote.com/Logout.action".to_string()
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("evernote-repository")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Consumer key is required")]
    MissingConsumerKey,

    #[error("Consumer secret is required")]
    MissingConsumerSecret,

    #[error("Invalid store URL '{url}': {reason}")]
    InvalidStoreUrl { url: String, reason: String },

    #[error("Malformed file reference: {0}")]
    MalformedReference(String),

    #[error("Cannot create a reference from source '{0}'")]
    MalformedSource(String),
}
