//! File references handed to the host and back.
//!
//! A reference is created when the user picks an attachment. It is stored
//! by the host as an opaque JSON blob and given back when the file must be
//! downloaded, synchronised or served.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

const RESOURCE_PREFIX: &str = "resource:";

/// The user of the host on whose behalf a reference is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostUser {
    pub id: u64,
    pub full_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    /// Fetched from the account with the user's access token
    Resource,
    /// Fetched anonymously from a public share link
    ShareLink,
}

/// Parsed `resource:<guid>|note:<noteGuid>` source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSource {
    pub guid: String,
    pub note_id: Option<String>,
}

/// Parse a source string produced by the listing.
pub fn parse_source(source: &str) -> Result<ResourceSource, ConfigError> {
    let malformed = || ConfigError::MalformedSource(source.to_string());

    let rest = source.strip_prefix(RESOURCE_PREFIX).ok_or_else(malformed)?;
    let (guid, note) = match rest.split_once('|') {
        Some((guid, note)) => (guid, Some(note)),
        None => (rest, None),
    };
    if guid.is_empty() {
        return Err(malformed());
    }

    let note_id = note
        .and_then(|n| n.split_once(':'))
        .map(|(_, id)| id)
        .filter(|id| !id.is_empty())
        .map(str::to_string);

    Ok(ResourceSource {
        guid: guid.to_string(),
        note_id,
    })
}

/// Public link to one attachment of a shared note.
pub fn share_url(api: &str, shard_id: &str, note_id: &str, share_key: &str, guid: &str) -> String {
    format!(
        "{}/shard/{}/sh/{}/{}/res/{}",
        api, shard_id, note_id, share_key, guid
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReference {
    pub source_kind: SourceKind,
    pub source: String,
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub note_id: Option<String>,
    pub user_id: u64,
    /// Full name of the user who picked the file
    pub user_name: String,
    /// Share link, empty until the note is shared
    #[serde(default)]
    pub url: String,
}

impl FileReference {
    pub fn new(source: &str, user: &HostUser) -> Result<Self, ConfigError> {
        let parsed = parse_source(source)?;
        Ok(Self {
            source_kind: SourceKind::Resource,
            source: source.to_string(),
            guid: Some(parsed.guid),
            note_id: parsed.note_id,
            user_id: user.id,
            user_name: user.full_name.clone(),
            url: String::new(),
        })
    }

    pub fn with_share_url(mut self, url: String) -> Self {
        self.source_kind = SourceKind::ShareLink;
        self.url = url;
        self
    }

    /// Share link, if one was created.
    pub fn share_link(&self) -> Option<&str> {
        Some(self.url.as_str()).filter(|url| !url.is_empty())
    }

    /// Guid of the attachment, from the reference or its source.
    pub fn resource_guid(&self) -> Option<String> {
        self.guid
            .clone()
            .filter(|guid| !guid.is_empty())
            .or_else(|| parse_source(&self.source).ok().map(|s| s.guid))
    }

    pub fn to_blob(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_blob(blob: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(blob).map_err(|e| ConfigError::MalformedReference(e.to_string()))
    }
}
