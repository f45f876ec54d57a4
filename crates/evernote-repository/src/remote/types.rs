//! Entities exchanged with the Evernote note store and user store.
//!
//! Field names follow the EDAM API. Timestamps are milliseconds since the
//! Unix epoch, as the service sends them.

use serde::{Deserialize, Serialize};

/// Opaque Evernote identifier.
pub type Guid = String;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    pub guid: Guid,
    pub name: String,
    /// Name of the stack the notebook belongs to, if any
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub service_created: Option<Timestamp>,
    #[serde(default)]
    pub service_updated: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub guid: Guid,
    pub name: String,
    #[serde(default)]
    pub parent_guid: Option<Guid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub guid: Guid,
    pub name: String,
    /// Search grammar query run when the saved search is opened
    pub query: String,
}

/// Partial note returned by `findNotesMetadata`.
///
/// Which fields are present depends on the [`NotesMetadataResultSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteMetadata {
    pub guid: Guid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created: Option<Timestamp>,
    #[serde(default)]
    pub updated: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub guid: Guid,
    pub title: String,
    pub created: Timestamp,
    pub updated: Timestamp,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// A binary attachment of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub guid: Guid,
    pub note_guid: Guid,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub data: Option<ResourceData>,
    #[serde(default)]
    pub attributes: Option<ResourceAttributes>,
}

impl Resource {
    /// File name of the attachment, `None` when missing or empty.
    pub fn file_name(&self) -> Option<&str> {
        self.attributes
            .as_ref()
            .and_then(|a| a.file_name.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// Size of the attachment body in bytes, if known.
    pub fn size(&self) -> Option<u64> {
        self.data.as_ref().and_then(|d| d.size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceData {
    #[serde(default)]
    pub size: Option<u64>,
    /// Only populated when requested with `with_data`
    #[serde(default)]
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAttributes {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    /// Shard hosting the user's account, needed to build share links
    pub shard_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteSortOrder {
    Created = 1,
    Updated = 2,
    Relevance = 3,
    UpdateSequenceNumber = 4,
    Title = 5,
}

/// Criteria for note searches.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteFilter {
    #[serde(default)]
    pub order: Option<NoteSortOrder>,
    #[serde(default)]
    pub ascending: Option<bool>,
    /// Search grammar query
    #[serde(default)]
    pub words: Option<String>,
    #[serde(default)]
    pub notebook_guid: Option<Guid>,
    #[serde(default)]
    pub tag_guids: Vec<Guid>,
}

impl NoteFilter {
    pub fn words(words: impl Into<String>) -> Self {
        Self {
            words: Some(words.into()),
            ..Self::default()
        }
    }

    pub fn notebook(guid: impl Into<Guid>) -> Self {
        Self {
            notebook_guid: Some(guid.into()),
            ..Self::default()
        }
    }

    pub fn tag(guid: impl Into<Guid>) -> Self {
        Self {
            tag_guids: vec![guid.into()],
            ..Self::default()
        }
    }

    /// Sort by title, ascending.
    pub fn by_title(mut self) -> Self {
        self.order = Some(NoteSortOrder::Title);
        self.ascending = Some(true);
        self
    }
}

/// Which optional fields `findNotesMetadata` should fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesMetadataResultSpec {
    pub include_title: bool,
    pub include_created: bool,
    pub include_updated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesMetadataList {
    pub start_index: u32,
    pub total_notes: u32,
    pub notes: Vec<NoteMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteList {
    pub start_index: u32,
    pub total_notes: u32,
    pub notes: Vec<Note>,
}

/// Parts of a note to fetch with `getNote`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteOptions {
    pub with_content: bool,
    pub with_resources_data: bool,
    pub with_resources_recognition: bool,
    pub with_resources_alternate_data: bool,
}

/// Parts of a resource to fetch with `getResource`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceOptions {
    pub with_data: bool,
    pub with_recognition: bool,
    pub with_attributes: bool,
    pub with_alternate_data: bool,
}

impl ResourceOptions {
    /// Body and attributes, as needed to save an attachment to disk.
    pub fn body_and_attributes() -> Self {
        Self {
            with_data: true,
            with_attributes: true,
            ..Self::default()
        }
    }
}
