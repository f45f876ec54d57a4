//! Mapping of Evernote entities to file picker entries.
//!
//! Notebooks, tags, saved searches and attachments are sorted in natural
//! order of their names. Notes keep the order the service returned them in,
//! which stays consistent across pages.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use node_path::{Mode, encode};
use serde::{Deserialize, Serialize};

use crate::collate::sort_by_key_natural;
use crate::remote::{Note, NoteMetadata, Notebook, Resource, SavedSearch, Tag, Timestamp};
use crate::strings;

/// Appended to a stack name to key it apart from notebook names.
///
/// A notebook literally named `<stack><suffix>` would still collide with the
/// stack. This is a known, accepted limitation.
pub const STACK_KEY_SUFFIX: &str = "-=-1Make2Me3Unique4Please5-=-";

/// Side of the square thumbnails, in pixels.
pub const THUMBNAIL_SIZE: u32 = 64;

/// Icon the host should render for an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Icon {
    Folder,
    File { extension: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub icon: Icon,
    pub width: u32,
    pub height: u32,
}

impl Thumbnail {
    pub fn folder() -> Self {
        Self {
            icon: Icon::Folder,
            width: THUMBNAIL_SIZE,
            height: THUMBNAIL_SIZE,
        }
    }

    /// Icon chosen by the extension of `file_name`.
    pub fn for_file(file_name: &str) -> Self {
        let extension = std::path::Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        Self {
            icon: Icon::File { extension },
            width: THUMBNAIL_SIZE,
            height: THUMBNAIL_SIZE,
        }
    }
}

/// One row of a listing: a folder (with `path`) or a file (with `source`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEntry {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub thumbnail: Thumbnail,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ListingEntry>>,
}

impl ListingEntry {
    pub fn folder(title: impl Into<String>, path: String) -> Self {
        Self {
            title: title.into(),
            path: Some(path),
            source: None,
            date_created: None,
            date_modified: None,
            size: None,
            thumbnail: Thumbnail::folder(),
            children: Some(Vec::new()),
        }
    }

    pub fn file(title: impl Into<String>, source: String) -> Self {
        let title = title.into();
        Self {
            thumbnail: Thumbnail::for_file(&title),
            title,
            path: None,
            source: Some(source),
            date_created: None,
            date_modified: None,
            size: None,
            children: None,
        }
    }

    fn with_dates(mut self, created: Option<Timestamp>, modified: Option<Timestamp>) -> Self {
        self.date_created = created.and_then(DateTime::from_timestamp_millis);
        self.date_modified = modified.and_then(DateTime::from_timestamp_millis);
        self
    }

    pub fn is_folder(&self) -> bool {
        self.path.is_some()
    }
}

/// What the listing needs from a note, full or metadata only.
pub trait NoteLike {
    fn guid(&self) -> &str;
    fn title(&self) -> &str;
    fn created(&self) -> Option<Timestamp>;
    fn updated(&self) -> Option<Timestamp>;

    fn resources(&self) -> &[Resource] {
        &[]
    }
}

impl NoteLike for Note {
    fn guid(&self) -> &str {
        &self.guid
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn created(&self) -> Option<Timestamp> {
        Some(self.created)
    }

    fn updated(&self) -> Option<Timestamp> {
        Some(self.updated)
    }

    fn resources(&self) -> &[Resource] {
        &self.resources
    }
}

impl NoteLike for NoteMetadata {
    fn guid(&self) -> &str {
        &self.guid
    }

    fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    fn created(&self) -> Option<Timestamp> {
        self.created
    }

    fn updated(&self) -> Option<Timestamp> {
        self.updated
    }
}

/// Entries keyed by name. Re-inserting a key replaces the entry.
#[derive(Default)]
struct KeyedEntries {
    entries: Vec<(String, ListingEntry)>,
    index: HashMap<String, usize>,
}

impl KeyedEntries {
    fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    fn insert(&mut self, key: String, entry: ListingEntry) {
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = entry,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, entry));
            }
        }
    }

    fn into_sorted(mut self) -> Vec<ListingEntry> {
        sort_by_key_natural(&mut self.entries, |(key, _)| key.as_str());
        self.entries.into_iter().map(|(_, entry)| entry).collect()
    }
}

/// The top-level choices.
pub fn root_options() -> Vec<ListingEntry> {
    [
        (Mode::All, "allnotes"),
        (Mode::Notebooks, "notebooks"),
        (Mode::Tags, "tags"),
        (Mode::Searchs, "savedsearchs"),
    ]
    .into_iter()
    .map(|(mode, label)| ListingEntry::folder(strings::get(label), encode(&mode, "", "", "")))
    .collect()
}

/// Notebooks under `path`.
///
/// Without a `stack` filter, notebooks that belong to a stack are folded into
/// one folder per stack. With a filter, only the notebooks of that stack are
/// returned.
pub fn notebooks(list: &[Notebook], path: &str, stack: Option<&str>) -> Vec<ListingEntry> {
    let stack = stack.filter(|s| !s.is_empty());
    let mut entries = KeyedEntries::default();

    for notebook in list {
        let notebook_stack = notebook.stack.as_deref().unwrap_or_default();
        match stack {
            Some(filter) if filter != notebook_stack => continue,
            None if !notebook_stack.is_empty() => {
                let key = format!("{}{}", notebook_stack, STACK_KEY_SUFFIX);
                if entries.contains(&key) {
                    continue;
                }
                let folder = ListingEntry::folder(
                    notebook_stack,
                    encode(&Mode::Stack, notebook_stack, "", path),
                );
                entries.insert(key, folder);
            }
            _ => {
                let folder = ListingEntry::folder(
                    &notebook.name,
                    encode(&Mode::Notebook, &notebook.guid, &notebook.name, path),
                )
                .with_dates(notebook.service_created, notebook.service_updated);
                entries.insert(notebook.name.clone(), folder);
            }
        }
    }

    entries.into_sorted()
}

/// Tags under `path`.
pub fn tags(list: &[Tag], path: &str) -> Vec<ListingEntry> {
    // TODO: nest child tags under their `parent_guid` instead of listing them flat.
    let mut entries = KeyedEntries::default();
    for tag in list {
        let folder =
            ListingEntry::folder(&tag.name, encode(&Mode::Tags, &tag.guid, &tag.name, path));
        entries.insert(tag.name.clone(), folder);
    }
    entries.into_sorted()
}

/// Saved searches under `path`.
pub fn saved_searches(list: &[SavedSearch], path: &str) -> Vec<ListingEntry> {
    let mut entries = KeyedEntries::default();
    for search in list {
        let folder = ListingEntry::folder(
            &search.name,
            encode(&Mode::Searchs, &search.guid, &search.name, path),
        );
        entries.insert(search.name.clone(), folder);
    }
    entries.into_sorted()
}

/// Notes under `path`, in the order given.
///
/// With `include_resources`, each note carries its attachments as children.
pub fn notes<N: NoteLike>(list: &[N], path: &str, include_resources: bool) -> Vec<ListingEntry> {
    list.iter()
        .map(|note| {
            let mut folder = ListingEntry::folder(
                note.title(),
                encode(&Mode::Note, note.guid(), note.title(), path),
            )
            .with_dates(note.created(), note.updated());
            if include_resources {
                folder.children = Some(note_content(note));
            }
            folder
        })
        .collect()
}

/// Attachments of a note, as files.
///
/// Attachments without a file name are skipped: they could not be referenced
/// by name later.
pub fn note_content<N: NoteLike + ?Sized>(note: &N) -> Vec<ListingEntry> {
    let mut entries = KeyedEntries::default();
    for resource in note.resources() {
        let Some(file_name) = resource.file_name() else {
            continue;
        };
        let mut file = ListingEntry::file(
            file_name,
            format!("resource:{}|note:{}", resource.guid, note.guid()),
        )
        .with_dates(note.created(), note.updated());
        file.size = resource.size();
        entries.insert(format!("{}-{}", file_name, resource.guid), file);
    }
    entries.into_sorted()
}
