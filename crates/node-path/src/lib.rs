//! Codec for file picker browse paths.
//!
//! A browse path is a `/`-separated list of segments. Each segment is
//! `mode:value` optionally followed by `|name`, where `value` and `name` are
//! URL-encoded so they may contain any text, including `/`, `:` and `|`:
//!
//! - Category: `tags:`
//! - Entity: `notebook:1f2e|My%20Notebook`
//! - Nested: `notebooks:/stack:Work/notebook:1f2e|Reports`

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

mod breadcrumb;

pub use breadcrumb::{Crumb, CrumbLabels, build_breadcrumb};

/// What a segment points at.
///
/// Unknown modes are carried through untouched so a caller can decide what to
/// do with them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Mode {
    /// The top-level choices
    Root,
    /// Every note in the account
    All,
    /// Notebooks and stacks
    Notebooks,
    /// Notebooks within one stack (the value is the stack name)
    Stack,
    /// Notes within one notebook
    Notebook,
    /// Tags, or notes with one tag
    Tags,
    /// Saved searches, or notes matching one saved search
    Searchs,
    /// The attachments of one note
    Note,
    /// A free-text search typed by the user
    MySearch,
    /// Anything else, verbatim
    Other(String),
}

impl Mode {
    pub fn as_str(&self) -> &str {
        match self {
            Mode::Root => "root",
            Mode::All => "all",
            Mode::Notebooks => "notebooks",
            Mode::Stack => "stack",
            Mode::Notebook => "notebook",
            Mode::Tags => "tags",
            Mode::Searchs => "searchs",
            Mode::Note => "note",
            Mode::MySearch => "mysearch",
            Mode::Other(other) => other,
        }
    }
}

impl From<&str> for Mode {
    fn from(s: &str) -> Self {
        match s {
            "root" => Mode::Root,
            "all" => Mode::All,
            "notebooks" => Mode::Notebooks,
            "stack" => Mode::Stack,
            "notebook" => Mode::Notebook,
            "tags" => Mode::Tags,
            "searchs" => Mode::Searchs,
            "note" => Mode::Note,
            "mysearch" => Mode::MySearch,
            other => Mode::Other(other.to_string()),
        }
    }
}

impl From<String> for Mode {
    fn from(s: String) -> Self {
        Mode::from(s.as_str())
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.as_str().to_string()
    }
}

impl FromStr for Mode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Mode::from(s))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded segment of a browse path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub mode: Mode,
    /// Entity id (a GUID, a stack name, or search text). Empty for categories.
    pub id: String,
    /// Display name, empty when the segment carries none.
    pub name: String,
}

impl Node {
    pub fn new(mode: Mode, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            mode,
            id: id.into(),
            name: name.into(),
        }
    }

    /// Encode this node under `parent` (see [`encode`]).
    pub fn encode(&self, parent: &str) -> String {
        encode(&self.mode, &self.id, &self.name, parent)
    }

    /// Returns the display name if there is one
    pub fn display_name(&self) -> Option<&str> {
        (!self.name.is_empty()).then_some(self.name.as_str())
    }
}

/// Build the path of a node.
///
/// The name suffix is only added when `name` is non-empty, and the parent
/// prefix only when `parent` is non-empty (surrounding slashes are trimmed).
pub fn encode(mode: &Mode, value: &str, name: &str, parent: &str) -> String {
    let mut path = format!("{}:{}", mode, urlencoding::encode(value));
    if !name.is_empty() {
        path.push('|');
        path.push_str(&urlencoding::encode(name));
    }
    if parent.is_empty() {
        return path;
    }
    format!("{}/{}", parent.trim_matches('/'), path)
}

/// Decode one segment into its mode, id and name.
///
/// Splits on the first `:` and then on the first `|` of the remainder. A
/// segment without `:` is all mode.
pub fn decode(segment: &str) -> Node {
    let (mode, rest) = segment.split_once(':').unwrap_or((segment, ""));
    let (id, name) = rest.split_once('|').unwrap_or((rest, ""));
    Node {
        mode: Mode::from(mode),
        id: decode_component(id).into_owned(),
        name: decode_component(name).into_owned(),
    }
}

/// Split a full path into its decoded segments, skipping empty ones.
pub fn decode_path(path: &str) -> Vec<Node> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(decode)
        .collect()
}

/// Split a path into its parent path and its last segment.
///
/// `"notebooks:/stack:Work"` becomes `("notebooks:", "stack:Work")`; a
/// single-segment path has an empty parent.
pub fn split_last(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((parent, last)) => (parent, last),
        None => ("", path),
    }
}

/// Percent-decode, also accepting `+` for a space (form encoding).
fn decode_component(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['%', '+']) {
        return Cow::Borrowed(raw);
    }
    let spaced = raw.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
}
