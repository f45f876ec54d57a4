//! Evernote repository for file pickers.
//!
//! Lets a user browse notebooks, stacks, tags, saved searches and notes of
//! their Evernote account and import note attachments, either as copies or
//! as references to a public share link.
//!
//! The host supplies the RPC clients ([`remote::StoreConnector`]), the OAuth
//! helper ([`oauth::OAuthHelper`]), user preferences ([`prefs::Preferences`])
//! and optionally a listing cache ([`cache::ListingCache`]).

pub mod cache;
pub mod collate;
pub mod config;
pub mod download;
pub mod error;
pub mod listing;
pub mod migrate;
pub mod oauth;
pub mod prefs;
pub mod reference;
pub mod remote;
pub mod repository;
pub mod session;
pub mod source;
pub mod strings;

pub use config::{AdminConfig, ConfigError, RepositoryOptions};
pub use error::{RepositoryError, Result};
pub use listing::ListingEntry;
pub use reference::{FileReference, HostUser};
pub use repository::EvernoteRepository;
pub use session::BrowseSession;
pub use source::{BrowsableSource, DownloadedFile, Listing, ReferenceSync, ReturnTypes};

/// Plugin version (YYYYMMDDXX)
pub const PLUGIN_VERSION: i64 = 2013113000;

pub const RELEASE: &str = "1.2.2";

/// Component name used by the host for strings and settings.
pub const COMPONENT: &str = "repository_evernote";
