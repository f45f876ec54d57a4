//! The interface the file picker host drives.

use std::ops::BitOr;
use std::path::PathBuf;

use async_trait::async_trait;
use node_path::Crumb;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::listing::ListingEntry;
use crate::oauth::LoginPrompt;
use crate::session::BrowseSession;

/// Response to a browse or search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Breadcrumb of the listed location
    pub path: Vec<Crumb>,
    /// Folders first, then files
    pub list: Vec<ListingEntry>,
    pub manage: String,
    pub logout_url: String,
    /// Whether folders are loaded on demand
    pub dynload: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
}

/// How picked files can be returned to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnTypes(u32);

impl ReturnTypes {
    pub const EXTERNAL: Self = Self(1);
    pub const INTERNAL: Self = Self(2);
    pub const REFERENCE: Self = Self(4);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ReturnTypes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A file materialised on the local disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadedFile {
    pub path: PathBuf,
}

/// Result of synchronising a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSync {
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

/// A repository the host can browse and import files from.
#[async_trait]
pub trait BrowsableSource: Send + Sync {
    fn check_login(&self) -> bool;

    async fn login(&self) -> Result<LoginPrompt>;

    async fn logout(&mut self) -> Result<LoginPrompt>;

    async fn get_listing(
        &self,
        session: &mut BrowseSession,
        path: &str,
        page: u32,
    ) -> Result<Listing>;

    async fn search(&self, text: &str, page: u32) -> Result<Listing>;

    async fn get_file(&self, reference: &str, file_name: &str) -> Result<DownloadedFile>;

    /// Serialized reference for a picked `source`
    async fn get_file_reference(&self, source: &str, use_file_reference: bool) -> Result<String>;

    fn supported_return_types(&self) -> ReturnTypes;
}
