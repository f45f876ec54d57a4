//! The Evernote repository: browsing, searching and importing attachments.

use std::sync::Arc;

use async_trait::async_trait;
use node_path::{CrumbLabels, Mode, Node, build_breadcrumb, decode, encode, split_last};
use once_cell::sync::OnceCell;

use crate::cache::{CachedListing, ListingCache, cache_key};
use crate::config::{AdminConfig, RepositoryOptions};
use crate::download::{self, Downloader};
use crate::error::{RepositoryError, Result};
use crate::listing;
use crate::oauth::{LoginPrompt, OAuthEndpoints, OAuthHelper};
use crate::prefs::{PreferenceKey, Preferences};
use crate::reference::{FileReference, HostUser, share_url};
use crate::remote::{
    ErrorCode, NoteFilter, NoteOptions, NoteStore, NotesMetadataList, NotesMetadataResultSpec,
    RemoteError, ResourceOptions, StoreConnector, StoreEndpoint, UserStore,
};
use crate::session::BrowseSession;
use crate::source::{BrowsableSource, DownloadedFile, Listing, ReferenceSync, ReturnTypes};
use crate::strings;

/// Words matching every note that has at least one attachment
const WITH_RESOURCES: &str = "resource:*";

pub struct EvernoteRepository {
    config: AdminConfig,
    options: RepositoryOptions,
    user: HostUser,
    prefs: Arc<dyn Preferences>,
    connector: Arc<dyn StoreConnector>,
    oauth: Arc<dyn OAuthHelper>,
    cache: Option<Arc<dyn ListingCache>>,
    downloader: Downloader,
    labels: CrumbLabels,
    access_token: String,
    note_store_url: String,
    note_store: OnceCell<Arc<dyn NoteStore>>,
}

impl EvernoteRepository {
    /// Create the repository for `user`, reading their stored credentials.
    pub fn new(
        config: AdminConfig,
        options: RepositoryOptions,
        user: HostUser,
        prefs: Arc<dyn Preferences>,
        connector: Arc<dyn StoreConnector>,
        oauth: Arc<dyn OAuthHelper>,
    ) -> Result<Self> {
        let downloader = Downloader::new(options.download_timeout())?;
        let access_token = prefs.get_key(PreferenceKey::AccessToken).unwrap_or_default();
        let note_store_url = prefs.get_key(PreferenceKey::NoteStoreUrl).unwrap_or_default();

        Ok(Self {
            config,
            options,
            user,
            prefs,
            connector,
            oauth,
            cache: None,
            downloader,
            labels: strings::crumb_labels(),
            access_token,
            note_store_url,
            note_store: OnceCell::new(),
        })
    }

    pub fn with_cache(mut self, cache: Arc<dyn ListingCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn options(&self) -> &RepositoryOptions {
        &self.options
    }

    fn token(&self) -> Result<&str> {
        if self.access_token.is_empty() {
            return Err(RepositoryError::NotLoggedIn);
        }
        Ok(&self.access_token)
    }

    /// Note store client, connected on first use.
    fn note_store(&self) -> Result<Arc<dyn NoteStore>> {
        let store = self.note_store.get_or_try_init(|| {
            if self.note_store_url.is_empty() {
                return Err(RepositoryError::NotLoggedIn);
            }
            let mut endpoint = StoreEndpoint::parse(&self.note_store_url)?;
            if self.config.ssl_compatibility_mode {
                tracing::warn!("SSL compatibility mode: reaching the note store over plain HTTP");
                endpoint = endpoint.into_plain_http();
            }
            tracing::debug!("Connecting to note store at {}", endpoint.url());
            Ok::<_, RepositoryError>(self.connector.note_store(&endpoint)?)
        })?;
        Ok(Arc::clone(store))
    }

    fn user_store(&self) -> Result<Arc<dyn UserStore>> {
        let endpoint = StoreEndpoint::parse(&format!("{}/edam/user", self.config.api_url()))?;
        Ok(self.connector.user_store(&endpoint)?)
    }

    fn endpoints(&self) -> Result<OAuthEndpoints> {
        OAuthEndpoints::new(&self.config, &self.options).map_err(RepositoryError::OAuth)
    }

    /// Start the OAuth flow and remember the token secret for the callback.
    pub async fn print_login(&self) -> Result<LoginPrompt> {
        self.config.validate()?;
        let endpoints = self.endpoints()?;
        let request = self
            .oauth
            .request_token(&endpoints)
            .await
            .map_err(RepositoryError::RequestToken)?;

        self.prefs.set_key(PreferenceKey::TokenSecret, &request.secret)?;
        Ok(LoginPrompt::new(request.authorize_url, self.options.ajax))
    }

    /// Finish the OAuth flow with the values Evernote redirected with.
    pub async fn callback(&mut self, token: &str, verifier: &str) -> Result<()> {
        let secret = self.prefs.get_key(PreferenceKey::TokenSecret).unwrap_or_default();
        let endpoints = self.endpoints()?;
        let grant = self
            .oauth
            .get_access_token(&endpoints, token, &secret, verifier)
            .await
            .map_err(RepositoryError::OAuth)?;

        self.prefs.set_key(PreferenceKey::AccessToken, &grant.access_token)?;
        self.prefs.set_key(PreferenceKey::NoteStoreUrl, &grant.note_store_url)?;
        self.prefs.set_key(PreferenceKey::UserId, &grant.user_id)?;

        self.access_token = grant.access_token;
        self.note_store_url = grant.note_store_url;
        self.note_store = OnceCell::new();
        tracing::info!("User {} connected Evernote account {}", self.user.id, grant.user_id);
        Ok(())
    }

    /// Search notes metadata.
    ///
    /// Sorts by title unless the filter says otherwise, and limits to notes
    /// with attachments when configured and no words are given.
    pub async fn find_notes_metadata(
        &self,
        mut filter: NoteFilter,
        offset: u32,
        limit: u32,
    ) -> Result<NotesMetadataList> {
        if filter.order.is_none() {
            filter = filter.by_title();
        }
        if self.options.notes_with_attachments_only
            && filter.words.as_deref().is_none_or(str::is_empty)
        {
            filter.words = Some(WITH_RESOURCES.to_string());
        }
        let spec = NotesMetadataResultSpec {
            include_title: true,
            include_created: true,
            include_updated: true,
        };

        let store = self.note_store()?;
        match store
            .find_notes_metadata(self.token()?, &filter, offset, limit, &spec)
            .await
        {
            Ok(list) => Ok(list),
            Err(RemoteError::User {
                code: ErrorCode::PermissionDenied,
                ..
            }) => Err(RepositoryError::PermissionDenied),
            Err(err) => Err(err.into()),
        }
    }

    /// One page of notes matching `filter`, listed under `path`.
    async fn notes_page(&self, filter: NoteFilter, path: &str, offset: u32) -> Result<CachedListing> {
        let per_page = self.options.items_per_page.max(1);
        let list = self.find_notes_metadata(filter, offset, per_page).await?;
        Ok(CachedListing {
            folders: listing::notes(&list.notes, path, false),
            files: Vec::new(),
            pages: list.total_notes.div_ceil(per_page),
        })
    }

    /// Build the listing of `node`, the last segment of `path`.
    async fn browse(&self, node: &Node, path: &str, parent: &str, offset: u32) -> Result<CachedListing> {
        let folders = match &node.mode {
            Mode::All => return self.notes_page(NoteFilter::default(), path, offset).await,
            Mode::Tags if node.id.is_empty() => {
                let tags = self.note_store()?.list_tags(self.token()?).await?;
                listing::tags(&tags, parent)
            }
            Mode::Tags => return self.notes_page(NoteFilter::tag(&node.id), path, offset).await,
            Mode::Notebooks => {
                let notebooks = self.note_store()?.list_notebooks(self.token()?).await?;
                listing::notebooks(&notebooks, path, None)
            }
            Mode::Stack => {
                let notebooks = self.note_store()?.list_notebooks(self.token()?).await?;
                listing::notebooks(&notebooks, path, Some(node.id.as_str()))
            }
            Mode::Notebook => {
                return self
                    .notes_page(NoteFilter::notebook(&node.id), path, offset)
                    .await;
            }
            Mode::Searchs if node.id.is_empty() => {
                let searches = self.note_store()?.list_searches(self.token()?).await?;
                listing::saved_searches(&searches, parent)
            }
            Mode::Searchs => {
                let search = self
                    .note_store()?
                    .get_search(self.token()?, &node.id)
                    .await?;
                return self
                    .notes_page(NoteFilter::words(search.query), path, offset)
                    .await;
            }
            Mode::Note => {
                let note = self
                    .note_store()?
                    .get_note(self.token()?, &node.id, NoteOptions::default())
                    .await?;
                return Ok(CachedListing::from_entries(listing::note_content(&note)));
            }
            Mode::Root | Mode::MySearch | Mode::Other(_) => listing::root_options(),
        };
        Ok(CachedListing::from_entries(folders))
    }

    /// Fill `dest` from the share link, or from the account when there is none.
    async fn materialize(&self, reference: &FileReference, dest: &std::path::Path) -> Result<()> {
        if let Some(url) = reference.share_link() {
            self.downloader.download_to(url, dest).await?;
            return Ok(());
        }
        let guid = reference
            .resource_guid()
            .ok_or(RepositoryError::CannotDownload)?;
        self.fetch_resource(&guid, dest).await
    }

    /// Write the body of attachment `guid` to `dest`.
    async fn fetch_resource(&self, guid: &str, dest: &std::path::Path) -> Result<()> {
        let resource = self
            .note_store()?
            .get_resource(self.token()?, guid, ResourceOptions::body_and_attributes())
            .await?;
        let body = resource
            .data
            .and_then(|data| data.body)
            .ok_or(RepositoryError::CannotDownload)?;
        download::write_body(dest, &body).await
    }

    /// Share the note of `reference` and build the link to its attachment.
    async fn share(&self, reference: &FileReference) -> Result<String> {
        let note_id = reference
            .note_id
            .as_deref()
            .ok_or(RepositoryError::ShareFailed)?;
        let guid = reference.resource_guid().ok_or(RepositoryError::ShareFailed)?;
        let token = self.token()?;

        let user = self.user_store()?.get_user(token).await?;
        let share_key = self.note_store()?.share_note(token, note_id).await?;
        Ok(share_url(
            self.config.api_url(),
            &user.shard_id,
            note_id,
            &share_key,
            &guid,
        ))
    }

    /// Check that a referenced file is still reachable, and its size.
    pub async fn get_file_by_reference(&self, reference: &str) -> Result<ReferenceSync> {
        let reference = FileReference::from_blob(reference)?;
        let file_size = self.downloader.head_size(&reference.url).await?;
        Ok(ReferenceSync {
            file_path: reference.url,
            file_size,
        })
    }

    /// URL the host should redirect to when serving a referenced file.
    pub fn send_file(&self, reference: &str) -> Result<String> {
        let reference = FileReference::from_blob(reference)?;
        reference
            .share_link()
            .map(str::to_string)
            .ok_or(RepositoryError::CannotDownload)
    }

    /// Human readable description of a reference.
    ///
    /// Any non-zero `file_status` means the source is lost.
    pub fn get_reference_details(&self, reference: &str, file_status: i32) -> Result<String> {
        if file_status != 0 {
            return Ok(strings::get("lostsource").to_string());
        }
        let reference = FileReference::from_blob(reference)?;
        Ok(strings::format(
            "referencedetails",
            &[
                ("name", self.options.name.as_str()),
                ("fullname", reference.user_name.as_str()),
            ],
        ))
    }

    pub fn get_file_source_info(&self, source: &str) -> String {
        format!("Evernote ({}): {}", self.user.full_name, source)
    }

    pub fn type_option_names() -> &'static [&'static str] {
        AdminConfig::OPTION_NAMES
    }
}

#[async_trait]
impl BrowsableSource for EvernoteRepository {
    fn check_login(&self) -> bool {
        !self.access_token.is_empty() && !self.note_store_url.is_empty()
    }

    async fn login(&self) -> Result<LoginPrompt> {
        self.print_login().await
    }

    async fn logout(&mut self) -> Result<LoginPrompt> {
        if let Some(cache) = &self.cache {
            cache.purge();
        }
        for key in [
            PreferenceKey::AccessToken,
            PreferenceKey::NoteStoreUrl,
            PreferenceKey::UserId,
        ] {
            self.prefs.remove(&key.name())?;
        }
        self.access_token.clear();
        self.note_store_url.clear();
        self.note_store.take();
        tracing::info!("User {} logged out of Evernote", self.user.id);

        self.print_login().await
    }

    async fn get_listing(
        &self,
        session: &mut BrowseSession,
        path: &str,
        page: u32,
    ) -> Result<Listing> {
        let page = page.max(1);
        let path = session.resolve(path, page);
        let (parent, last) = split_last(&path);
        let node = decode(last);

        if node.mode == Mode::MySearch {
            return self.search(&node.id, 0).await;
        }

        let key = cache_key(last, page);
        let cached = self.cache.as_ref().and_then(|cache| cache.get(&key));
        let CachedListing {
            folders,
            mut files,
            pages,
        } = match cached {
            Some(hit) => {
                tracing::debug!("Listing cache hit for {}", key);
                hit
            }
            None => {
                let offset = (page - 1).saturating_mul(self.options.items_per_page);
                let built = self.browse(&node, &path, parent, offset).await?;
                if let Some(cache) = &self.cache {
                    cache.set(&key, &built);
                }
                built
            }
        };

        files.retain(|file| self.options.accepts(&file.title));

        let (page, pages) = if self.options.enable_paging && pages > 0 {
            (Some(page), Some(pages))
        } else {
            (None, None)
        };

        Ok(Listing {
            path: build_breadcrumb(&path, &self.labels),
            list: folders.into_iter().chain(files).collect(),
            manage: self.options.manage_url.clone(),
            logout_url: self.options.logout_url.clone(),
            dynload: true,
            page,
            pages,
        })
    }

    async fn search(&self, text: &str, _page: u32) -> Result<Listing> {
        let path = encode(&Mode::MySearch, text, "", "");
        let filter = NoteFilter::words(text).by_title();
        let max = self.options.search_max_results;

        let list = if self.options.search_dynload {
            let found = self.find_notes_metadata(filter, 0, max).await?;
            listing::notes(&found.notes, &path, false)
        } else {
            let found = self
                .note_store()?
                .find_notes(self.token()?, &filter, 0, max)
                .await?;
            listing::notes(&found.notes, "", true)
        };

        Ok(Listing {
            path: build_breadcrumb(&path, &self.labels),
            list,
            manage: self.options.manage_url.clone(),
            logout_url: self.options.logout_url.clone(),
            dynload: self.options.search_dynload,
            page: None,
            pages: None,
        })
    }

    async fn get_file(&self, reference: &str, file_name: &str) -> Result<DownloadedFile> {
        let reference = FileReference::from_blob(reference)?;
        let path = download::prepare_file(&self.options.temp_dir, file_name)
            .await
            .map_err(|err| {
                tracing::warn!(
                    "Cannot prepare {} below {}: {}",
                    file_name,
                    self.options.temp_dir.display(),
                    err
                );
                RepositoryError::CannotDownload
            })?;

        match self.materialize(&reference, &path).await {
            Ok(()) => Ok(DownloadedFile { path }),
            Err(err) => {
                tracing::warn!("Download of {} failed: {}", reference.source, err);
                download::discard(&path).await;
                Err(RepositoryError::CannotDownload)
            }
        }
    }

    async fn get_file_reference(&self, source: &str, use_file_reference: bool) -> Result<String> {
        let mut reference = FileReference::new(source, &self.user)?;
        if use_file_reference {
            let url = self.share(&reference).await.map_err(|err| {
                tracing::warn!("Sharing the note of {} failed: {}", source, err);
                RepositoryError::ShareFailed
            })?;
            reference = reference.with_share_url(url);
        }
        Ok(reference.to_blob()?)
    }

    fn supported_return_types(&self) -> ReturnTypes {
        ReturnTypes::INTERNAL | ReturnTypes::REFERENCE
    }
}
