//! Downloads of attachments to local files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::StatusCode;
use reqwest::header::CONTENT_LENGTH;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::error::{RepositoryError, Result};

/// Redirects followed before giving up on a share link
const MAX_REDIRECTS: usize = 10;

/// HTTP client for share links.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Stream `url` into `dest`. Anything but a 200 is a failure.
    ///
    /// Returns the number of bytes written.
    pub async fn download_to(&self, url: &str, dest: &Path) -> Result<u64> {
        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            tracing::debug!("{} answered {}", url, response.status());
            return Err(RepositoryError::CannotDownload);
        }

        let mut stream = response.bytes_stream();
        let mut file = File::create(dest).await?;
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        tracing::debug!("Downloaded {} bytes to {}", written, dest.display());
        Ok(written)
    }

    /// Size announced by a HEAD request, when the answer is a 200.
    ///
    /// Transport errors are returned as is.
    pub async fn head_size(&self, url: &str) -> Result<Option<u64>> {
        let response = self.client.head(url).send().await?;
        if response.status() != StatusCode::OK {
            return Ok(None);
        }
        let size = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        Ok(size)
    }
}

/// Reserve a fresh path for `file_name` below `temp_dir`.
///
/// Each download gets its own directory so names never clash.
pub async fn prepare_file(temp_dir: &Path, file_name: &str) -> Result<PathBuf> {
    let dir = temp_dir.join(uuid::Uuid::new_v4().to_string());
    fs::create_dir_all(&dir).await?;

    let name = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("file");
    Ok(dir.join(name))
}

/// Remove the directory [`prepare_file`] reserved for `path`.
///
/// Errors are only logged.
pub async fn discard(path: &Path) {
    let Some(dir) = path.parent() else {
        return;
    };
    if let Err(err) = fs::remove_dir_all(dir).await {
        tracing::warn!("Failed to remove {}: {}", dir.display(), err);
    }
}

/// Write an attachment body fetched from the note store.
pub async fn write_body(dest: &Path, body: &[u8]) -> Result<()> {
    fs::write(dest, body).await?;
    Ok(())
}
