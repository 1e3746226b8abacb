//! Thumbnail downloader
//!
//! Every fetched image is written to `{images_dir}/{ordinal}{basename}`. The
//! ordinal comes from the run context and grows with every article, so two
//! thumbnails sharing a file name upstream never overwrite each other.

use crate::HarvestError;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use url::Url;

/// Downloads thumbnails into a single directory
pub struct ImageFetcher {
    client: Client,
    images_dir: PathBuf,
}

impl ImageFetcher {
    /// Creates a fetcher writing into `images_dir`
    pub fn new(client: Client, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            images_dir: images_dir.into(),
        }
    }

    /// Downloads `url` and writes the body byte-for-byte to a new local file
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Full path of the written file
    /// * `Err(HarvestError)` - Transport error, non-success status or IO error;
    ///   callers treat all of these as fatal
    pub async fn fetch(&self, url: &Url, ordinal: u64) -> Result<PathBuf, HarvestError> {
        tracing::info!("Getting image from {}", url);

        let mut response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| HarvestError::ImageFetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let path = self
            .images_dir
            .join(local_image_name(ordinal, &image_basename(url)));

        let mut file = tokio::fs::File::create(&path).await?;
        let mut written = 0usize;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| HarvestError::ImageFetch {
                url: url.to_string(),
                message: e.to_string(),
            })?
        {
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;

        tracing::debug!("Wrote {} bytes to {}", written, path.display());
        Ok(path)
    }
}

/// Last segment of the URL path, e.g. `chase.jpg` for `/img/chase.jpg`
pub fn image_basename(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_string()
}

/// Local file name for the image with the given ordinal
pub fn local_image_name(ordinal: u64, basename: &str) -> String {
    format!("{}{}", ordinal, basename)
}

/// Deletes and recreates the image directory
///
/// Leftovers from previous runs are removed so the directory only ever holds
/// the current run's images.
pub fn recreate_dir(path: &Path) -> Result<(), HarvestError> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => tracing::debug!("Removed previous image directory {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    std::fs::create_dir_all(path)?;
    tracing::info!("Created image directory {}", path.display());
    Ok(())
}
