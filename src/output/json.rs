//! JSON snapshot of the harvested articles

use crate::article::Article;
use crate::HarvestError;
use std::path::Path;

/// Writes `articles` as a compact JSON array, replacing any previous file
///
/// The parent directory is created if needed.
pub fn write_json(articles: &[Article], path: &Path) -> Result<(), HarvestError> {
    let encoded = serde_json::to_vec(articles)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, encoded)?;
    tracing::info!("Wrote {} articles to {}", articles.len(), path.display());
    Ok(())
}

/// Reads a JSON snapshot written by [`write_json`]
pub fn read_json(path: &Path) -> Result<Vec<Article>, HarvestError> {
    let content = std::fs::read(path)?;
    Ok(serde_json::from_slice(&content)?)
}
