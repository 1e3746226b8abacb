//! Output module for persisting harvest results
//!
//! This module handles:
//! - Writing the JSON snapshot of the collection
//! - Replacing the SQLite article table
//! - Reading the table back and reporting statistics

mod json;
pub mod stats;

pub use json::{read_json, write_json};
pub use stats::{load_statistics, print_statistics, ArticleStatistics};

use crate::article::Article;
use crate::config::OutputConfig;
use crate::storage::{SqliteStorage, Storage, StoredArticle};
use crate::HarvestError;
use std::path::Path;

/// Persists the run's collection to every configured sink
///
/// 1. JSON snapshot at `json_path` (whole file replaced)
/// 2. SQLite table at `database_path` (all rows replaced in one transaction)
/// 3. Read-back of the table, logged row by row
///
/// Any failure is returned to the caller and ends the run.
///
/// # Returns
///
/// * `Ok(Vec<StoredArticle>)` - The rows as read back from the database
/// * `Err(HarvestError)` - JSON, IO or database error
pub fn persist_articles(
    articles: &[Article],
    config: &OutputConfig,
) -> Result<Vec<StoredArticle>, HarvestError> {
    write_json(articles, Path::new(&config.json_path))?;

    let mut storage = SqliteStorage::new(Path::new(&config.database_path))?;
    store_articles(&mut storage, articles)
}

/// Replaces the stored articles and logs what the table now holds
pub fn store_articles(
    storage: &mut dyn Storage,
    articles: &[Article],
) -> Result<Vec<StoredArticle>, HarvestError> {
    let inserted = storage.replace_articles(articles)?;
    tracing::info!("Stored {} articles", inserted);

    let rows = storage.load_articles()?;
    for row in &rows {
        tracing::info!(
            "{} {} | {} | {} | {} | {} | {} | {}",
            row.id,
            row.article.name,
            row.article.link,
            row.article.image_link,
            row.article.date,
            row.article.author,
            row.article.category,
            row.article.comment_count
        );
    }

    Ok(rows)
}
