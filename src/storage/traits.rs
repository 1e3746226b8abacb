//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::article::Article;
use crate::storage::StoredArticle;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The table always holds exactly the articles of the most recent run.
pub trait Storage {
    // ===== Writes =====

    /// Replaces the stored articles with `articles`
    ///
    /// The delete and the inserts happen in one transaction, so readers see
    /// either the previous run or this one.
    ///
    /// # Returns
    ///
    /// The number of rows inserted
    fn replace_articles(&mut self, articles: &[Article]) -> StorageResult<usize>;

    // ===== Reads =====

    /// Loads every stored article in insertion order
    fn load_articles(&self) -> StorageResult<Vec<StoredArticle>>;

    // ===== Statistics =====

    /// Gets total article count
    fn count_articles(&self) -> StorageResult<u64>;

    /// Counts articles per category, most frequent first
    fn count_by_category(&self) -> StorageResult<Vec<(String, u64)>>;

    /// Sums the comment counts of all articles
    fn total_comments(&self) -> StorageResult<u64>;
}
