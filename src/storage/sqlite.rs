//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::article::Article;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use crate::storage::StoredArticle;
use crate::HarvestError;
use rusqlite::{params, Connection, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// The parent directory is created if it does not exist yet.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(HarvestError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, HarvestError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, HarvestError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    // ===== Writes =====

    fn replace_articles(&mut self, articles: &[Article]) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;

        let removed = tx.execute("DELETE FROM articles", [])?;
        tracing::debug!("Removed {} rows from the previous run", removed);

        {
            let mut stmt = tx.prepare(
                "INSERT INTO articles (name, link, imagelink, date, author, catagory, commentcount)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;

            for article in articles {
                stmt.execute(params![
                    article.name,
                    article.link,
                    article.image_link,
                    article.date,
                    article.author,
                    article.category,
                    article.comment_count,
                ])?;
            }
        }

        tx.commit()?;
        Ok(articles.len())
    }

    // ===== Reads =====

    fn load_articles(&self) -> StorageResult<Vec<StoredArticle>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, link, imagelink, date, author, catagory, commentcount
             FROM articles ORDER BY id",
        )?;

        let rows = stmt
            .query_map([], row_to_stored_article)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    // ===== Statistics =====

    fn count_articles(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_by_category(&self) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT COALESCE(catagory, ''), COUNT(*) AS n FROM articles
             GROUP BY catagory ORDER BY n DESC, catagory",
        )?;

        let counts = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(counts)
    }

    fn total_comments(&self) -> StorageResult<u64> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(commentcount), 0) FROM articles",
            [],
            |row| row.get(0),
        )?;
        Ok(total.max(0) as u64)
    }
}

/// Maps a row to a stored article; NULL text columns read as empty
fn row_to_stored_article(row: &Row<'_>) -> rusqlite::Result<StoredArticle> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };

    Ok(StoredArticle {
        id: row.get(0)?,
        article: Article {
            name: text(1)?,
            link: text(2)?,
            image_link: text(3)?,
            date: text(4)?,
            author: text(5)?,
            category: text(6)?,
            comment_count: row.get::<_, Option<u32>>(7)?.unwrap_or_default(),
        },
    })
}
