//! Statistics generation from the article database
//!
//! This module provides functionality for extracting and displaying
//! statistics about the stored article table.

use crate::storage::Storage;
use crate::HarvestError;

/// Article table statistics summary
#[derive(Debug, Clone, Default)]
pub struct ArticleStatistics {
    /// Total number of stored articles
    pub total_articles: u64,

    /// Article count per category, most frequent first
    pub articles_by_category: Vec<(String, u64)>,

    /// Sum of all comment counts
    pub total_comments: u64,
}

impl ArticleStatistics {
    /// Average comments per article, 0 for an empty table
    pub fn average_comments(&self) -> f64 {
        if self.total_articles == 0 {
            0.0
        } else {
            self.total_comments as f64 / self.total_articles as f64
        }
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(ArticleStatistics)` - Successfully loaded statistics
/// * `Err(HarvestError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<ArticleStatistics, HarvestError> {
    Ok(ArticleStatistics {
        total_articles: storage.count_articles()?,
        articles_by_category: storage.count_by_category()?,
        total_comments: storage.total_comments()?,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &ArticleStatistics) {
    println!("=== Article Statistics ===\n");

    println!("Overview:");
    println!("  Total articles: {}", stats.total_articles);
    println!("  Total comments: {}", stats.total_comments);
    println!("  Average comments per article: {:.1}", stats.average_comments());
    println!();

    if !stats.articles_by_category.is_empty() {
        println!("Articles by Category:");
        for (category, count) in &stats.articles_by_category {
            let percentage = (*count as f64 / stats.total_articles as f64) * 100.0;
            let label = if category.is_empty() {
                "(none)"
            } else {
                category.as_str()
            };
            println!("  {}: {} ({:.1}%)", label, count, percentage);
        }
    }
}
