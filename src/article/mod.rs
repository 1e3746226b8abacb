//! Article model for harvested listing entries
//!
//! This module defines the record produced for every article block found on
//! a listing page, together with the two parsing helpers the crawl depends on:
//! - Comment-count labels ("1,890 Comments")
//! - Publication dates ("January 2, 2006") and the recency window check

mod comments;
mod timeframe;

pub use comments::{parse_comment_count, CommentCountError};
pub use timeframe::{is_within_timeframe, parse_article_date, DATE_FORMAT};

use serde::{Deserialize, Serialize};

/// A single article scraped from a listing page
///
/// Field names serialize in PascalCase so the JSON snapshot reads
/// `Name`, `Link`, `ImageLink`, `Date`, `Author`, `Category`, `CommentCount`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Article {
    /// Article title, also used as the thumbnail overlay text
    pub name: String,

    /// Article URL as found in the title link
    pub link: String,

    /// Thumbnail source URL (empty if the markup has none)
    pub image_link: String,

    /// Human readable publication date, e.g. "March 4, 2024"
    pub date: String,

    pub author: String,

    pub category: String,

    /// Number of comments; zero when the label could not be parsed
    pub comment_count: u32,
}
