use crate::article::{is_within_timeframe, Article};
use chrono::{DateTime, Utc};

/// First ordinal handed to a fetched image
pub const IMAGE_ORDINAL_SEED: u64 = 10000;

/// Everything a single harvest run accumulates
///
/// A fresh context is created per run and owned by the coordinator.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Collected articles in discovery order
    pub articles: Vec<Article>,

    /// Prefix for the next fetched image file name
    pub image_ordinal: u64,

    /// Set once an article outside the recency window was collected
    pub reached_end_date: bool,

    /// "Now" for the recency window
    pub reference_time: DateTime<Utc>,

    /// Recency window in days
    pub num_days: u32,

    pub pages_visited: usize,
    pub pages_failed: usize,
}

impl RunContext {
    pub fn new(num_days: u32, reference_time: DateTime<Utc>) -> Self {
        Self {
            articles: Vec::new(),
            image_ordinal: IMAGE_ORDINAL_SEED,
            reached_end_date: false,
            reference_time,
            num_days,
            pages_visited: 0,
            pages_failed: 0,
        }
    }

    /// Appends a processed article and advances the run state
    ///
    /// The image ordinal moves on by one and, if the article's date is
    /// outside the recency window, the stop flag is raised. The flag is
    /// never cleared.
    ///
    /// # Returns
    ///
    /// Whether the article was within the recency window
    pub fn record(&mut self, article: Article) -> bool {
        let within = is_within_timeframe(&article.date, self.num_days, self.reference_time);
        if !within {
            if !self.reached_end_date {
                tracing::info!(
                    "Reached end date with '{}' ({}), finishing current page",
                    article.name,
                    article.date
                );
            }
            self.reached_end_date = true;
        }

        self.articles.push(article);
        self.image_ordinal += 1;
        within
    }

    pub fn article_count(&self) -> usize {
        self.articles.len()
    }
}
