//! Crawler coordinator - main harvest orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! a harvest run, including:
//! - Pulling listing pages from the scheduler one at a time
//! - Extracting the articles of every page
//! - Fetching and annotating each article's thumbnail
//! - Deciding whether to follow the next-page link
//! - Persisting the collection once the frontier is exhausted

use crate::article::Article;
use crate::config::{Config, OutputConfig};
use crate::crawler::parser::{ListingPage, ListingParser};
use crate::crawler::scheduler::Scheduler;
use crate::crawler::{build_http_client, fetch_page, FetchResult};
use crate::images::{recreate_dir, Annotator, ImageFetcher, TitleOverlay};
use crate::output::persist_articles;
use crate::state::RunContext;
use crate::url::resolve_link;
use crate::{ConfigError, HarvestError};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::path::Path;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    scheduler: Scheduler,
    client: Client,
    parser: ListingParser,
    images: ImageFetcher,
    annotator: Box<dyn Annotator>,
    context: RunContext,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// The start URL is queued immediately and the recency window is
    /// measured from the moment of construction.
    ///
    /// # Arguments
    ///
    /// * `config` - The harvest configuration
    /// * `num_days` - Recency window in days
    /// * `annotator` - Stamps article titles onto fetched thumbnails
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - Invalid selectors or start URL, or the HTTP
    ///   client could not be built
    pub fn new(
        config: Config,
        num_days: u32,
        annotator: Box<dyn Annotator>,
    ) -> Result<Self, HarvestError> {
        let parser = ListingParser::from_config(&config.selectors)?;
        let client = build_http_client(&config.crawler.user_agent)?;
        let images = ImageFetcher::new(client.clone(), &config.output.images_dir);

        let mut scheduler = Scheduler::new(&config.crawler);
        let start_url = Url::parse(&config.crawler.start_url)?;
        scheduler
            .enqueue(start_url)
            .map_err(|e| ConfigError::Validation(format!("Cannot start harvest: {}", e)))?;

        Ok(Self {
            scheduler,
            client,
            parser,
            images,
            annotator,
            context: RunContext::new(num_days, Utc::now()),
        })
    }

    /// Measures the recency window from `now` instead of the current time
    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.context.reference_time = now;
        self
    }

    /// Runs the main crawl loop
    ///
    /// This is the core harvesting logic that:
    /// 1. Gets listing page URLs from the scheduler
    /// 2. Fetches and parses each page
    /// 3. Processes every article on the page in document order
    /// 4. Queues the next page unless the recency window was exceeded
    ///
    /// # Returns
    ///
    /// * `Ok(RunContext)` - The frontier ran dry; the context holds the
    ///   collected articles
    /// * `Err(HarvestError)` - A fatal error (image fetch or IO) ended the run
    pub async fn run(mut self) -> Result<RunContext, HarvestError> {
        let start_time = std::time::Instant::now();

        while let Some(url) = self.scheduler.next_url().await {
            self.process_page(&url).await?;
        }

        tracing::info!(
            "Harvest completed: {} articles from {} pages ({} failed) in {:?}",
            self.context.article_count(),
            self.context.pages_visited,
            self.context.pages_failed,
            start_time.elapsed()
        );

        Ok(self.context)
    }

    /// Processes a single listing page
    ///
    /// Fetch failures are logged and end this branch of the crawl; only
    /// errors from article processing are returned.
    async fn process_page(&mut self, url: &Url) -> Result<(), HarvestError> {
        tracing::info!("Visiting {}", url);
        self.context.pages_visited += 1;

        let (final_url, body) = match fetch_page(&self.client, url).await {
            FetchResult::Success {
                final_url,
                status_code,
                content_type,
                body,
            } => {
                tracing::debug!(
                    "Fetched {} ({} {}, {} bytes)",
                    final_url,
                    status_code,
                    content_type,
                    body.len()
                );
                (final_url, body)
            }
            FetchResult::ContentMismatch { content_type } => {
                tracing::warn!("Skipping {}: expected HTML, got '{}'", url, content_type);
                self.context.pages_failed += 1;
                return Ok(());
            }
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Skipping {}: HTTP {}", url, status_code);
                self.context.pages_failed += 1;
                return Ok(());
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Skipping {}: {}", url, error);
                self.context.pages_failed += 1;
                return Ok(());
            }
        };

        let ListingPage {
            articles,
            next_link,
        } = self.parser.parse(&body, &final_url);
        tracing::debug!("Found {} articles on {}", articles.len(), final_url);

        for article in articles {
            self.process_article(article, &final_url).await?;
        }

        if let Some(next) = next_page_to_visit(self.context.reached_end_date, next_link) {
            if let Err(rejection) = self.scheduler.enqueue(next) {
                tracing::info!("Not following next page: {}", rejection);
            }
        }

        Ok(())
    }

    /// Fetches and annotates the article's thumbnail, then records it
    ///
    /// A failed download is fatal. A failed annotation is logged and the
    /// article is still recorded.
    async fn process_article(
        &mut self,
        article: Article,
        page_url: &Url,
    ) -> Result<(), HarvestError> {
        let image_url = resolve_link(&article.image_link, page_url).ok_or_else(|| {
            HarvestError::ImageFetch {
                url: article.image_link.clone(),
                message: format!("'{}' has no usable image link", article.name),
            }
        })?;

        let image_path = self
            .images
            .fetch(&image_url, self.context.image_ordinal)
            .await?;

        match self.annotator.annotate(&image_path, &article.name) {
            Ok(annotated) => tracing::debug!("Annotated copy at {}", annotated.display()),
            Err(e) => tracing::warn!("Could not annotate {}: {}", image_path.display(), e),
        }

        self.context.record(article);
        Ok(())
    }
}

/// Decides whether the next listing page should be visited
///
/// Pagination stops as soon as any collected article fell outside the
/// recency window; the page that contained it is still fully processed.
///
/// # Example
///
/// ```
/// use doc_harvest::crawler::next_page_to_visit;
/// use url::Url;
///
/// let next = Url::parse("https://doctorofcredit.com/page/2/").ok();
/// assert!(next_page_to_visit(false, next.clone()).is_some());
/// assert!(next_page_to_visit(true, next).is_none());
/// assert!(next_page_to_visit(false, None).is_none());
/// ```
pub fn next_page_to_visit(reached_end_date: bool, next_link: Option<Url>) -> Option<Url> {
    if reached_end_date {
        return None;
    }
    next_link
}

/// Runs a complete harvest with the given annotator
///
/// Recreates the image directory, crawls, then writes the JSON snapshot and
/// the article table.
pub async fn run_harvest_with(
    config: Config,
    num_days: u32,
    annotator: Box<dyn Annotator>,
) -> Result<RunContext, HarvestError> {
    recreate_dir(Path::new(&config.output.images_dir))?;

    let output: OutputConfig = config.output.clone();
    let coordinator = Coordinator::new(config, num_days, annotator)?;
    let context = coordinator.run().await?;

    persist_articles(&context.articles, &output)?;
    Ok(context)
}

/// Runs a complete harvest, stamping titles with the configured font
///
/// A missing or unreadable font file ends the run before anything is
/// fetched.
pub async fn run_harvest(config: Config, num_days: u32) -> Result<RunContext, HarvestError> {
    let overlay = TitleOverlay::from_config(&config.annotation)?;
    run_harvest_with(config, num_days, Box::new(overlay)).await
}
