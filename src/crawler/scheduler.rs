//! Scheduler for managing the crawl frontier and request pacing
//!
//! This module handles:
//! - FIFO frontier of listing pages still to visit
//! - Allowed-domain filtering
//! - Suppressing URLs already visited in this run
//! - A fixed plus random delay between page requests

use crate::config::CrawlerConfig;
use crate::url::DomainAllowList;
use rand::Rng;
use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};
use url::Url;

/// Why the scheduler refused a URL
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleRejection {
    #[error("{0} is outside the allowed domains")]
    ForbiddenDomain(String),

    #[error("{0} was already visited")]
    AlreadyVisited(String),

    #[error("{0} does not use http or https")]
    UnsupportedScheme(String),
}

/// Scheduler manages the frontier queue and request pacing
///
/// Only one request is ever in flight: the coordinator awaits each page
/// before asking for the next URL.
pub struct Scheduler {
    /// URLs waiting to be fetched, in discovery order
    frontier: VecDeque<Url>,

    /// Every URL accepted into the frontier this run
    visited: HashSet<String>,

    allow_list: DomainAllowList,

    /// Fixed part of the inter-request delay
    delay: Duration,

    /// Upper bound (exclusive) of the random extra delay
    random_delay: Duration,

    /// When the previous URL was handed out
    last_request: Option<Instant>,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration (domains and delays)
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            frontier: VecDeque::new(),
            visited: HashSet::new(),
            allow_list: DomainAllowList::new(&config.allowed_domains),
            delay: Duration::from_millis(config.delay_ms),
            random_delay: Duration::from_millis(config.random_delay_ms),
            last_request: None,
        }
    }

    /// Adds a URL to the frontier
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The URL will be visited
    /// * `Err(ScheduleRejection)` - The URL is not allowed or was seen before
    pub fn enqueue(&mut self, url: Url) -> Result<(), ScheduleRejection> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ScheduleRejection::UnsupportedScheme(url.to_string()));
        }

        if !self.allow_list.permits(&url) {
            return Err(ScheduleRejection::ForbiddenDomain(url.to_string()));
        }

        let key = visit_key(&url);
        if !self.visited.insert(key) {
            return Err(ScheduleRejection::AlreadyVisited(url.to_string()));
        }

        tracing::debug!("Queued {}", url);
        self.frontier.push_back(url);
        Ok(())
    }

    /// Gets the next URL to fetch
    ///
    /// Waits until the configured delay since the previous request has
    /// elapsed. The first request of a run is not delayed.
    ///
    /// # Returns
    ///
    /// * `Some(Url)` - A URL that's ready to fetch
    /// * `None` - The frontier is empty
    pub async fn next_url(&mut self) -> Option<Url> {
        let url = self.frontier.pop_front()?;

        if let Some(last) = self.last_request {
            let wait = self.pick_delay();
            let ready_at = last + wait;
            let now = Instant::now();
            if ready_at > now {
                tracing::trace!("Waiting {:?} before {}", ready_at - now, url);
                tokio::time::sleep(ready_at - now).await;
            }
        }

        self.last_request = Some(Instant::now());
        Some(url)
    }

    /// Fixed delay plus a uniformly random share of the random delay
    fn pick_delay(&self) -> Duration {
        let max_jitter = self.random_delay.as_millis() as u64;
        let jitter = if max_jitter == 0 {
            0
        } else {
            rand::rng().random_range(0..max_jitter)
        };

        self.delay + Duration::from_millis(jitter)
    }

    /// Returns the number of URLs in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Number of distinct URLs accepted this run
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

/// Fragments never change which page is served
fn visit_key(url: &Url) -> String {
    let mut key = url.clone();
    key.set_fragment(None);
    key.to_string()
}
