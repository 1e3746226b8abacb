//! Crawler module for listing page fetching and processing
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching of listing pages
//! - Article and pagination extraction
//! - Request scheduling and pacing
//! - Overall harvest coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{next_page_to_visit, run_harvest, run_harvest_with, Coordinator};
pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use parser::{CompiledSelectors, ListingPage, ListingParser};
pub use scheduler::{ScheduleRejection, Scheduler};

use crate::config::Config;
use crate::state::RunContext;
use crate::HarvestError;

/// Runs a complete harvest operation
///
/// This is the main entry point for starting a harvest. It will:
/// 1. Load the overlay font
/// 2. Recreate the image directory
/// 3. Walk the listing pages from the start URL
/// 4. Fetch and annotate every thumbnail
/// 5. Write the JSON snapshot and the article table
///
/// # Arguments
///
/// * `config` - The harvest configuration
/// * `num_days` - Recency window in days
///
/// # Returns
///
/// * `Ok(RunContext)` - Harvest completed successfully
/// * `Err(HarvestError)` - Harvest failed
pub async fn harvest(config: Config, num_days: u32) -> Result<RunContext, HarvestError> {
    run_harvest(config, num_days).await
}
