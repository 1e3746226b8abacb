//! URL handling module for Doc-Harvest
//!
//! This module provides the allowed-domain check applied to listing pages and
//! the resolution of hrefs found on a page into absolute URLs.

mod allow;
mod resolve;

pub use allow::DomainAllowList;
pub use resolve::resolve_link;
