//! Configuration module for Doc-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; missing keys take the built-in defaults.
//!
//! # Example
//!
//! ```no_run
//! use doc_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawl starts at: {}", config.crawler.start_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AnnotationConfig, Config, CrawlerConfig, OutputConfig, SelectorConfig};

// Re-export parser functions
pub use parser::{
    compute_config_hash, default_config, load_config, load_config_with_hash, parse_config,
};
pub use validation::validate;
