//! State module for tracking harvest progress
//!
//! This module provides the run-scoped state owned by the coordinator.
//!
//! # Components
//!
//! - `RunContext`: collected articles, the image ordinal and the stop flag

mod run_context;

// Re-export main types
pub use run_context::{RunContext, IMAGE_ORDINAL_SEED};
