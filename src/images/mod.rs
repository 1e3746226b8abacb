//! Image pipeline for article thumbnails
//!
//! This module contains:
//! - Downloading thumbnails to uniquely named local files
//! - Greedy word wrapping of overlay text
//! - Drawing the article title onto the thumbnail and saving it as PNG

mod annotate;
mod fetch;
mod layout;

pub use annotate::{
    annotated_path, decode_image, AnnotateError, Annotator, ImageKind, TitleOverlay,
    ANNOTATED_PREFIX,
};
pub use fetch::{image_basename, local_image_name, recreate_dir, ImageFetcher};
pub use layout::split_text;
