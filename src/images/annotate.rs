//! Title overlay for downloaded thumbnails
//!
//! Decodes a thumbnail, draws the wrapped article title in its top-left
//! corner and writes the result as a PNG next to the original, prefixed with
//! `text_added_`.

use crate::config::AnnotationConfig;
use crate::images::layout::split_text;
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name prefix of annotated images
pub const ANNOTATED_PREFIX: &str = "text_added_";

/// Errors raised while annotating a thumbnail
#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("Unsupported image format for {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to load font {path}: {message}")]
    Font { path: PathBuf, message: String },
}

/// The closed set of thumbnail formats the annotator can decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageKind {
    /// Picks the decoder from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, AnnotateError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("jpg") | Some("jpeg") => Ok(Self::Jpeg),
            Some("gif") => Ok(Self::Gif),
            Some("webp") => Ok(Self::WebP),
            _ => Err(AnnotateError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    fn format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Gif => ImageFormat::Gif,
            Self::WebP => ImageFormat::WebP,
        }
    }
}

/// Something that can stamp a title onto a downloaded image
///
/// Returns the path of the annotated copy.
pub trait Annotator {
    fn annotate(&self, image_path: &Path, text: &str) -> Result<PathBuf, AnnotateError>;
}

/// Computes the sibling path of the annotated copy of `image_path`
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use doc_harvest::images::annotated_path;
///
/// let path = annotated_path(Path::new("docImages/10000chase.jpg"));
/// assert_eq!(path, Path::new("docImages/text_added_10000chase.jpg"));
/// ```
pub fn annotated_path(image_path: &Path) -> PathBuf {
    let file_name = image_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    image_path.with_file_name(format!("{}{}", ANNOTATED_PREFIX, file_name))
}

/// Decodes an image file using the decoder chosen by its extension
pub fn decode_image(path: &Path) -> Result<RgbaImage, AnnotateError> {
    let kind = ImageKind::from_path(path)?;
    let file = File::open(path).map_err(|source| AnnotateError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let decoded = image::load(BufReader::new(file), kind.format()).map_err(|source| {
        AnnotateError::Decode {
            path: path.to_path_buf(),
            source,
        }
    })?;

    Ok(decoded.to_rgba8())
}

/// Font-backed annotator drawing wrapped titles
pub struct TitleOverlay {
    font: FontArc,
    font_size: f32,
    text_x: f32,
    text_y: f32,
    max_chars_per_line: usize,
    line_spacing: f32,
    color: Rgba<u8>,
}

impl TitleOverlay {
    /// Loads the configured font and builds the overlay
    ///
    /// # Returns
    ///
    /// * `Ok(TitleOverlay)` - Font loaded
    /// * `Err(AnnotateError::Font)` - Font missing or unreadable
    pub fn from_config(config: &AnnotationConfig) -> Result<Self, AnnotateError> {
        let font_path = Path::new(&config.font_path);
        let bytes = std::fs::read(font_path).map_err(|e| AnnotateError::Font {
            path: font_path.to_path_buf(),
            message: e.to_string(),
        })?;

        let font = FontArc::try_from_vec(bytes).map_err(|e| AnnotateError::Font {
            path: font_path.to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::debug!("Loaded font {}", font_path.display());

        let [r, g, b] = config.color;
        Ok(Self {
            font,
            font_size: config.font_size,
            text_x: config.text_x,
            text_y: config.text_y,
            max_chars_per_line: config.max_chars_per_line,
            line_spacing: config.line_spacing,
            color: Rgba([r, g, b, 255]),
        })
    }

    /// Draws the wrapped text onto `canvas`
    ///
    /// `text_y` is the baseline of the first line; every following line sits
    /// `font_size + line_spacing` pixels lower.
    pub fn draw(&self, canvas: &mut RgbaImage, text: &str) {
        let scale = PxScale::from(self.font_size);
        let ascent = self.font.as_scaled(scale).ascent();
        let line_height = self.font_size + self.line_spacing;

        let mut baseline = self.text_y;
        for line in split_text(text, self.max_chars_per_line) {
            let top = (baseline - ascent).round() as i32;
            draw_text_mut(
                canvas,
                self.color,
                self.text_x.round() as i32,
                top,
                scale,
                &self.font,
                &line,
            );
            baseline += line_height;
        }
    }
}

impl Annotator for TitleOverlay {
    fn annotate(&self, image_path: &Path, text: &str) -> Result<PathBuf, AnnotateError> {
        let mut canvas = decode_image(image_path)?;
        self.draw(&mut canvas, text);

        let output_path = annotated_path(image_path);
        canvas
            .save_with_format(&output_path, ImageFormat::Png)
            .map_err(|source| AnnotateError::Encode {
                path: output_path.clone(),
                source,
            })?;

        tracing::info!("Added title to image: {}", output_path.display());
        Ok(output_path)
    }
}
