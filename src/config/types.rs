use serde::Deserialize;

/// Main configuration structure for Doc-Harvest
///
/// Every section falls back to its defaults, so an empty file (or no file at
/// all) configures a crawl of the Doctor of Credit archive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub annotation: AnnotationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// First listing page to visit
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Hosts listing pages may be fetched from (exact or "*.example.com")
    #[serde(rename = "allowed-domains")]
    pub allowed_domains: Vec<String>,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Fixed delay between page requests (milliseconds)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,

    /// Upper bound of the random extra delay between page requests (milliseconds)
    #[serde(rename = "random-delay-ms")]
    pub random_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_url: "https://doctorofcredit.com/".to_string(),
            allowed_domains: vec![
                "doctorofcredit.com".to_string(),
                "www.doctorofcredit.com".to_string(),
            ],
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3".to_string(),
            delay_ms: 0,
            random_delay_ms: 600,
        }
    }
}

/// CSS selectors describing the listing-page markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One match per article block
    pub article: String,

    /// Pagination link to the next (older) listing page
    #[serde(rename = "next-page")]
    pub next_page: String,

    /// Title anchor inside an article block (text and href)
    pub title: String,

    /// Thumbnail image inside an article block (src)
    pub image: String,

    pub date: String,
    pub author: String,
    pub category: String,

    /// Comment-count label, e.g. "1,890 Comments"
    pub comments: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            article: ".vce-loop-wrap article".to_string(),
            next_page: "#vce-pagination .next".to_string(),
            title: ".entry-header .entry-title a".to_string(),
            image: ".meta-image a img".to_string(),
            date: ".entry-header .entry-meta .date .updated".to_string(),
            author: ".entry-header .entry-meta .author .author .fn a".to_string(),
            category: ".entry-header .entry-meta .meta-category".to_string(),
            comments: ".entry-header .entry-meta .comments a".to_string(),
        }
    }
}

/// Title overlay configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// TrueType font used for the overlay
    #[serde(rename = "font-path")]
    pub font_path: String,

    /// Font size in pixels
    #[serde(rename = "font-size")]
    pub font_size: f32,

    /// Left edge of the text
    #[serde(rename = "text-x")]
    pub text_x: f32,

    /// Baseline of the first line
    #[serde(rename = "text-y")]
    pub text_y: f32,

    #[serde(rename = "max-chars-per-line")]
    pub max_chars_per_line: usize,

    /// Extra space between lines, added to the font size
    #[serde(rename = "line-spacing")]
    pub line_spacing: f32,

    /// Text color as [r, g, b]
    pub color: [u8; 3],
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            font_path: "./fonts/DejaVuSans.ttf".to_string(),
            font_size: 10.0,
            text_x: 4.0,
            text_y: 20.0,
            max_chars_per_line: 30,
            line_spacing: 5.0,
            color: [204, 204, 115],
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for original and annotated thumbnails, recreated every run
    #[serde(rename = "images-dir")]
    pub images_dir: String,

    /// Path of the JSON snapshot
    #[serde(rename = "json-path")]
    pub json_path: String,

    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            images_dir: "docImages".to_string(),
            json_path: "articles.json".to_string(),
            database_path: "docarticles.db".to_string(),
        }
    }
}
