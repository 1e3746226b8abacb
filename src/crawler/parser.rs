//! Listing page parser
//!
//! This module turns one listing page into:
//! - one `Article` per article block, in document order
//! - the resolved next-page link, if the page has one
//!
//! Parsing is synchronous and returns owned data, so the parsed document
//! never lives across an await point.

use crate::article::{parse_comment_count, Article};
use crate::config::SelectorConfig;
use crate::url::resolve_link;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Result of parsing a single listing page
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    /// Articles found on the page, in document order
    pub articles: Vec<Article>,

    /// Absolute URL of the next (older) listing page
    pub next_link: Option<Url>,
}

/// Selectors compiled once from the configuration
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub article: Selector,
    pub next_page: Selector,
    pub title: Selector,
    pub image: Selector,
    pub date: Selector,
    pub author: Selector,
    pub category: Selector,
    pub comments: Selector,
}

impl CompiledSelectors {
    /// Compiles every selector in the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(CompiledSelectors)` - All selectors compiled
    /// * `Err(ConfigError::InvalidSelector)` - Names the first field that failed
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            article: compile_field("article", &config.article)?,
            next_page: compile_field("next-page", &config.next_page)?,
            title: compile_field("title", &config.title)?,
            image: compile_field("image", &config.image)?,
            date: compile_field("date", &config.date)?,
            author: compile_field("author", &config.author)?,
            category: compile_field("category", &config.category)?,
            comments: compile_field("comments", &config.comments)?,
        })
    }
}

fn compile_field(field: &'static str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        field,
        message: format!("'{}': {}", selector, e),
    })
}

/// Extracts articles and the pagination link from listing pages
#[derive(Debug, Clone)]
pub struct ListingParser {
    selectors: CompiledSelectors,
}

impl ListingParser {
    pub fn new(selectors: CompiledSelectors) -> Self {
        Self { selectors }
    }

    /// Compiles the configured selectors and builds a parser
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(CompiledSelectors::compile(config)?))
    }

    /// Parses one listing page
    ///
    /// # Arguments
    ///
    /// * `html` - The page body
    /// * `page_url` - URL the page was fetched from; the next-page href is
    ///   resolved against it
    ///
    /// # Example
    ///
    /// ```
    /// use doc_harvest::config::SelectorConfig;
    /// use doc_harvest::crawler::ListingParser;
    /// use url::Url;
    ///
    /// let parser = ListingParser::from_config(&SelectorConfig::default()).unwrap();
    /// let html = r#"<div id="vce-pagination"><a class="next" href="/page/2/">Older</a></div>"#;
    /// let page = parser.parse(html, &Url::parse("https://doctorofcredit.com/").unwrap());
    /// assert!(page.articles.is_empty());
    /// assert_eq!(page.next_link.unwrap().as_str(), "https://doctorofcredit.com/page/2/");
    /// ```
    pub fn parse(&self, html: &str, page_url: &Url) -> ListingPage {
        let document = Html::parse_document(html);

        let articles = document
            .select(&self.selectors.article)
            .map(|node| self.extract_article(node))
            .collect();

        let next_link = document
            .select(&self.selectors.next_page)
            .next()
            .and_then(|element| element.value().attr("href"))
            .and_then(|href| resolve_link(href, page_url));

        ListingPage {
            articles,
            next_link,
        }
    }

    /// Builds the `Article` for one article block
    pub fn extract_article(&self, node: ElementRef<'_>) -> Article {
        let name = child_text(node, &self.selectors.title);
        let comments_label = child_text(node, &self.selectors.comments);

        let comment_count = match parse_comment_count(&comments_label) {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Comment count for '{}' defaulted to 0: {}", name, e);
                0
            }
        };

        Article {
            link: child_attr(node, &self.selectors.title, "href"),
            image_link: child_attr(node, &self.selectors.image, "src"),
            date: child_text(node, &self.selectors.date),
            author: child_text(node, &self.selectors.author),
            category: child_text(node, &self.selectors.category),
            comment_count,
            name,
        }
    }
}

/// Text of every matching descendant, concatenated and trimmed
fn child_text(node: ElementRef<'_>, selector: &Selector) -> String {
    node.select(selector)
        .flat_map(|element| element.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Attribute of the first matching descendant that carries it
fn child_attr(node: ElementRef<'_>, selector: &Selector, attr: &str) -> String {
    node.select(selector)
        .find_map(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}
