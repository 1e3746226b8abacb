//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers serving listing
//! pages and thumbnails, and test the full harvest cycle end-to-end.

use chrono::{DateTime, TimeZone, Utc};
use doc_harvest::config::{Config, CrawlerConfig, OutputConfig};
use doc_harvest::crawler::{run_harvest_with, Coordinator};
use doc_harvest::images::{annotated_path, recreate_dir, AnnotateError, Annotator};
use doc_harvest::output::{persist_articles, read_json};
use doc_harvest::storage::{SqliteStorage, Storage};
use doc_harvest::{HarvestError, RunContext};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Annotator that records what it was asked to do without touching the file
#[derive(Clone, Default)]
struct RecordingAnnotator {
    calls: Arc<Mutex<Vec<(PathBuf, String)>>>,
}

impl Annotator for RecordingAnnotator {
    fn annotate(&self, image_path: &Path, text: &str) -> Result<PathBuf, AnnotateError> {
        self.calls
            .lock()
            .unwrap()
            .push((image_path.to_path_buf(), text.to_string()));
        Ok(annotated_path(image_path))
    }
}

/// Annotator that always fails the way an undecodable image would
struct FailingAnnotator;

impl Annotator for FailingAnnotator {
    fn annotate(&self, image_path: &Path, _text: &str) -> Result<PathBuf, AnnotateError> {
        Err(AnnotateError::UnsupportedFormat {
            path: image_path.to_path_buf(),
        })
    }
}

/// One article block as served by the listing pages
struct Entry<'a> {
    title: &'a str,
    image: &'a str,
    date: &'a str,
}

fn entry<'a>(title: &'a str, image: &'a str, date: &'a str) -> Entry<'a> {
    Entry { title, image, date }
}

/// Builds a listing page in the markup the default selectors expect
fn listing_page(entries: &[Entry<'_>], next: Option<&str>) -> String {
    let mut blocks = String::new();
    for e in entries {
        blocks.push_str(&format!(
            r#"<article>
                <div class="meta-image"><a href="/{slug}/"><img src="{image}"></a></div>
                <header class="entry-header">
                    <h2 class="entry-title"><a href="/{slug}/">{title}</a></h2>
                    <div class="entry-meta">
                        <div class="meta-item date"><span class="updated">{date}</span></div>
                        <div class="meta-item author"><span class="vcard author"><span class="fn"><a>William Charles</a></span></span></div>
                        <div class="meta-item comments"><a>1,024 Comments</a></div>
                        <div class="meta-category"><a>Bank Bonuses</a></div>
                    </div>
                </header>
            </article>"#,
            slug = e.title.to_lowercase().replace(' ', "-"),
            image = e.image,
            title = e.title,
            date = e.date,
        ));
    }

    let pagination = next
        .map(|href| format!(r#"<div id="vce-pagination"><a class="next" href="{}">Older</a></div>"#, href))
        .unwrap_or_default();

    format!(
        r#"<html><head><title>Archive</title></head><body><div class="vce-loop-wrap">{}</div>{}</body></html>"#,
        blocks, pagination
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html; charset=utf-8")
}

/// A tiny valid PNG
fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(16, 16, image::Rgba([30, 60, 90, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

async fn mount_page(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, at: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(png_bytes())
                .insert_header("content-type", "image/png"),
        )
        .mount(server)
        .await;
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.crawler = CrawlerConfig {
        start_url: format!("{}/", server.uri()),
        allowed_domains: vec!["127.0.0.1".to_string()],
        user_agent: "TestBot/1.0".to_string(),
        delay_ms: 0,
        random_delay_ms: 0,
    };
    config.output = OutputConfig {
        images_dir: dir.path().join("docImages").to_string_lossy().to_string(),
        json_path: dir.path().join("articles.json").to_string_lossy().to_string(),
        database_path: dir.path().join("docarticles.db").to_string_lossy().to_string(),
    };
    config
}

fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
}

/// Runs the coordinator with a recording annotator and a fixed "now"
async fn run_coordinator(
    config: Config,
    days: u32,
) -> (Result<RunContext, HarvestError>, RecordingAnnotator) {
    recreate_dir(Path::new(&config.output.images_dir)).unwrap();
    let annotator = RecordingAnnotator::default();

    let result = Coordinator::new(config, days, Box::new(annotator.clone()))
        .expect("Failed to create coordinator")
        .with_reference_time(reference_time())
        .run()
        .await;

    (result, annotator)
}

fn names(context: &RunContext) -> Vec<&str> {
    context.articles.iter().map(|a| a.name.as_str()).collect()
}

#[tokio::test]
async fn test_old_article_stops_pagination_after_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let image = format!("{}/img/a.png", server.uri());

    mount_page(
        &server,
        "/",
        listing_page(
            &[
                entry("Fresh Offer", &image, "January 9, 2024"),
                entry("Old Offer", &image, "December 1, 2023"),
                entry("Also Fresh", &image, "January 8, 2024"),
            ],
            Some("/page/2/"),
        ),
    )
    .await;
    mount_image(&server, "/img/a.png").await;

    // The next page must never be requested
    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(html(listing_page(&[], None)))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, &dir);
    let (result, annotator) = run_coordinator(config, 7).await;
    let context = result.expect("Harvest failed");

    // The whole page is still collected
    assert_eq!(names(&context), vec!["Fresh Offer", "Old Offer", "Also Fresh"]);
    assert!(context.reached_end_date);
    assert_eq!(context.image_ordinal, 10003);
    assert_eq!(context.pages_visited, 1);
    assert_eq!(annotator.calls.lock().unwrap().len(), 3);

    let first = &context.articles[0];
    assert_eq!(first.link, "/fresh-offer/");
    assert_eq!(first.author, "William Charles");
    assert_eq!(first.category, "Bank Bonuses");
    assert_eq!(first.comment_count, 1024);
}

#[tokio::test]
async fn test_pagination_followed_within_window() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        listing_page(
            &[
                entry("One", "/img/one.png", "January 9, 2024"),
                entry("Two", "/img/two.png", "January 9, 2024"),
            ],
            Some("/page/2/"),
        ),
    )
    .await;
    // Links back to the front page, which was already visited
    mount_page(
        &server,
        "/page/2/",
        listing_page(&[entry("Three", "/img/three.png", "January 8, 2024")], Some("/")),
    )
    .await;
    mount_image(&server, "/img/one.png").await;
    mount_image(&server, "/img/two.png").await;
    mount_image(&server, "/img/three.png").await;

    let config = create_test_config(&server, &dir);
    let images_dir = PathBuf::from(&config.output.images_dir);
    let (result, annotator) = run_coordinator(config, 7).await;
    let context = result.expect("Harvest failed");

    assert_eq!(names(&context), vec!["One", "Two", "Three"]);
    assert!(!context.reached_end_date);
    assert_eq!(context.pages_visited, 2);

    assert!(images_dir.join("10000one.png").is_file());
    assert!(images_dir.join("10001two.png").is_file());
    assert!(images_dir.join("10002three.png").is_file());

    let titles: Vec<String> = annotator
        .calls
        .lock()
        .unwrap()
        .iter()
        .map(|(_, text)| text.clone())
        .collect();
    assert_eq!(titles, vec!["One", "Two", "Three"]);
}

#[tokio::test]
async fn test_shared_basename_gets_unique_names() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        listing_page(
            &[
                entry("A", "/a/thumb.png", "January 9, 2024"),
                entry("B", "/b/thumb.png", "January 9, 2024"),
                entry("C", "/c/thumb.png", "January 9, 2024"),
            ],
            None,
        ),
    )
    .await;
    mount_image(&server, "/a/thumb.png").await;
    mount_image(&server, "/b/thumb.png").await;
    mount_image(&server, "/c/thumb.png").await;

    let config = create_test_config(&server, &dir);
    let images_dir = PathBuf::from(&config.output.images_dir);
    let (result, _) = run_coordinator(config, 7).await;
    result.expect("Harvest failed");

    let mut files: Vec<String> = std::fs::read_dir(&images_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    files.sort();

    assert_eq!(
        files,
        vec!["10000thumb.png", "10001thumb.png", "10002thumb.png"]
    );

    let expected = png_bytes();
    for file in files {
        assert_eq!(std::fs::read(images_dir.join(file)).unwrap(), expected);
    }
}

#[tokio::test]
async fn test_failed_page_is_not_fatal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        listing_page(
            &[entry("Only", "/img/only.png", "January 9, 2024")],
            Some("/page/2/"),
        ),
    )
    .await;
    mount_image(&server, "/img/only.png").await;

    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, &dir);
    let (result, _) = run_coordinator(config, 7).await;
    let context = result.expect("Page failure should not end the run");

    assert_eq!(names(&context), vec!["Only"]);
    assert_eq!(context.pages_visited, 2);
    assert_eq!(context.pages_failed, 1);
}

#[tokio::test]
async fn test_non_html_page_is_skipped() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"posts": []})))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, &dir);
    let (result, _) = run_coordinator(config, 7).await;
    let context = result.expect("Harvest failed");

    assert!(context.articles.is_empty());
    assert_eq!(context.pages_failed, 1);
}

#[tokio::test]
async fn test_foreign_next_link_not_followed() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let port = url::Url::parse(&server.uri()).unwrap().port().unwrap();

    mount_page(
        &server,
        "/",
        listing_page(
            &[entry("Only", "/img/only.png", "January 9, 2024")],
            Some(&format!("http://localhost:{}/page/2/", port)),
        ),
    )
    .await;
    mount_image(&server, "/img/only.png").await;

    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(html(listing_page(&[], None)))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, &dir);
    let (result, _) = run_coordinator(config, 7).await;
    let context = result.expect("Harvest failed");

    assert_eq!(context.pages_visited, 1);
}

#[tokio::test]
async fn test_image_failure_is_fatal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        listing_page(
            &[
                entry("Broken", "/img/missing.png", "January 9, 2024"),
                entry("Never", "/img/never.png", "January 9, 2024"),
            ],
            None,
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/img/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/never.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes()))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, &dir);
    let (result, _) = run_coordinator(config, 7).await;

    match result {
        Err(HarvestError::ImageFetch { url, .. }) => assert!(url.ends_with("/img/missing.png")),
        Err(other) => panic!("expected ImageFetch, got {}", other),
        Ok(_) => panic!("expected the run to fail"),
    }
}

#[tokio::test]
async fn test_empty_image_link_is_fatal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        listing_page(&[entry("No Thumbnail", "", "January 9, 2024")], None),
    )
    .await;

    let config = create_test_config(&server, &dir);
    let (result, _) = run_coordinator(config, 7).await;

    assert!(matches!(result, Err(HarvestError::ImageFetch { .. })));
}

#[tokio::test]
async fn test_annotation_failure_is_not_fatal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        listing_page(
            &[
                entry("First", "/img/first.png", "January 9, 2024"),
                entry("Second", "/img/second.png", "January 9, 2024"),
            ],
            None,
        ),
    )
    .await;
    mount_image(&server, "/img/first.png").await;
    mount_image(&server, "/img/second.png").await;

    let config = create_test_config(&server, &dir);
    recreate_dir(Path::new(&config.output.images_dir)).unwrap();

    let context = Coordinator::new(config, 7, Box::new(FailingAnnotator))
        .unwrap()
        .with_reference_time(reference_time())
        .run()
        .await
        .expect("Annotation failures should not end the run");

    assert_eq!(names(&context), vec!["First", "Second"]);
}

#[tokio::test]
async fn test_full_harvest_persists_results() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let today = Utc::now().format("%B %-d, %Y").to_string();

    mount_page(
        &server,
        "/",
        listing_page(
            &[
                entry("Today One", "/img/1.png", &today),
                entry("Today Two", "/img/2.png", &today),
            ],
            None,
        ),
    )
    .await;
    mount_image(&server, "/img/1.png").await;
    mount_image(&server, "/img/2.png").await;

    let config = create_test_config(&server, &dir);
    let output = config.output.clone();

    // Leftovers from a previous run are removed
    std::fs::create_dir_all(&output.images_dir).unwrap();
    std::fs::write(Path::new(&output.images_dir).join("stale.png"), b"old").unwrap();

    let context = run_harvest_with(config, 1, Box::new(RecordingAnnotator::default()))
        .await
        .expect("Harvest failed");
    assert_eq!(context.article_count(), 2);

    assert!(!Path::new(&output.images_dir).join("stale.png").exists());

    let json = read_json(Path::new(&output.json_path)).unwrap();
    assert_eq!(json, context.articles);

    let storage = SqliteStorage::new(Path::new(&output.database_path)).unwrap();
    let rows = storage.load_articles().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].article, context.articles[0]);
    assert_eq!(rows[1].article, context.articles[1]);
}

#[tokio::test]
async fn test_persisting_twice_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let output = OutputConfig {
        images_dir: dir.path().join("docImages").to_string_lossy().to_string(),
        json_path: dir.path().join("articles.json").to_string_lossy().to_string(),
        database_path: dir.path().join("docarticles.db").to_string_lossy().to_string(),
    };

    let articles = vec![
        doc_harvest::Article {
            name: "Repeat".to_string(),
            date: "January 9, 2024".to_string(),
            comment_count: 3,
            ..Default::default()
        },
        doc_harvest::Article {
            name: "Repeat".to_string(),
            date: "January 8, 2024".to_string(),
            ..Default::default()
        },
    ];

    persist_articles(&articles, &output).unwrap();
    persist_articles(&articles, &output).unwrap();

    let storage = SqliteStorage::new(Path::new(&output.database_path)).unwrap();
    assert_eq!(storage.count_articles().unwrap(), 2);

    let stored: Vec<_> = storage
        .load_articles()
        .unwrap()
        .into_iter()
        .map(|row| row.article)
        .collect();
    assert_eq!(stored, articles);
    assert_eq!(read_json(Path::new(&output.json_path)).unwrap(), articles);
}
