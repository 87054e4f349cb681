//! Integration tests for the scraper
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full traverse-download-save cycle end-to-end.

use site_harvest::config::{Config, FetcherConfig, SiteConfig, UserAgentConfig};
use site_harvest::crawler::{
    run_scrape, ContentFetcher, EventSink, HttpSource, PageTraverser, ReqwestSource,
};
use site_harvest::HarvestError;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration mirroring `seed` into `dir`
fn create_test_config(seed: String, dir: &Path) -> Config {
    Config {
        site: SiteConfig {
            url: seed,
            location_on_disk: dir.to_string_lossy().to_string(),
        },
        fetcher: FetcherConfig {
            max_concurrent_downloads: 2,
            request_timeout: 5,
            connect_timeout: 5,
        },
        user_agent: UserAgentConfig::default(),
    }
}

fn test_source() -> Arc<dyn HttpSource> {
    let config = create_test_config(String::new(), Path::new("."));
    Arc::new(
        ReqwestSource::from_config(&config.user_agent, &config.fetcher)
            .expect("Failed to build client"),
    )
}

async fn mount_page(server: &MockServer, page: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_file(server: &MockServer, file: &str, bytes: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(file))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_scrape_mirrors_site() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(
        &mock_server,
        "/index.html",
        r#"<html><head><link rel="stylesheet" href="css/site.css"></head>
        <body><a href="page2.html">Page 2</a><img src="logo.png"></body></html>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/page2.html",
        r#"<html><body><img src="img/photo.jpg"><a href="index.html">Home</a></body></html>"#,
    )
    .await;

    let logo: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];
    let photo: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    mount_file(&mock_server, "/logo.png", logo.clone()).await;
    mount_file(&mock_server, "/img/photo.jpg", photo.clone()).await;
    mount_file(&mock_server, "/css/site.css", b"body { color: red; }".to_vec()).await;

    let config = create_test_config(format!("{}/index.html", mock_server.uri()), dir.path());
    let stats = run_scrape(&config).await.expect("Scrape failed");

    assert_eq!(stats.pages_loaded, 2);
    assert_eq!(stats.pages_saved, 2);
    assert_eq!(stats.unique_files, 3);
    assert_eq!(stats.resources_downloaded, 3);
    assert_eq!(stats.resources_saved, 3);

    // Bytes on disk are exactly what the server sent
    assert_eq!(std::fs::read(dir.path().join("logo.png")).unwrap(), logo);
    assert_eq!(
        std::fs::read(dir.path().join("img").join("photo.jpg")).unwrap(),
        photo
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("css").join("site.css")).unwrap(),
        "body { color: red; }"
    );
    assert!(std::fs::read_to_string(dir.path().join("page2.html"))
        .unwrap()
        .contains("img/photo.jpg"));
}

#[tokio::test]
async fn test_inline_http_links_are_not_followed() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/index.html",
        &format!(
            r#"<html><body>
            <a href="{}/secret.html">Absolute</a>
            <a href="public.html">Relative</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;
    mount_page(&mock_server, "/public.html", "<p>public</p>").await;

    Mock::given(method("GET"))
        .and(path("/secret.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>secret</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/index.html", base_url), dir.path());
    let stats = run_scrape(&config).await.expect("Scrape failed");

    assert_eq!(stats.pages_loaded, 2);
    assert!(!dir.path().join("secret.html").exists());
}

#[tokio::test]
async fn test_cyclic_pages_fetched_once() {
    let mock_server = MockServer::start().await;

    // `expect(1)` is verified when the server drops
    mount_page(&mock_server, "/a.html", r#"<a href="b.html">B</a>"#).await;
    mount_page(
        &mock_server,
        "/b.html",
        r#"<a href="a.html">A</a><a href="c.html">C</a>"#,
    )
    .await;
    mount_page(&mock_server, "/c.html", r#"<a href="a.html">A</a><a href="b.html#x">B</a>"#).await;

    let traversal = PageTraverser::new(test_source(), EventSink::detached())
        .traverse(Url::parse(&format!("{}/a.html", mock_server.uri())).unwrap())
        .await
        .expect("Traversal failed");

    assert_eq!(traversal.pages.len(), 3);
    assert!(traversal.files.is_empty());
}

#[tokio::test]
async fn test_failed_resource_is_skipped() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(
        &mock_server,
        "/index.html",
        r#"<img src="1.png"><img src="2.png"><img src="3.png"><img src="4.png"><img src="5.png">"#,
    )
    .await;
    for i in [1, 2, 4, 5] {
        mount_file(&mock_server, &format!("/{}.png", i), vec![i as u8; 16]).await;
    }
    Mock::given(method("GET"))
        .and(path("/3.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/index.html", mock_server.uri()), dir.path());
    let stats = run_scrape(&config).await.expect("Scrape failed");

    assert_eq!(stats.unique_files, 5);
    assert_eq!(stats.resources_downloaded, 4);
    assert_eq!(stats.download_failures(), 1);
    assert!(!dir.path().join("3.png").exists());
    for i in [1u8, 2, 4, 5] {
        assert_eq!(
            std::fs::read(dir.path().join(format!("{}.png", i))).unwrap(),
            vec![i; 16]
        );
    }
}

#[tokio::test]
async fn test_page_error_aborts_scrape() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(
        &mock_server,
        "/index.html",
        r#"<a href="broken.html">Broken</a><img src="logo.png">"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png".to_vec()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/index.html", mock_server.uri()), dir.path());
    let result = run_scrape(&config).await;

    match result {
        Err(HarvestError::PageFetch { url, .. }) => assert!(url.ends_with("/broken.html")),
        other => panic!("Expected a page fetch error, got {:?}", other),
    }

    // The page loaded before the failure is still on disk
    assert!(dir.path().join("index.html").exists());
}

#[tokio::test]
async fn test_downloads_are_capped_at_two() {
    let mock_server = MockServer::start().await;

    for i in 0..4 {
        Mock::given(method("GET"))
            .and(path(format!("/slow{}.bin", i)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![0u8; 8])
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&mock_server)
            .await;
    }

    let urls: Vec<Url> = (0..4)
        .map(|i| Url::parse(&format!("{}/slow{}.bin", mock_server.uri(), i)).unwrap())
        .collect();

    let fetcher = ContentFetcher::new(test_source(), EventSink::detached());
    let started = Instant::now();
    let resources = fetcher.fetch(urls).await;

    assert_eq!(resources.len(), 4);
    // Four 200ms responses, two at a time, need at least two rounds
    assert!(
        started.elapsed() >= Duration::from_millis(400),
        "Downloads overlapped more than allowed: {:?}",
        started.elapsed()
    );
}
