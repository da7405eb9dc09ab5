//! Integration tests for web crawls
//!
//! These tests use wiremock to create mock HTTP servers and drive the full
//! classify -> crawl -> stream cycle end-to-end.

use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use trawl::config::load_config;
use trawl::{AbortReason, Config, CrawlItem, Crawler};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with generous budgets
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = 5;
    config.crawler.max_total_size = 1_000_000;
    config.crawler.max_page_size = 100_000;
    config.crawler.max_pages = 100;
    config.crawler.request_timeout = 5;
    config
}

async fn mount_html(server: &MockServer, route: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.into(), "text/html"))
        .mount(server)
        .await;
}

fn paths(items: &[CrawlItem], base: &str) -> Vec<String> {
    items
        .iter()
        .map(|i| i.source_url.trim_start_matches(base).to_string())
        .collect()
}

#[tokio::test]
async fn test_scope_prefix_limits_crawl() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/docs/a",
        format!(
            r#"<html><body>
                <a href="/docs/b">in scope</a>
                <a href="/blog/c">same host, out of scope</a>
                <a href="{}/docs/x">other host</a>
            </body></html>"#,
            other_server.uri()
        ),
    )
    .await;
    mount_html(&mock_server, "/docs/b", "<p>leaf</p>").await;

    // Out-of-scope URLs must never be requested
    Mock::given(method("GET"))
        .and(path("/blog/c"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&other_server)
        .await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let (items, outcome) = crawler
        .crawl(&format!("{}/docs*/a", base_url))
        .collect()
        .await;

    assert_eq!(paths(&items, &base_url), vec!["/docs/a", "/docs/b"]);
    assert!(items
        .iter()
        .all(|i| i.source_url.starts_with(&format!("{}/docs", base_url))));
    assert_eq!(outcome.items_emitted, 2);
    assert!(outcome.abort_reason.is_none());
    assert!(!outcome.faulted);
}

#[tokio::test]
async fn test_zero_depth_emits_only_seed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        r#"<a href="/one">1</a><a href="/two">2</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/one"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config();
    config.crawler.max_depth = 0;
    let crawler = Crawler::new(config).unwrap();

    let mut stream = crawler.crawl(&format!("{}/", base_url));
    let mut items = Vec::new();
    while let Some(item) = stream.next_item().await {
        items.push(item);
    }

    assert_eq!(items.len(), 1);
    assert_eq!(stream.abort_reason(), Some(AbortReason::DepthExhausted));
}

#[tokio::test]
async fn test_total_size_budget_stops_after_oversized_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let mut page = String::from(r#"<a href="/next">next</a>"#);
    page.push_str(&"x".repeat(500));
    mount_html(&mock_server, "/", page).await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config();
    config.crawler.max_total_size = 100;
    config.crawler.max_page_size = 200;
    let crawler = Crawler::new(config).unwrap();

    let (items, outcome) = crawler.crawl(&format!("{}/", base_url)).collect().await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].size(), 200);
    assert_eq!(outcome.abort_reason, Some(AbortReason::SizeExceeded));
    assert_eq!(outcome.bytes_emitted, 200);
}

#[tokio::test]
async fn test_failed_fetches_do_not_end_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        r#"<a href="/slow">slow</a><a href="/broken">broken</a><a href="/ok">ok</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/ok", "fine").await;

    let mut config = create_test_config();
    config.crawler.request_timeout = 1;
    let crawler = Crawler::new(config).unwrap();

    let (items, outcome) = crawler.crawl(&format!("{}/", base_url)).collect().await;

    assert_eq!(paths(&items, &base_url), vec!["/", "/ok"]);
    assert!(outcome.abort_reason.is_none());
    assert!(!outcome.faulted);
}

#[tokio::test]
async fn test_refused_connection_does_not_end_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Reserve a port, then free it so connections to it are refused
    let dead_port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    mount_html(
        &mock_server,
        "/",
        format!(
            r#"<a href="http://127.0.0.1:{}/gone">gone</a><a href="/ok">ok</a>"#,
            dead_port
        ),
    )
    .await;
    mount_html(&mock_server, "/ok", "fine").await;

    // Scope covers every port on the host, so the dead link is queued
    let locator = format!("http://127.0.0.1*:{}/", mock_server.address().port());
    let crawler = Crawler::new(create_test_config()).unwrap();
    let (items, outcome) = crawler.crawl(&locator).collect().await;

    assert_eq!(paths(&items, &base_url), vec!["/", "/ok"]);
    assert_eq!(outcome.items_emitted, 2);
    assert!(outcome.abort_reason.is_none());
    assert!(!outcome.faulted);
}

#[tokio::test]
async fn test_mixed_case_host_keeps_links_in_scope() {
    let mock_server = MockServer::start().await;
    let port = mock_server.address().port();

    mount_html(
        &mock_server,
        "/docs/a",
        r#"<a href="/docs/b">b</a><a href="/docs/a">self</a>"#,
    )
    .await;
    mount_html(&mock_server, "/docs/b", r#"<a href="/docs/a">back</a>"#).await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let (items, outcome) = crawler
        .crawl(&format!("http://LOCALHOST:{}/docs*/a", port))
        .collect()
        .await;

    let urls: Vec<_> = items.iter().map(|i| i.source_url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("http://localhost:{}/docs/a", port),
            format!("http://localhost:{}/docs/b", port),
        ]
    );
    assert_eq!(outcome.items_emitted, 2);
    assert!(outcome.abort_reason.is_none());
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        r#"<a href="/a">a</a><a href="/a#top">a again</a><a href="/b">b</a>"#,
    )
    .await;
    mount_html(&mock_server, "/b", r#"<a href="/a">a</a><a href="/">home</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("a", "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let (items, _) = crawler.crawl(&format!("{}/", base_url)).collect().await;

    assert_eq!(paths(&items, &base_url), vec!["/", "/a", "/b"]);
}

#[tokio::test]
async fn test_non_html_pages_are_not_parsed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"<a href="/hidden">x</a>"#, "text/plain"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let (items, outcome) = crawler.crawl(&format!("{}/", base_url)).collect().await;

    assert_eq!(items.len(), 1);
    assert!(items[0]
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("text/plain")));
    assert!(outcome.abort_reason.is_none());
}

#[tokio::test]
async fn test_max_pages_caps_items() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: String = (0..10)
        .map(|n| format!(r#"<a href="/p{}">{}</a>"#, n, n))
        .collect();
    mount_html(&mock_server, "/", links).await;
    for n in 0..10 {
        mount_html(&mock_server, &format!("/p{}", n), "page").await;
    }

    let mut config = create_test_config();
    config.crawler.max_pages = 3;
    let crawler = Crawler::new(config).unwrap();

    let (items, outcome) = crawler.crawl(&format!("{}/", base_url)).collect().await;

    assert_eq!(items.len(), 3);
    assert_eq!(outcome.items_emitted, 3);
    assert_eq!(outcome.abort_reason, Some(AbortReason::SizeExceeded));
}

#[tokio::test]
async fn test_cancel_ends_stream() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: String = (0..50)
        .map(|n| format!(r#"<a href="/p{}">{}</a>"#, n, n))
        .collect();
    mount_html(&mock_server, "/", links).await;
    for n in 0..50 {
        mount_html(&mock_server, &format!("/p{}", n), "page").await;
    }

    let mut config = create_test_config();
    config.crawler.channel_capacity = 1;
    let crawler = Crawler::new(config).unwrap();

    let mut stream = crawler.crawl(&format!("{}/", base_url));
    assert!(stream.next_item().await.is_some());
    stream.cancel();

    let rest = tokio::time::timeout(Duration::from_secs(10), async {
        let mut count = 0;
        while stream.next_item().await.is_some() {
            count += 1;
        }
        count
    })
    .await
    .unwrap();

    assert_eq!(rest, 0);
    let outcome = stream.outcome().unwrap();
    assert!(outcome.cancelled);
    assert!(outcome.items_emitted < 51);
}

#[tokio::test]
async fn test_budget_from_config_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(&mock_server, "/", r#"<a href="/a">a</a><a href="/b">b</a>"#).await;
    mount_html(&mock_server, "/a", "a").await;
    mount_html(&mock_server, "/b", "b").await;

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[crawler]
max-pages = 2
request-timeout = 5

[user-agent]
crawler-name = "trawl-test"
"#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.crawler.max_pages, 2);
    let crawler = Crawler::new(config).unwrap();

    let (items, outcome) = crawler.crawl(&format!("{}/", base_url)).collect().await;
    assert_eq!(items.len(), 2);
    assert_eq!(outcome.abort_reason, Some(AbortReason::SizeExceeded));
}
