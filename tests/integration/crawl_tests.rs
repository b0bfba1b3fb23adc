//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use dead_link_checker::config::{Config, CrawlerConfig, HttpConfig};
use dead_link_checker::crawl;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts
fn create_test_config(concurrency: usize) -> Config {
    Config {
        crawler: CrawlerConfig { concurrency },
        http: HttpConfig {
            timeout_secs: 5,
            ..HttpConfig::default()
        },
        ..Config::default()
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html",
    )
}

/// Mounts a GET page that must be fetched exactly once
async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Answers every HEAD probe with 200
async fn mount_head_ok(server: &MockServer) {
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

/// URL of `server` under a host name different from the crawl's 127.0.0.1
fn external_uri(server: &MockServer) -> String {
    format!("http://localhost:{}", server.address().port())
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_head_ok(&server).await;

    mount_page(
        &server,
        "/",
        r#"<a href="/page1">Page 1</a><a href="page2/">Page 2</a>"#,
    )
    .await;
    mount_page(&server, "/page1", r#"<a href="/">Home</a>"#).await;
    mount_page(
        &server,
        "/page2",
        r#"<a href="/missing">Missing</a><a href="mailto:me@example.com">Mail</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = crawl(create_test_config(4), &base_url).await.unwrap();

    let visited: Vec<String> = result
        .visited_pages
        .iter()
        .map(|p| p.to_string())
        .collect();
    assert_eq!(
        visited,
        vec![
            format!("{}/", base_url),
            format!("{}/missing", base_url),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
        ]
    );

    // /page1, /page2/, /, /missing
    assert_eq!(result.links_checked(), 4);
    assert!(!result.interrupted);

    let broken: Vec<_> = result.broken_links().collect();
    assert_eq!(broken.len(), 1);
    assert_eq!(broken[0].href, format!("{}/missing", base_url));
    assert_eq!(broken[0].source.to_string(), format!("{}/page2", base_url));
    assert_eq!(broken[0].status, Some(404));
}

#[tokio::test]
async fn test_cycle_fetches_each_page_once() {
    let server = MockServer::start().await;
    mount_head_ok(&server).await;

    mount_page(&server, "/", r#"<a href="/a">A</a>"#).await;
    mount_page(&server, "/a", r#"<a href="/b">B</a>"#).await;
    mount_page(&server, "/b", r#"<a href="/index.html">Home</a><a href="/a#top">A</a>"#).await;

    let result = crawl(create_test_config(5), &server.uri()).await.unwrap();

    assert_eq!(result.pages_visited(), 3);
    assert_eq!(result.broken_count(), 0);
}

#[tokio::test]
async fn test_external_links_are_probed_not_crawled() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    let external_url = external_uri(&external);

    mount_head_ok(&site).await;
    mount_page(
        &site,
        "/",
        &format!(
            r#"<a href="{0}/dead">Dead</a><a href="{0}/alive">Alive</a>"#,
            external_url
        ),
    )
    .await;

    Mock::given(method("HEAD"))
        .and(path("/dead"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&external)
        .await;
    Mock::given(method("GET"))
        .and(path("/dead"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&external)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/alive"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&external)
        .await;
    Mock::given(method("GET"))
        .and(path("/alive"))
        .respond_with(html("should not be crawled"))
        .expect(0)
        .mount(&external)
        .await;

    let result = crawl(create_test_config(3), &site.uri()).await.unwrap();

    assert_eq!(result.pages_visited(), 1);
    assert_eq!(result.links_checked(), 2);

    let dead = result
        .observations
        .iter()
        .find(|o| o.href.ends_with("/dead"))
        .unwrap();
    assert_eq!(dead.status, Some(404));
    assert!(!dead.ok);
    assert_eq!(dead.text, "Dead");

    let alive = result
        .observations
        .iter()
        .find(|o| o.href.ends_with("/alive"))
        .unwrap();
    assert_eq!(alive.status, Some(200));
    assert!(alive.ok);
}

#[tokio::test]
async fn test_head_not_allowed_is_confirmed_with_get() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;

    mount_head_ok(&site).await;
    mount_page(
        &site,
        "/",
        &format!(r#"<a href="{}/no-head">No HEAD</a>"#, external_uri(&external)),
    )
    .await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&external)
        .await;
    Mock::given(method("GET"))
        .and(path("/no-head"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&external)
        .await;

    let result = crawl(create_test_config(2), &site.uri()).await.unwrap();

    assert_eq!(result.links_checked(), 1);
    assert_eq!(result.observations[0].status, Some(200));
    assert!(result.observations[0].ok);
}

#[tokio::test]
async fn test_shared_external_link_is_probed_once() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    let shared = format!("{}/shared", external_uri(&external));

    mount_head_ok(&site).await;

    let mut home = String::new();
    for i in 0..20 {
        home.push_str(&format!(r#"<a href="/p{}">P{}</a>"#, i, i));
        mount_page(
            &site,
            &format!("/p{}", i),
            &format!(r#"<a href="{}">Shared</a>"#, shared),
        )
        .await;
    }
    mount_page(&site, "/", &home).await;

    Mock::given(method("HEAD"))
        .and(path("/shared"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&external)
        .await;

    let result = crawl(create_test_config(8), &site.uri()).await.unwrap();

    assert_eq!(result.pages_visited(), 21);
    assert_eq!(
        result
            .observations
            .iter()
            .filter(|o| o.href == shared)
            .count(),
        1
    );
}

#[tokio::test]
async fn test_unreachable_link_has_no_status() {
    let site = MockServer::start().await;

    mount_head_ok(&site).await;
    mount_page(&site, "/", r#"<a href="http://localhost:1/">Down</a>"#).await;

    let result = crawl(create_test_config(2), &site.uri()).await.unwrap();

    assert_eq!(result.links_checked(), 1);
    let down = &result.observations[0];
    assert_eq!(down.href, "http://localhost:1/");
    assert_eq!(down.status, None);
    assert!(!down.ok);
}

#[tokio::test]
async fn test_unreachable_seed_completes_with_failure_observation() {
    let result = crawl(create_test_config(5), "http://127.0.0.1:1/")
        .await
        .unwrap();

    assert_eq!(result.pages_visited(), 1);
    assert_eq!(result.links_checked(), 1);

    let failed = &result.observations[0];
    assert_eq!(failed.source.as_str(), "http://127.0.0.1:1/");
    assert_eq!(failed.href, "http://127.0.0.1:1/");
    assert_eq!(failed.status, None);
    assert!(!failed.ok);
}

#[tokio::test]
async fn test_non_html_page_is_not_parsed() {
    let server = MockServer::start().await;
    mount_head_ok(&server).await;

    mount_page(&server, "/", r#"<a href="/doc.pdf">Doc</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="/hidden">not html</a>"#, "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html(""))
        .expect(0)
        .mount(&server)
        .await;

    let result = crawl(create_test_config(2), &server.uri()).await.unwrap();

    assert_eq!(result.pages_visited(), 2);
    assert_eq!(result.links_checked(), 1);
}

#[tokio::test]
async fn test_invalid_seed_is_fatal() {
    assert!(crawl(create_test_config(1), "not a url").await.is_err());
    assert!(crawl(create_test_config(1), "ftp://example.com/").await.is_err());
}
