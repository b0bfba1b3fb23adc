//! Integration tests for report persistence

use dead_link_checker::config::{Config, CrawlerConfig};
use dead_link_checker::crawl;
use dead_link_checker::output::{write_report, ReportFormat, CSV_HEADER};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn crawl_small_site() -> (MockServer, dead_link_checker::CrawlResult) {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<a href="/about">About "us"</a><a href="/gone">Gone</a>"#,
            "text/html",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>About</p>", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let config = Config {
        crawler: CrawlerConfig { concurrency: 2 },
        ..Config::default()
    };
    let result = crawl(config, &server.uri()).await.unwrap();
    (server, result)
}

#[tokio::test]
async fn test_json_report_round_trips_result() {
    let (server, result) = crawl_small_site().await;
    let temp = TempDir::new().unwrap();

    let path = write_report(ReportFormat::Json, &server.uri(), &result, temp.path()).unwrap();

    let name = path.file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("result-127.0.0.1-"), "unexpected name {}", name);
    assert!(name.ends_with(".json"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["targetUrl"], server.uri());
    assert_eq!(json["pagesVisited"].as_array().unwrap().len(), 3);
    assert_eq!(json["linkResults"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_csv_report_has_one_row_per_observation() {
    let (server, result) = crawl_small_site().await;
    let temp = TempDir::new().unwrap();

    let path = write_report(ReportFormat::Csv, &server.uri(), &result, temp.path()).unwrap();
    assert_eq!(path.extension().unwrap(), "csv");

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(headers, CSV_HEADER);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), result.links_checked());

    for row in &rows {
        assert!(&row[3] == "true" || &row[3] == "false");
    }

    let gone = rows.iter().find(|r| r[1].ends_with("/gone")).unwrap();
    assert_eq!(&gone[2], "410");
    assert_eq!(&gone[3], "false");

    let about = rows.iter().find(|r| r[1].ends_with("/about")).unwrap();
    assert_eq!(&about[4], "About \"us\"");
}
