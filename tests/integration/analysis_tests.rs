//! Integration tests for the analyzer
//!
//! These tests use wiremock to stand in for both the identity service and the
//! ZIA API, and run whole analyses end-to-end into a temporary directory.

use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};
use zia_category_analyzer::categories::parse_selection;
use zia_category_analyzer::{
    Analyzer, CategoryOutcome, Config, Credentials, ExportFormat, ZiaError,
};

/// Classifies URLs containing "news" as News and everything else as unknown
struct KeywordLookup;

impl Respond for KeywordLookup {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let urls: Vec<String> = serde_json::from_slice(&request.body).unwrap();
        let results: Vec<Value> = urls
            .iter()
            .map(|url| {
                let labels: Vec<&str> = if url.contains("news") {
                    vec!["NEWS_AND_MEDIA"]
                } else {
                    vec![]
                };
                json!({ "url": url, "urlClassifications": labels })
            })
            .collect();
        ResponseTemplate::new(200).set_body_json(results)
    }
}

fn create_test_config(server: &MockServer, output_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.api.api_base_url = server.uri();
    config.client.min_request_interval = 5; // Very short for testing
    config.client.rate_limit_backoff = 50;
    config.client.retry_after_buffer = 10;
    config.output.directory = output_dir.path().display().to_string();
    config
}

fn credentials(server: &MockServer) -> Credentials {
    Credentials::new(server.uri(), "client-1", "s3cret")
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth2/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "integration-token",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

async fn mount_listing(server: &MockServer, categories: Value) {
    Mock::given(method("GET"))
        .and(path("/zia/api/v1/urlCategories/lite"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories))
        .mount(server)
        .await;
}

async fn mount_category(server: &MockServer, id: &str, name: &str, urls: Vec<String>) {
    Mock::given(method("GET"))
        .and(path(format!("/zia/api/v1/urlCategories/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "configuredName": name,
            "urls": urls,
            "dbCategorizedUrls": []
        })))
        .mount(server)
        .await;
}

async fn mount_lookup(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/zia/api/v1/urlLookup"))
        .respond_with(KeywordLookup)
        .mount(server)
        .await;
}

async fn lookup_request_sizes(server: &MockServer) -> Vec<usize> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/zia/api/v1/urlLookup")
        .map(|r| serde_json::from_slice::<Vec<String>>(&r.body).unwrap().len())
        .collect()
}

fn urls(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}{}.example.com", prefix, i)).collect()
}

#[tokio::test]
async fn test_selected_categories_analyzed_in_order() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_token(&server).await;
    mount_listing(
        &server,
        json!([
            { "id": "CUSTOM_01", "configuredName": "Partners", "customCategory": true },
            { "id": "NEWS_AND_MEDIA", "customCategory": false },
            { "id": "CUSTOM_02", "configuredName": "Vendors", "customCategory": true },
            { "id": "CUSTOM_03", "configuredName": "Press", "customCategory": true }
        ]),
    )
    .await;
    mount_category(&server, "CUSTOM_01", "Partners", urls("partner", 3)).await;
    mount_category(&server, "CUSTOM_03", "Press", urls("news", 2)).await;
    mount_lookup(&server).await;

    let config = create_test_config(&server, &output);
    let mut analyzer = Analyzer::new(&config, credentials(&server), ExportFormat::Csv).unwrap();
    analyzer.authenticate().await.unwrap();

    let categories = analyzer.list_categories().await.unwrap();
    assert_eq!(categories.len(), 3);

    let selection = parse_selection("1,3", categories.len());
    let ids: Vec<String> = selection
        .indices
        .iter()
        .map(|&i| categories[i].id.clone())
        .collect();
    assert_eq!(ids, vec!["CUSTOM_01", "CUSTOM_03"]);

    let summary = analyzer.run(&ids).await.unwrap();
    assert_eq!(summary.ids(), vec!["CUSTOM_01", "CUSTOM_03"]);
    assert_eq!(summary.analyzed_count(), 2);

    match &summary.outcomes[1] {
        CategoryOutcome::Analyzed { report, .. } => {
            assert_eq!(report.category_name, "Press");
            assert_eq!(report.coverage.categorized_count, 2);
            assert_eq!(report.coverage.percent_categorized(), 100.0);
        }
        other => panic!("Expected an analyzed outcome, got {:?}", other),
    }

    assert!(output.path().join("partners_category_analysis.csv").exists());
    assert!(output.path().join("press_category_analysis.csv").exists());

    // Vendors was never selected
    let requested: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert!(!requested.iter().any(|p| p.ends_with("CUSTOM_02")));
}

#[tokio::test]
async fn test_large_category_uses_three_lookups() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_token(&server).await;
    let mut category_urls = urls("site", 200);
    category_urls.extend(urls("news", 50));
    mount_category(&server, "CUSTOM_10", "Big List", category_urls).await;
    mount_lookup(&server).await;

    let config = create_test_config(&server, &output);
    let mut analyzer = Analyzer::new(&config, credentials(&server), ExportFormat::Csv).unwrap();

    let summary = analyzer.run(&["CUSTOM_10".to_string()]).await.unwrap();
    assert_eq!(summary.analyzed_count(), 1);
    assert_eq!(lookup_request_sizes(&server).await, vec![100, 100, 50]);

    let csv_path = output.path().join("big_list_category_analysis.csv");
    let content = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 251);
    assert_eq!(lines[0], "url,categories");
    assert_eq!(lines[1], "site0.example.com,Not categorized");
    assert_eq!(lines[250], "news49.example.com,NEWS_AND_MEDIA");

    match &summary.outcomes[0] {
        CategoryOutcome::Analyzed { report, .. } => {
            assert_eq!(report.coverage.total, 250);
            assert_eq!(report.coverage.categorized_count, 50);
            assert_eq!(report.coverage.percent_categorized(), 20.0);
            assert_eq!(report.coverage.percent_uncategorized(), 80.0);
        }
        other => panic!("Expected an analyzed outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_category_does_not_stop_run() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_token(&server).await;
    mount_category(&server, "CUSTOM_01", "First", urls("a", 2)).await;
    Mock::given(method("GET"))
        .and(path("/zia/api/v1/urlCategories/CUSTOM_02"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;
    mount_category(&server, "CUSTOM_03", "Third", urls("news", 2)).await;
    mount_lookup(&server).await;

    let config = create_test_config(&server, &output);
    let mut analyzer = Analyzer::new(&config, credentials(&server), ExportFormat::Csv).unwrap();

    let ids: Vec<String> = ["CUSTOM_01", "CUSTOM_02", "CUSTOM_03"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let summary = analyzer.run(&ids).await.unwrap();

    assert_eq!(summary.ids(), vec!["CUSTOM_01", "CUSTOM_02", "CUSTOM_03"]);
    assert_eq!(summary.analyzed_count(), 2);
    assert_eq!(summary.failed_count(), 1);

    match &summary.outcomes[1] {
        CategoryOutcome::Failed { id, error } => {
            assert_eq!(id, "CUSTOM_02");
            assert!(error.contains("500"));
        }
        other => panic!("Expected a failed outcome, got {:?}", other),
    }
    assert!(output.path().join("third_category_analysis.csv").exists());
}

#[tokio::test]
async fn test_auth_failure_aborts_run() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/oauth2/v1/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client"
        })))
        .mount(&server)
        .await;
    mount_category(&server, "CUSTOM_01", "First", urls("a", 2)).await;

    let config = create_test_config(&server, &output);
    let mut analyzer = Analyzer::new(&config, credentials(&server), ExportFormat::Csv).unwrap();

    let err = analyzer.authenticate().await.unwrap_err();
    assert!(err.is_fatal());

    let err = analyzer
        .run(&["CUSTOM_01".to_string(), "CUSTOM_02".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, ZiaError::Auth { .. }));

    // Nothing reached the API without a token
    let api_calls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path().starts_with("/zia/api/v1"))
        .count();
    assert_eq!(api_calls, 0);
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_empty_category_writes_nothing() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_token(&server).await;
    mount_category(&server, "CUSTOM_05", "Nothing Here", vec![]).await;
    mount_lookup(&server).await;

    let config = create_test_config(&server, &output);
    let mut analyzer = Analyzer::new(&config, credentials(&server), ExportFormat::Xlsx).unwrap();

    let summary = analyzer.run(&["CUSTOM_05".to_string()]).await.unwrap();
    assert_eq!(summary.empty_count(), 1);
    assert!(lookup_request_sizes(&server).await.is_empty());
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_report_files_per_format() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_token(&server).await;
    mount_category(&server, "CUSTOM_01", "Partner Sites", urls("news", 3)).await;
    mount_lookup(&server).await;

    let config = create_test_config(&server, &output);
    let mut analyzer =
        Analyzer::new(&config, credentials(&server), ExportFormat::Markdown).unwrap();
    analyzer.authenticate().await.unwrap();

    let summary = analyzer.run(&["CUSTOM_01".to_string()]).await.unwrap();
    let md_path = output.path().join("partner_sites_category_analysis.md");
    match &summary.outcomes[0] {
        CategoryOutcome::Analyzed { output_path, .. } => assert_eq!(output_path, &md_path),
        other => panic!("Expected an analyzed outcome, got {:?}", other),
    }
    let markdown = fs::read_to_string(&md_path).unwrap();
    assert!(markdown.contains("# Category Coverage: Partner Sites"));
    assert!(markdown.contains("| NEWS_AND_MEDIA | 3 |"));

    analyzer.set_format(ExportFormat::Xlsx);
    analyzer.run(&["CUSTOM_01".to_string()]).await.unwrap();
    let xlsx_path = output.path().join("partner_sites_category_analysis.xlsx");
    let bytes = fs::read(&xlsx_path).unwrap();
    // Workbooks are zip archives
    assert_eq!(&bytes[..2], b"PK");
}
