//! End-to-end scrape tests against a mock Artifactory instance.

use artifactory_exporter::client::{Client, Credentials};
use artifactory_exporter::collector::StorageCollector;
use artifactory_exporter::error::Error;
use artifactory_exporter::metrics::{MetricKind, Observation, ScrapeMetrics, parse_failure_counter};
use artifactory_exporter::server;
use core::net::SocketAddr;
use core::time::Duration;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

const STORAGE_INFO_BODY: &str = r#"{
    "binariesSummary": {"binariesCount": "1"},
    "storageSummary": {
        "binariesSummary": {
            "binariesCount": "125,876",
            "binariesSize": "3.33 GB",
            "artifactsSize": "4.07 GB",
            "optimization": "81.94%",
            "itemsCount": "225,678",
            "artifactsCount": "113,556"
        },
        "fileStoreSummary": {
            "storageType": "file-system",
            "storageDirectory": "/var/opt/jfrog/artifactory/data/filestore",
            "totalSpace": "49.98 GB",
            "usedSpace": "3.64 GB",
            "freeSpace": "46.34 GB"
        },
        "repositoriesSummaryList": [
            {"repoKey": "repo-a", "repoType": "LOCAL", "foldersCount": 3, "filesCount": 7,
             "usedSpace": "2 GB", "itemsCount": 10, "packageType": "Maven", "percentage": "10.5%"},
            {"repoKey": "TOTAL", "repoType": "NA", "foldersCount": 3, "filesCount": 7,
             "usedSpace": "2 GB", "itemsCount": 10, "packageType": "NA", "percentage": "100%"}
        ]
    }
}"#;

async fn mock_artifactory(body: &str, status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/storageinfo"))
        .respond_with(ResponseTemplate::new(status).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;
    server
}

fn collector_for(server: &MockServer, credentials: Credentials) -> (StorageCollector, prometheus::IntCounter) {
    let client = Client::new(
        Url::parse(&server.uri()).expect("mock server URI must parse"),
        credentials,
        true,
        Duration::from_secs(5),
    )
    .expect("client must build");
    let failures = parse_failure_counter().expect("counter must build");
    (StorageCollector::new(client, failures.clone()), failures)
}

#[tokio::test]
async fn scrape_emits_all_storage_gauges() {
    let server = mock_artifactory(STORAGE_INFO_BODY, 200).await;
    let (collector, failures) = collector_for(&server, Credentials::Anonymous);

    let mut sink: Vec<Observation> = Vec::new();
    collector.collect(&mut sink).await.expect("scrape must succeed");

    // 6 aggregate scalars + 3 filestore gauges + 5 gauges for the one real
    // repository; the TOTAL row is excluded.
    assert_eq!(sink.len(), 14);
    assert_eq!(failures.get(), 0);

    let find = |kind: MetricKind| {
        sink.iter()
            .find(|o| o.kind == kind)
            .unwrap_or_else(|| panic!("missing {kind:?}"))
    };

    assert_eq!(find(MetricKind::BinariesCount).value, 125_876.0);
    assert_eq!(find(MetricKind::ArtifactsSize).value, 4.07 * GIB);
    assert_eq!(find(MetricKind::Optimization).value, 81.94);

    let filestore = find(MetricKind::FilestoreTotal);
    assert_eq!(filestore.value, 49.98 * GIB);
    assert_eq!(filestore.labels, ["file-system", "/var/opt/jfrog/artifactory/data/filestore"]);

    let repo_obs: Vec<_> = sink
        .iter()
        .filter(|o| o.kind.descriptor().name.starts_with("artifactory_storage_repo_"))
        .collect();
    assert_eq!(repo_obs.len(), 5);
    for obs in &repo_obs {
        assert_eq!(obs.labels, ["repo-a", "local", "maven"]);
    }
    assert_eq!(find(MetricKind::RepoUsedSpace).value, 2.0 * GIB);
    assert_eq!(find(MetricKind::RepoPercentage).value, 10.5);
}

#[tokio::test]
async fn malformed_json_aborts_and_counts() {
    let server = mock_artifactory("{not json", 200).await;
    let (collector, failures) = collector_for(&server, Credentials::Anonymous);

    let mut sink: Vec<Observation> = Vec::new();
    let result = collector.collect(&mut sink).await;

    assert!(matches!(result, Err(Error::Deserialize(_))));
    assert!(sink.is_empty());
    assert_eq!(failures.get(), 1);
}

#[tokio::test]
async fn http_failure_does_not_touch_the_parse_counter() {
    let server = mock_artifactory("busy", 503).await;
    let (collector, failures) = collector_for(&server, Credentials::Anonymous);

    let mut sink: Vec<Observation> = Vec::new();
    let result = collector.collect(&mut sink).await;

    assert!(matches!(result, Err(Error::Status { status, .. }) if status.as_u16() == 503));
    assert!(sink.is_empty());
    assert_eq!(failures.get(), 0);
}

#[tokio::test]
async fn bad_repository_row_keeps_scalars_and_drops_all_repositories() {
    let body = STORAGE_INFO_BODY.replace("\"2 GB\"", "\"whoops\"");
    let server = mock_artifactory(&body, 200).await;
    let (collector, failures) = collector_for(&server, Credentials::Anonymous);

    let mut sink: Vec<Observation> = Vec::new();
    collector.collect(&mut sink).await.expect("scalar metrics still succeed");

    // The 9 scalar/filestore gauges survive; every repository gauge is gone.
    assert_eq!(sink.len(), 9);
    assert!(
        sink.iter()
            .all(|o| !o.kind.descriptor().name.starts_with("artifactory_storage_repo_"))
    );
    assert_eq!(failures.get(), 1);
}

#[tokio::test]
async fn basic_credentials_are_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/storageinfo"))
        .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(STORAGE_INFO_BODY, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let (collector, _failures) = collector_for(
        &server,
        Credentials::Basic {
            username: "admin".to_string(),
            password: Some("secret".to_string()),
        },
    );

    let mut sink: Vec<Observation> = Vec::new();
    collector.collect(&mut sink).await.expect("authenticated scrape must succeed");
    assert_eq!(sink.len(), 14);
}

/// Start the exporter against the given mock Artifactory instance on an
/// ephemeral port and return the address it listens on.
async fn spawn_exporter(artifactory: &MockServer, metrics_path: &'static str) -> SocketAddr {
    let (collector, failures) = collector_for(artifactory, Credentials::Anonymous);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port must bind");
    let addr = listener.local_addr().expect("bound listener has an address");
    let _server = tokio::spawn(server::serve_on(listener, metrics_path, collector, failures));
    addr
}

#[tokio::test]
async fn unreachable_artifactory_still_answers_200_with_up_zero() {
    let artifactory = mock_artifactory("busy", 503).await;
    let addr = spawn_exporter(&artifactory, "/metrics").await;

    let response = reqwest::get(format!("http://{addr}/metrics"))
        .await
        .expect("exporter must answer");
    assert_eq!(response.status(), 200);

    // The upstream failure never reached the parse layer, so the counter
    // stays untouched.
    let body = response.text().await.expect("body must be readable");
    assert!(body.contains("artifactory_up 0"));
    assert!(body.contains("artifactory_exporter_json_parse_failures_total 0"));
}

#[tokio::test]
async fn malformed_upstream_json_answers_200_with_up_zero_and_counts() {
    let artifactory = mock_artifactory("{not json", 200).await;
    let addr = spawn_exporter(&artifactory, "/metrics").await;

    let response = reqwest::get(format!("http://{addr}/metrics"))
        .await
        .expect("exporter must answer");
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()[reqwest::header::CONTENT_TYPE], prometheus::TEXT_FORMAT);

    let body = response.text().await.expect("body must be readable");
    assert!(body.contains("artifactory_up 0"));
    assert!(body.contains("artifactory_exporter_json_parse_failures_total 1"));
}

#[tokio::test]
async fn successful_scrape_over_http_exposes_all_gauges() {
    let artifactory = mock_artifactory(STORAGE_INFO_BODY, 200).await;
    let addr = spawn_exporter(&artifactory, "/metrics").await;

    let body = reqwest::get(format!("http://{addr}/metrics"))
        .await
        .expect("exporter must answer")
        .text()
        .await
        .expect("body must be readable");

    assert!(body.contains("artifactory_up 1"));
    assert!(body.contains("artifactory_storage_binaries_count 125876"));
    assert!(body.contains("name=\"repo-a\""));
}

#[tokio::test]
async fn landing_page_links_to_the_configured_metrics_path() {
    let artifactory = mock_artifactory(STORAGE_INFO_BODY, 200).await;
    let addr = spawn_exporter(&artifactory, "/prom").await;

    let body = reqwest::get(format!("http://{addr}/"))
        .await
        .expect("exporter must answer")
        .text()
        .await
        .expect("body must be readable");

    assert!(body.contains("href=\"/prom\""));
}

#[tokio::test]
async fn scrape_snapshot_renders_text_exposition() {
    let server = mock_artifactory(STORAGE_INFO_BODY, 200).await;
    let (collector, failures) = collector_for(&server, Credentials::Anonymous);

    let mut snapshot = ScrapeMetrics::new(&failures).expect("registry must build");
    collector.collect(&mut snapshot).await.expect("scrape must succeed");
    snapshot.set_up(true);

    let text = snapshot.encode().expect("encoding must succeed");
    assert!(text.contains("artifactory_up 1"));
    assert!(text.contains("artifactory_storage_binaries_count 125876"));
    assert!(text.contains("name=\"repo-a\""));
    assert!(text.contains("artifactory_exporter_json_parse_failures_total 0"));
}
