//! Integration tests driving the real HTTP client against a stub tile server.
//!
//! Run with: `cargo test --test stub_server`

use std::collections::HashSet;
use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use xyz_primer::config::{PrimerConfig, RawConfig};
use xyz_primer::coordinator::Primer;
use xyz_primer::stats::RunStats;

// ============================================================================
// Helper Functions
// ============================================================================

/// Stub that answers 200 for any GET.
async fn mount_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 16]))
        .mount(server)
        .await;
}

/// Force a single tile path to answer 500. Takes precedence over `mount_ok`.
async fn mount_failure(server: &MockServer, tile_path: &str) {
    Mock::given(method("GET"))
        .and(path(tile_path))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(server)
        .await;
}

fn raw_config(server: &MockServer, zoom: i64, concurrency: i64) -> RawConfig {
    RawConfig {
        url: format!("{}/{{z}}/{{x}}/{{y}}.png", server.uri()),
        zoom,
        concurrency,
        headers: Vec::new(),
        timeout_secs: Some(10),
    }
}

/// Run the primer on a blocking thread; reqwest's blocking client must not
/// run on the async runtime.
async fn prime(config: PrimerConfig) -> RunStats {
    tokio::task::spawn_blocking(move || Primer::new(&config)?.run())
        .await
        .expect("primer thread panicked")
        .expect("priming failed")
}

async fn received_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .into_iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

// ============================================================================
// Integration Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_zoom_two_primes_all_tiles() {
    let server = MockServer::start().await;
    mount_ok(&server).await;
    let config = PrimerConfig::from_raw(raw_config(&server, 2, 4)).unwrap();

    let run = prime(config).await;

    assert_eq!(run.attempted, 21);
    assert_eq!(run.primed(), 21);
    assert!(run.to_string().starts_with("Primed zoom levels 0-2. [21/21 tiles]"));

    let paths = received_paths(&server).await;
    let distinct: HashSet<_> = paths.iter().cloned().collect();
    assert_eq!(paths.len(), 21);
    assert_eq!(distinct.len(), 21);
    assert!(distinct.contains("/0/0/0.png"));
    assert!(distinct.contains("/2/3/3.png"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_forced_failures_reported_for_their_level() {
    let server = MockServer::start().await;
    for tile_path in ["/2/0/0.png", "/2/1/3.png", "/2/3/2.png"] {
        mount_failure(&server, tile_path).await;
    }
    mount_ok(&server).await;
    let config = PrimerConfig::from_raw(raw_config(&server, 2, 3)).unwrap();

    let run = prime(config).await;

    let failures: Vec<_> = run.levels.iter().map(|level| level.failed).collect();
    assert_eq!(failures, vec![0, 0, 3]);
    assert_eq!(
        run.levels[2].failure_line().as_deref(),
        Some("3 tiles failed to prime in zoom level 2")
    );
    assert!(run.levels[2].to_string().contains("[13/16 tiles]"));
    assert_eq!(run.primed(), 18);
    assert_eq!(run.attempted, 21);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_no_duplicates_or_drops_across_concurrency() {
    for concurrency in [1, 5, 16] {
        let server = MockServer::start().await;
        mount_ok(&server).await;
        let config = PrimerConfig::from_raw(raw_config(&server, 2, concurrency)).unwrap();

        let run = prime(config).await;

        let paths = received_paths(&server).await;
        let level_two: HashSet<_> = paths.iter().filter(|p| p.starts_with("/2/")).collect();
        assert_eq!(run.levels[2].attempted, 16, "cc={}", concurrency);
        assert_eq!(level_two.len(), 16, "cc={}", concurrency);
        assert_eq!(paths.len(), 21, "cc={}", concurrency);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_static_headers_sent_with_every_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-api-key", "secret"))
        .and(header("referer", "priming"))
        .respond_with(ResponseTemplate::new(200))
        .expect(5)
        .mount(&server)
        .await;
    let mut raw = raw_config(&server, 1, 2);
    raw.headers = vec!["X-Api-Key:secret".to_string(), "Referer: priming".to_string()];
    let config = PrimerConfig::from_raw(raw).unwrap();

    let run = prime(config).await;

    assert_eq!(run.primed(), 5);
    server.verify().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_200_success_codes_count_as_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    let config = PrimerConfig::from_raw(raw_config(&server, 1, 2)).unwrap();

    let run = prime(config).await;

    assert_eq!(run.attempted, 5);
    assert_eq!(run.failed, 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_request_timeout_is_a_tile_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;
    let mut raw = raw_config(&server, 0, 1);
    raw.timeout_secs = Some(1);
    let config = PrimerConfig::from_raw(raw).unwrap();

    let run = prime(config).await;

    assert_eq!(run.attempted, 1);
    assert_eq!(run.failed, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_server_fails_tiles_without_aborting() {
    // Bind then drop a listener so the port is very likely closed.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let config = PrimerConfig::from_raw(RawConfig {
        url: format!("http://127.0.0.1:{}/{{z}}/{{x}}/{{y}}.png", port),
        zoom: 1,
        concurrency: 2,
        headers: Vec::new(),
        timeout_secs: Some(5),
    })
    .unwrap();

    let run = prime(config).await;

    assert_eq!(run.attempted, 5);
    assert_eq!(run.failed, 5);
    assert_eq!(run.levels.len(), 2);
}
