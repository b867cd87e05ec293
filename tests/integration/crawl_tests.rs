//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run whole jobs
//! through the real HTTP fetcher.

use std::time::{Duration, Instant};
use sumi_gather::config::{Config, UserAgentConfig};
use sumi_gather::crawler::gather;
use sumi_gather::{CrawlJob, ExtractMode, FetchError, GatherError, JobOptions, TaskOutcome};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HELLO_PAGE: &str = "<html><body>Hello <script>bad()</script>World</body></html>";

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

fn options(retry_limit: u32, timeout_ms: u64) -> JobOptions {
    JobOptions {
        retry_limit,
        timeout_ms,
        ..JobOptions::default()
    }
}

#[tokio::test]
async fn test_example_job_aggregates_in_input_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // The first URL answers last
    mount_page(
        &mock_server,
        "/a",
        html(HELLO_PAGE).set_delay(Duration::from_millis(300)),
    )
    .await;
    mount_page(&mock_server, "/b", html(HELLO_PAGE)).await;
    mount_page(
        &mock_server,
        "/c",
        html("<html><body><p>Third &amp; last</p></body></html>"),
    )
    .await;

    let url_list = format!("{0}/a\n{0}/b\n\n   \n{0}/c\n", base_url);
    let job = CrawlJob::from_url_list(&url_list, JobOptions::default()).expect("valid job");
    assert_eq!(job.len(), 3);

    let result = gather(job, &Config::default()).await.expect("job runs");

    assert_eq!(result.content(), "Hello WorldHello WorldThird & last");
    assert_eq!(result.reports().len(), 3);
    assert!(result.reports().iter().all(|r| r.attempts == 1));
}

#[tokio::test]
async fn test_timeout_retried_then_omitted() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html(HELLO_PAGE).set_delay(Duration::from_secs(5)))
        .expect(3)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/fast", html(HELLO_PAGE)).await;

    let job = CrawlJob::new(
        [format!("{}/slow", base_url), format!("{}/fast", base_url)],
        options(2, 200),
    )
    .unwrap();

    let result = gather(job, &Config::default()).await.unwrap();

    assert_eq!(result.content(), "Hello World");
    let slow = &result.reports()[0];
    assert_eq!(slow.attempts, 3);
    assert!(matches!(
        slow.outcome,
        TaskOutcome::Failed(FetchError::Timeout {
            timeout_ms: 200,
            ..
        })
    ));

    mock_server.verify().await;
}

#[tokio::test]
async fn test_http_errors_retried_retry_limit_plus_one_times() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&mock_server)
        .await;

    let job = CrawlJob::new(
        [format!("{}/broken", base_url), format!("{}/gone", base_url)],
        options(1, 2000),
    )
    .unwrap();

    let result = gather(job, &Config::default()).await.unwrap();

    assert_eq!(result.content(), "");
    assert!(matches!(
        result.reports()[0].outcome,
        TaskOutcome::Failed(FetchError::HttpStatus { status: 500, .. })
    ));
    assert!(matches!(
        result.reports()[1].outcome,
        TaskOutcome::Failed(FetchError::HttpStatus { status: 404, .. })
    ));

    let stats = result.statistics();
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.total_attempts, 4);

    mock_server.verify().await;
}

#[tokio::test]
async fn test_missing_selector_falls_back_to_body() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(
            r#"<html><head><title>Page</title><style>p{color:red}</style></head>
            <body><nav>Menu</nav><p style="x" onclick="y()">Body   text</p><!-- note --></body></html>"#,
        ),
    )
    .await;

    let mut job_options = JobOptions::default();
    job_options.selector = ".missing".to_string();
    let job = CrawlJob::new([format!("{}/", base_url)], job_options).unwrap();

    let result = gather(job, &Config::default()).await.unwrap();

    assert_eq!(result.content(), "Body text");
}

#[tokio::test]
async fn test_selector_and_html_mode() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/article",
        html(
            r#"<html><body><div class="ad">Buy now</div>
            <article><h1>Title</h1> <a href="/next" onmouseover="x()">Next &raquo;</a></article></body></html>"#,
        ),
    )
    .await;

    let url = format!("{}/article", base_url);

    let text_job = CrawlJob::new(
        [&url],
        JobOptions {
            selector: "article".to_string(),
            ..JobOptions::default()
        },
    )
    .unwrap();
    let text = gather(text_job, &Config::default()).await.unwrap();
    assert_eq!(text.content(), "Title Next »");

    let html_job = CrawlJob::new(
        [&url],
        JobOptions {
            selector: "article".to_string(),
            extract_mode: ExtractMode::Html,
            ..JobOptions::default()
        },
    )
    .unwrap();
    let markup = gather(html_job, &Config::default()).await.unwrap();
    assert_eq!(markup.content(), "<h1>Title</h1> <a>Next »</a>");
}

#[tokio::test]
async fn test_duplicate_urls_fetched_independently() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/dup"))
        .respond_with(html("<body>twice</body>"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let url = format!("{}/dup", base_url);
    let job = CrawlJob::new([&url, &url], JobOptions::default()).unwrap();

    let result = gather(job, &Config::default()).await.unwrap();

    assert_eq!(result.content(), "twicetwice");
    mock_server.verify().await;
}

#[tokio::test]
async fn test_rate_limit_spreads_requests() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/r", html("<body>r</body>")).await;

    let urls: Vec<String> = (0..4).map(|_| format!("{}/r", base_url)).collect();
    let job = CrawlJob::new(
        &urls,
        JobOptions {
            rate_limit_ms: 150,
            ..JobOptions::default()
        },
    )
    .unwrap();

    let started = Instant::now();
    let result = gather(job, &Config::default()).await.unwrap();

    assert_eq!(result.content(), "rrrr");
    // Four starts need at least three gaps
    assert!(started.elapsed() >= Duration::from_millis(450));
}

#[tokio::test]
async fn test_user_agent_header_sent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    };

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(html("<body>identified</body>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = Config {
        user_agent,
        ..Config::default()
    };
    let job = CrawlJob::new([format!("{}/", base_url)], JobOptions::default()).unwrap();

    let result = gather(job, &config).await.unwrap();

    assert_eq!(result.content(), "identified");
    mock_server.verify().await;
}

#[tokio::test]
async fn test_unreachable_and_invalid_urls_do_not_fail_job() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/ok", html(HELLO_PAGE)).await;

    let job = CrawlJob::new(
        [
            "not a url".to_string(),
            "http://127.0.0.1:1/".to_string(),
            format!("{}/ok", base_url),
        ],
        options(0, 2000),
    )
    .unwrap();

    let result = gather(job, &Config::default()).await.unwrap();

    assert_eq!(result.content(), "Hello World");
    assert!(matches!(
        result.reports()[0].outcome,
        TaskOutcome::Failed(FetchError::InvalidUrl { .. })
    ));
    assert!(matches!(
        result.reports()[1].outcome,
        TaskOutcome::Failed(FetchError::Network { .. })
    ));
}

#[test]
fn test_blank_url_list_is_job_error() {
    let result = CrawlJob::from_url_list("\n  \n\t", JobOptions::default());
    assert!(matches!(result, Err(GatherError::EmptyJob)));
}
