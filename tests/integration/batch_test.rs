//! End-to-end batch runs over real HTTP.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use sparql_batch::error::BatchError;
use sparql_batch::query::{BatchExecutor, BatchStatus, QueryQueue};
use sparql_batch::report::{JsonReporter, TextReporter};
use sparql_batch::transport::HttpTransport;

use super::common::{Reply, TestServer};

fn durations(out: &str) -> Vec<u128> {
    out.lines()
        .filter_map(|line| line.strip_prefix("Duration in millis: "))
        .map(|ms| ms.parse().unwrap())
        .collect()
}

/// Scenario: Both queries succeed
/// Given an endpoint answering 200/json twice
/// When the batch ["Q1", "Q2"] runs
/// Then two summaries and two durations are printed, Q1 before Q2
#[tokio::test]
async fn test_two_queries_succeed_in_order() {
    let server = TestServer::start([Reply::items(5), Reply::items(8)]).await;
    let endpoint = server.endpoint();
    let transport = HttpTransport::new().unwrap();
    let queue: QueryQueue = ["Q1", "Q2"].into_iter().collect();
    let mut reporter = TextReporter::new(Vec::new(), Vec::new()).with_body(false);

    let status = BatchExecutor::new(&transport, &endpoint)
        .run(&queue, &mut reporter)
        .await
        .unwrap();

    assert!(status.is_completed());
    assert_eq!(status.completed(), 2);
    assert_eq!(server.received(), vec!["Q1", "Q2"]);

    let (out, _) = reporter.into_inner();
    let out = String::from_utf8(out).unwrap();
    let summaries: Vec<&str> = out
        .split("++++++++++\n")
        .filter(|block| !block.is_empty())
        .map(|block| block.lines().next().unwrap())
        .collect();
    assert_eq!(summaries, vec!["5", "8"]);
    assert_eq!(durations(&out).len(), 2);
}

/// Scenario: First query fails with 500
/// Given an endpoint answering 500 for the first request
/// When the batch ["Q1", "Q2"] runs
/// Then exactly one error is reported and Q2 is never sent
#[tokio::test]
async fn test_server_error_halts_batch() {
    let server = TestServer::start([
        Reply::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "text/plain",
            "triplestore unavailable",
        ),
        Reply::items(1),
    ])
    .await;
    let endpoint = server.endpoint();
    let transport = HttpTransport::new().unwrap();
    let queue: QueryQueue = ["Q1", "Q2"].into_iter().collect();
    let mut reporter = TextReporter::new(Vec::new(), Vec::new());

    let status = BatchExecutor::new(&transport, &endpoint)
        .run(&queue, &mut reporter)
        .await
        .unwrap();

    assert!(matches!(
        status,
        BatchStatus::Halted {
            index: 0,
            completed: 0,
            error: BatchError::Classification(_),
        }
    ));
    assert_eq!(server.received(), vec!["Q1"]);

    let (out, err) = reporter.into_inner();
    let out = String::from_utf8(out).unwrap();
    let err = String::from_utf8(err).unwrap();
    assert_eq!(out, "triplestore unavailable\n");
    assert_eq!(err.matches("unexpected status code: 500").count(), 1);
    assert!(durations(&out).is_empty());
}

/// Scenario: Endpoint answers with HTML
/// Given a 200 response with text/html
/// When the batch runs
/// Then it halts on the content type
#[tokio::test]
async fn test_html_response_halts_batch() {
    let server = TestServer::start([
        Reply::new(StatusCode::OK, "text/html", "<html></html>"),
        Reply::items(1),
    ])
    .await;
    let endpoint = server.endpoint();
    let transport = HttpTransport::new().unwrap();
    let queue: QueryQueue = ["Q1", "Q2"].into_iter().collect();
    let mut reporter = TextReporter::new(Vec::new(), Vec::new());

    let status = BatchExecutor::new(&transport, &endpoint)
        .run(&queue, &mut reporter)
        .await
        .unwrap();

    assert!(!status.is_completed());
    assert_eq!(server.received().len(), 1);
    let (_, err) = reporter.into_inner();
    assert!(String::from_utf8(err).unwrap().contains("text/html"));
}

/// Scenario: Body is not JSON
/// Given a 200/json response whose body does not parse
/// When the batch runs
/// Then it halts with a parse error before the next query
#[tokio::test]
async fn test_malformed_json_halts_batch() {
    let server = TestServer::start([
        Reply::json("{\"schema:numberOfItems\":"),
        Reply::items(1),
    ])
    .await;
    let endpoint = server.endpoint();
    let transport = HttpTransport::new().unwrap();
    let queue: QueryQueue = ["Q1", "Q2"].into_iter().collect();
    let mut reporter = TextReporter::new(Vec::new(), Vec::new());

    let status = BatchExecutor::new(&transport, &endpoint)
        .run(&queue, &mut reporter)
        .await
        .unwrap();

    assert!(matches!(
        status,
        BatchStatus::Halted {
            error: BatchError::Parse(_),
            ..
        }
    ));
    assert_eq!(server.received(), vec!["Q1"]);
}

/// Scenario: JSON-lines output
/// Given two successful queries and one failure
/// When the batch runs with the JSON reporter
/// Then every line is an event and the last one reports the halt
#[tokio::test]
async fn test_json_report_events() {
    let server = TestServer::start([
        Reply::items(2),
        Reply::items(3),
        Reply::new(StatusCode::NOT_FOUND, "application/json", "{}"),
    ])
    .await;
    let endpoint = server.endpoint();
    let transport = HttpTransport::new().unwrap();
    let queue: QueryQueue = ["Q1", "Q2", "Q3", "Q4"].into_iter().collect();
    let mut reporter = JsonReporter::new(Vec::new());

    BatchExecutor::new(&transport, &endpoint)
        .run(&queue, &mut reporter)
        .await
        .unwrap();

    let out = String::from_utf8(reporter.into_inner()).unwrap();
    let events: Vec<Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let kinds: Vec<&str> = events
        .iter()
        .map(|e| e["event"].as_str().unwrap())
        .collect();

    assert_eq!(kinds, vec!["succeeded", "succeeded", "failed", "finished"]);
    assert_eq!(events[1]["summary"], 3);
    assert_eq!(events[2]["category"], "Classification Error");
    assert_eq!(events[3]["status"], "halted");
    assert_eq!(events[3]["completed"], 2);
    assert_eq!(events[3]["halted_at"], 2);
    assert_eq!(server.received().len(), 3);
}

/// Scenario: Nothing listening
/// Given a port with no server
/// When the batch runs
/// Then it halts with a transport error
#[tokio::test]
async fn test_unreachable_endpoint_halts_batch() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let endpoint = sparql_batch::endpoint::Endpoint::new("127.0.0.1", port, "v2/searchextended")
        .unwrap();
    let transport = HttpTransport::new().unwrap();
    let queue: QueryQueue = ["Q1", "Q2"].into_iter().collect();
    let mut reporter = TextReporter::new(Vec::new(), Vec::new());

    let status = BatchExecutor::new(&transport, &endpoint)
        .run(&queue, &mut reporter)
        .await
        .unwrap();

    assert!(matches!(
        status,
        BatchStatus::Halted {
            index: 0,
            error: BatchError::Transport(_),
            ..
        }
    ));
}
