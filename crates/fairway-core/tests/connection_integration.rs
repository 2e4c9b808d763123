//! End-to-end calls through the real connection manager against a
//! loopback HTTP stub.

mod test_support;

use std::sync::Arc;
use std::time::Duration;

use fairway_core::{
    health_check, ConnectionManager, ErrorKind, HealthStatus, Identifier, RequestExecutor,
    RequestSpec, TimeoutConfig, VERSION,
};
use serde_json::{json, Value};
use test_support::{short_timeouts, test_config, StubResponse, StubServer, API_KEY, WIDE_ID};

fn executor_for(server: &StubServer, timeouts: TimeoutConfig) -> RequestExecutor {
    let mut config = test_config(&server.base_url());
    config.timeouts = timeouts;
    RequestExecutor::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_get_round_trip() {
    let body = format!(r#"{{"events": [{{"event": {{"id": {}, "name": "Member-Guest"}}}}]}}"#, WIDE_ID);
    let server = StubServer::start(vec![StubResponse::json(200, &body)]).await;
    let executor = executor_for(&server, TimeoutConfig::default());

    let spec = RequestSpec::get("/events")
        .query("season_id", Identifier::from(3))
        .build();
    let result = executor.call(&spec).await;

    let json = result.body().and_then(|b| b.as_json()).unwrap();
    assert_eq!(json["events"][0]["event"]["id"], json!(WIDE_ID));

    let served = server.served();
    assert_eq!(served.len(), 1);
    assert_eq!(served[0].method, "GET");
    assert_eq!(served[0].target, format!("/api_v2/{}/events?season_id=3", API_KEY));
    assert_eq!(served[0].header("authorization"), None);
}

#[tokio::test]
async fn test_put_sends_bearer_and_string_identifiers() {
    let server = StubServer::start(vec![StubResponse::json(200, r#"{"event": {"id": 5}}"#)]).await;
    let executor = executor_for(&server, TimeoutConfig::default());

    let spec = RequestSpec::put("/events/{event_id}")
        .path_param("event_id", Identifier::from(5))
        .body(json!({"name": "Club Championship", "season_id": 42}))
        .build();
    assert!(executor.call(&spec).await.is_success());

    let served = server.served();
    assert_eq!(served[0].method, "PUT");
    assert_eq!(served[0].target, "/api_v2/events/5");
    let bearer = format!("Bearer {}", API_KEY);
    assert_eq!(served[0].header("authorization"), Some(bearer.as_str()));
    assert!(served[0]
        .header("content-type")
        .is_some_and(|value| value.starts_with("application/json")));

    let sent: Value = serde_json::from_str(&served[0].body).unwrap();
    assert_eq!(sent, json!({"name": "Club Championship", "season_id": "42"}));
}

#[tokio::test]
async fn test_server_errors_then_recovery() {
    let server = StubServer::start(vec![
        StubResponse::json(503, ""),
        StubResponse::json(429, "").with_header("Retry-After", "0"),
        StubResponse::json(204, ""),
    ])
    .await;
    let executor = executor_for(&server, TimeoutConfig::default());

    let spec = RequestSpec::delete("/events/{event_id}")
        .path_param("event_id", Identifier::from(8))
        .build();
    let (result, trace) = executor.call_traced(&spec).await;

    assert!(result.is_success());
    assert_eq!(result.body().and_then(|b| b.as_json()), Some(&Value::Null));
    assert_eq!(trace.attempt_count(), 3);
    assert_eq!(trace.delays()[1], Duration::ZERO);
    assert_eq!(server.served().len(), 3);
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let server = StubServer::silent().await;
    let executor = executor_for(&server, short_timeouts());

    let (result, trace) = executor.call_traced(&RequestSpec::get("/seasons").build()).await;
    let error = result.error().unwrap();
    assert_eq!(error.kind, ErrorKind::TimeoutError);
    assert_eq!(error.message, "Request timed out. Please try again.");
    assert_eq!(trace.attempt_count(), 3);
}

#[tokio::test]
async fn test_refused_connection_is_connection_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = test_config(&format!("http://{}/api_v2", addr));
    let executor = RequestExecutor::from_config(&config).unwrap();

    let result = executor.call(&RequestSpec::get("/seasons").build()).await;
    let error = result.error().unwrap();
    assert_eq!(error.kind, ErrorKind::ConnectionError);
    assert!(!error.message.contains(API_KEY));
}

#[tokio::test]
async fn test_health_check_reports_states() {
    let server = StubServer::start(vec![
        StubResponse::json(200, r#"{"seasons": []}"#),
        StubResponse::json(401, r#"{"error": "Invalid API key"}"#),
    ])
    .await;
    let executor = executor_for(&server, TimeoutConfig::default());

    let healthy = health_check(&executor).await;
    assert_eq!(healthy.status, HealthStatus::Ok);
    assert!(healthy.reachable);
    assert_eq!(healthy.authenticated, Some(true));
    assert_eq!(healthy.version, VERSION);

    let rejected = health_check(&executor).await;
    assert_eq!(rejected.status, HealthStatus::AuthError);
    assert!(rejected.reachable);
    assert_eq!(rejected.authenticated, Some(false));
    assert_eq!(served_paths(&server), vec![
        format!("/api_v2/{}/seasons", API_KEY),
        format!("/api_v2/{}/seasons", API_KEY),
    ]);
}

#[tokio::test]
async fn test_health_check_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let executor = RequestExecutor::from_config(&test_config(&format!("http://{}/api_v2", addr))).unwrap();
    let report = health_check(&executor).await;
    assert_eq!(report.status, HealthStatus::Error);
    assert!(!report.reachable);
    assert_eq!(report.authenticated, None);
}

#[tokio::test]
async fn test_one_pool_serves_concurrent_calls() {
    let responses = (0..6).map(|_| StubResponse::json(200, "[]")).collect();
    let server = StubServer::start(responses).await;

    let mut config = test_config(&server.base_url());
    config.pool_max_idle_per_host = 2;
    let transport = Arc::new(ConnectionManager::new(config.timeouts.clone(), config.pool_max_idle_per_host).unwrap());
    let executor = Arc::new(RequestExecutor::new(transport, &config).unwrap());

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let executor = executor.clone();
            tokio::spawn(async move { executor.call(&RequestSpec::get("/seasons").build()).await })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().is_success());
    }
    assert_eq!(server.served().len(), 6);
}

fn served_paths(server: &StubServer) -> Vec<String> {
    server.served().into_iter().map(|request| request.target).collect()
}
