//! Health check endpoint tests.
//!
//! `GET` on any path reports worker health and never fails, even when the
//! contacts table has not been created yet.

use std::time::Duration;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use intake_api::config::DEFAULT_WORKER_NAME;
use intake_testing::{http, TestEnv};

#[tokio::test]
async fn health_check_reports_not_initialized_without_table() {
    let env = TestEnv::new().await.expect("failed to create test environment");

    let response = env.send(http::get("/")).await.expect("request should complete");

    assert_eq!(response.status, StatusCode::OK);
    insta::assert_snapshot!(response.text().unwrap(), @r#"{"status":"healthy","worker":"talktech-contact-webhook","database":"not initialized","message":"Run database migrations first"}"#);
}

#[tokio::test]
async fn health_check_counts_existing_contacts() {
    let env = TestEnv::new().await.expect("failed to create test environment");
    env.seed_contacts(3).await.expect("seed contacts");

    let response = env.send(http::get("/")).await.expect("request should complete");
    let body = response.json().unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["worker"], DEFAULT_WORKER_NAME);
    assert_eq!(body["database"], "connected");
    assert_eq!(body["totalContacts"], 3);
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn health_check_reports_zero_for_empty_table() {
    let env = TestEnv::new().await.expect("failed to create test environment");
    env.init_schema().await.expect("create table");

    let response = env.send(http::get("/")).await.expect("request should complete");
    let body = response.json().unwrap();

    assert_eq!(body["database"], "connected");
    assert_eq!(body["totalContacts"], 0);
}

#[tokio::test]
async fn health_check_timestamp_comes_from_clock() {
    let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let mut env = TestEnv::new().await.expect("failed to create test environment");
    env.clock = intake_testing::TestClock::at(start);
    env.init_schema().await.expect("create table");
    env.clock.advance(Duration::from_millis(1_250));

    let response = env.send(http::get("/status")).await.expect("request should complete");
    let body = response.json().unwrap();

    assert_eq!(body["timestamp"], "2023-11-14T22:13:21.250Z");
}

#[tokio::test]
async fn health_check_ignores_path_and_secret() {
    let env = TestEnv::without_secret().await.expect("failed to create test environment");

    for path in ["/", "/health", "/some/deep/path?x=1"] {
        let response = env.send(http::get(path)).await.expect("request should complete");

        assert_eq!(response.status, StatusCode::OK, "GET {path}");
        assert_eq!(response.json().unwrap()["status"], "healthy");
    }
}

#[tokio::test]
async fn health_check_reports_configured_worker_name() {
    let env = TestEnv::new()
        .await
        .expect("failed to create test environment")
        .with_settings(|mut s| {
            s.worker_name = "contact-webhook-eu".to_string();
            s
        });

    let response = env.send(http::get("/")).await.expect("request should complete");

    assert_eq!(response.json().unwrap()["worker"], "contact-webhook-eu");
}

#[tokio::test]
async fn health_check_handles_concurrent_requests() {
    let env = TestEnv::new().await.expect("failed to create test environment");
    env.seed_contacts(2).await.expect("seed contacts");

    let requests = (0..10).map(|_| env.send(http::get("/")));
    let responses = futures::future::join_all(requests).await;

    for response in responses {
        let response = response.expect("request should complete");
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json().unwrap()["totalContacts"], 2);
    }
}

#[tokio::test]
async fn responses_carry_request_id() {
    let env = TestEnv::new().await.expect("failed to create test environment");

    let response = env.send(http::get("/")).await.expect("request should complete");

    let request_id = response.headers.get("x-request-id").expect("request id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn caller_request_id_is_echoed() {
    let env = TestEnv::new().await.expect("failed to create test environment");
    let mut request = http::get("/");
    request.headers_mut().insert("x-request-id", "upstream-7f3a".parse().unwrap());

    let response = env.send(request).await.expect("request should complete");

    assert_eq!(response.headers["x-request-id"], "upstream-7f3a");
}
