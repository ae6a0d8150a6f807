//! End-to-end tests over a real socket.
//!
//! Serves the production router on an ephemeral port and talks to it with a
//! real HTTP client, covering the full submission lifecycle.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use intake_testing::{ContactPayload, TestEnv, TEST_SECRET};
use serde_json::{json, Value};
use tokio::{net::TcpListener, task::JoinHandle};

/// Serves `env`'s router on `127.0.0.1:0` and returns the bound address.
async fn spawn_server(env: &TestEnv) -> Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await.context("bind ephemeral port")?;
    let addr = listener.local_addr()?;
    let router = env.router();

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok((addr, handle))
}

#[tokio::test]
async fn contact_submission_lifecycle() -> Result<()> {
    let env = TestEnv::new().await?;
    let (addr, server) = spawn_server(&env).await?;
    let client = reqwest::Client::new();
    let url = format!("http://{addr}/");

    // Fresh database: healthy but not initialized
    let health: Value = client.get(&url).send().await?.json().await?;
    assert_eq!(health["database"], "not initialized");

    // Unauthenticated submission is rejected
    let response = client
        .post(&url)
        .json(&ContactPayload::minimal().build())
        .send()
        .await?;
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

    // Authenticated submission is stored
    let response = client
        .post(&url)
        .header("X-Signature", TEST_SECRET)
        .json(&ContactPayload::minimal().country("NZ").build())
        .send()
        .await?;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let saved: Value = response.json().await?;
    assert_eq!(saved, json!({ "success": true, "message": "Contact saved successfully", "id": 1 }));

    // Health now reflects the row
    let health: Value = client.get(format!("http://{addr}/health")).send().await?.json().await?;
    assert_eq!(health["database"], "connected");
    assert_eq!(health["totalContacts"], 1);
    assert!(health["timestamp"].is_string());

    let record = env.find_contact(intake_core::ContactId(1)).await?.context("row missing")?;
    assert_eq!(record.country.as_deref(), Some("NZ"));
    assert_eq!(record.ip.as_deref(), Some("unknown"));

    server.abort();
    Ok(())
}

#[tokio::test]
async fn unsupported_method_over_the_wire() -> Result<()> {
    let env = TestEnv::new().await?;
    let (addr, server) = spawn_server(&env).await?;

    let response = reqwest::Client::new().put(format!("http://{addr}/")).send().await?;

    assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.text().await?, "Method not allowed");

    server.abort();
    Ok(())
}

#[tokio::test]
async fn concurrent_submissions_get_distinct_ids() -> Result<()> {
    let env = TestEnv::new().await?;
    let (addr, server) = spawn_server(&env).await?;
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        let url = format!("http://{addr}/");
        tasks.push(tokio::spawn(async move {
            let response = client
                .post(url)
                .header("X-Signature", TEST_SECRET)
                .json(&ContactPayload::with_defaults().build())
                .send()
                .await?;
            let body: Value = response.json().await?;
            anyhow::Ok(body["id"].as_i64().context("id missing")?)
        }));
    }

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await??);
    }
    ids.sort_unstable();

    assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    assert_eq!(env.contact_count().await?, 8);

    server.abort();
    Ok(())
}
