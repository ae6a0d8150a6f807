//! Request builders and response capture.

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, Response, StatusCode},
};
use bytes::Bytes;
use serde_json::Value;

/// Builds a `GET` request for `path`.
pub fn get(path: &str) -> Request<Body> {
    request(Method::GET, path)
}

/// Builds an empty request with an arbitrary method.
pub fn request(method: Method, path: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap_or_else(|e| panic!("invalid test request: {e}"))
}

/// Builds a JSON `POST /` with an optional `X-Signature` header.
pub fn post_json(body: &Value, signature: Option<&str>) -> Request<Body> {
    post_raw(body.to_string(), signature)
}

/// Builds a `POST /` with a raw body and an optional `X-Signature` header.
pub fn post_raw(body: impl Into<Body>, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/")
        .header("content-type", "application/json");

    if let Some(signature) = signature {
        builder = builder.header("X-Signature", signature);
    }

    builder.body(body.into()).unwrap_or_else(|e| panic!("invalid test request: {e}"))
}

/// Fully buffered response.
#[derive(Debug)]
pub struct TestResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

impl TestResponse {
    /// Buffers an axum response.
    pub async fn from_response(response: Response<Body>) -> Result<Self> {
        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .context("Failed to read response body")?;

        Ok(Self { status: parts.status, headers: parts.headers, body })
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.body).context("Response body is not UTF-8")
    }

    /// Body parsed as JSON.
    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body).context("Response body is not JSON")
    }

    /// Content type header, or empty when absent.
    pub fn content_type(&self) -> &str {
        self.headers.get("content-type").and_then(|v| v.to_str().ok()).unwrap_or_default()
    }
}
