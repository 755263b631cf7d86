//! HTTP mock server helpers for testing outbound HTTP calls.
//!
//! This module provides a thin wrapper around `wiremock` for declarative
//! HTTP stubbing.
//!
//! # Quick Start
//!
//! ```ignore
//! use crate::common::http_mock::MockHttpServer;
//!
//! #[tokio::test]
//! async fn test_external_api_call() {
//!     let server = MockHttpServer::start().await;
//!
//!     server
//!         .expect_get("/devices")
//!         .respond_with_json(json!({"devices": []}))
//!         .mount()
//!         .await;
//!
//!     // Point the client at server.url()
//! }
//! ```
//!
//! # Patterns
//!
//! - **Success response**: `.respond_with_json(value)` or `.respond_with_body(string)`
//! - **Error response**: `.respond_with_status(401)`
//! - **Timeout simulation**: `.respond_with_delay(Duration::from_secs(30))`
//! - **Request verification**: `.expect_times(1)` to assert call count
//! - **Form inspection**: `server.received_forms().await`

#![allow(dead_code)]

use std::time::Duration;

use serde_json::Value;
pub use wiremock::matchers::{header, method, path};
pub use wiremock::MockServer as WiremockServer;
pub use wiremock::{Mock, ResponseTemplate};

/// A running stub server.
pub struct MockHttpServer {
    inner: WiremockServer,
}

impl MockHttpServer {
    pub async fn start() -> Self {
        Self {
            inner: WiremockServer::start().await,
        }
    }

    /// Base URL of the server, e.g. `http://127.0.0.1:53412`.
    pub fn url(&self) -> String {
        self.inner.uri()
    }

    /// The underlying `wiremock` server, for matchers this wrapper lacks.
    pub fn inner(&self) -> &WiremockServer {
        &self.inner
    }

    pub fn expect_get(&self, path: &str) -> Expectation<'_> {
        Expectation::new(self, "GET", path)
    }

    pub fn expect_post(&self, path: &str) -> Expectation<'_> {
        Expectation::new(self, "POST", path)
    }

    /// Check every `expect_times` expectation.
    pub async fn verify(&self) {
        self.inner.verify().await;
    }

    /// Every request the server has seen, oldest first.
    pub async fn received_requests(&self) -> Vec<wiremock::Request> {
        self.inner.received_requests().await.unwrap_or_default()
    }

    /// Bodies of all received requests, decoded as URL-encoded forms.
    pub async fn received_forms(&self) -> Vec<Vec<(String, String)>> {
        self.received_requests()
            .await
            .iter()
            .map(|r| decode_form(&r.body))
            .collect()
    }
}

/// Decode an `application/x-www-form-urlencoded` body into ordered pairs.
pub fn decode_form(body: &[u8]) -> Vec<(String, String)> {
    let text = String::from_utf8_lossy(body);
    text.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(k), decode_component(v))
        })
        .collect()
}

fn decode_component(s: &str) -> String {
    let s = s.replace('+', " ");
    urlencoding::decode(&s)
        .map(|c| c.into_owned())
        .unwrap_or(s)
}

enum StubBody {
    Json(Value),
    Text(String),
}

/// A stub under construction. Nothing is registered until [`Expectation::mount`].
pub struct Expectation<'a> {
    server: &'a MockHttpServer,
    method: &'static str,
    path: String,
    headers: Vec<(String, String)>,
    status: u16,
    body: Option<StubBody>,
    delay: Option<Duration>,
    times: Option<u64>,
}

impl<'a> Expectation<'a> {
    fn new(server: &'a MockHttpServer, method: &'static str, path: &str) -> Self {
        Self {
            server,
            method,
            path: path.to_string(),
            headers: Vec::new(),
            status: 200,
            body: None,
            delay: None,
            times: None,
        }
    }

    /// Only match requests carrying this header value.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn respond_with_json(mut self, value: Value) -> Self {
        self.body = Some(StubBody::Json(value));
        self
    }

    /// Set a JSON body, typically after `respond_with_status`.
    pub fn with_json_response(self, value: Value) -> Self {
        self.respond_with_json(value)
    }

    pub fn respond_with_body(mut self, body: &str) -> Self {
        self.body = Some(StubBody::Text(body.to_string()));
        self
    }

    pub fn respond_with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn respond_with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn expect_times(mut self, times: u64) -> Self {
        self.times = Some(times);
        self
    }

    pub async fn mount(self) {
        let mut template = ResponseTemplate::new(self.status);
        match self.body {
            Some(StubBody::Json(value)) => template = template.set_body_json(value),
            Some(StubBody::Text(text)) => template = template.set_body_string(text),
            None => {}
        }
        if let Some(delay) = self.delay {
            template = template.set_delay(delay);
        }

        let mut mock = Mock::given(method(self.method)).and(path(self.path.as_str()));
        for (name, value) in &self.headers {
            mock = mock.and(header(name.as_str(), value.as_str()));
        }
        let mut mock = mock.respond_with(template);
        if let Some(times) = self.times {
            mock = mock.expect(times);
        }

        mock.mount(&self.server.inner).await;
    }
}
