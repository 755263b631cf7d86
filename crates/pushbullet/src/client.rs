//! Pushbullet API client.
//!
//! The [`PushbulletApi`] trait defines the operations, [`HttpPushbulletClient`]
//! performs them over HTTP, and [`mock::MockPushbulletClient`] stands in for
//! unit tests.
//!
//! # Example
//!
//! ```ignore
//! use pushbullet::{HttpPushbulletClient, PushbulletApi, Target};
//!
//! let client = HttpPushbulletClient::new("my-api-key");
//! let devices = client.devices().await?;
//! client.push_note(Target::Device(devices[0].id), "Hello!", "Hi from Rust").await?;
//! ```

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Request, Response, Url};
use thiserror::Error;

use crate::push::{Push, PushForm};
use crate::types::{Device, DevicesResponse, Target};

/// Base URL of the Pushbullet API.
pub const DEFAULT_BASE_URL: &str = "https://api.pushbullet.com/api";

pub const DEVICES_ENDPOINT: &str = "/devices";
pub const PUSHES_ENDPOINT: &str = "/pushes";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Errors that can occur when calling the Pushbullet API.
#[derive(Debug, Error)]
pub enum PushbulletError {
    /// The HTTP exchange could not complete (DNS, connect, TLS, I/O).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error: {status_text}")]
    Api {
        status: u16,
        status_text: String,
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl PushbulletError {
    /// HTTP status of an [`PushbulletError::Api`] error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Trait for Pushbullet API operations.
///
/// Only [`devices`](PushbulletApi::devices) and [`push`](PushbulletApi::push)
/// need implementing; the typed helpers shape a form and delegate to `push`.
#[async_trait]
pub trait PushbulletApi: Send + Sync {
    /// Fetch owned devices followed by devices shared with the account.
    async fn devices(&self) -> Result<Vec<Device>, PushbulletError>;

    /// Send a form to the pushes endpoint.
    async fn push(&self, target: Target, form: PushForm) -> Result<(), PushbulletError>;

    async fn push_to_all(&self, form: PushForm) -> Result<(), PushbulletError> {
        self.push(Target::AllDevices, form).await
    }

    async fn send(&self, target: Target, push: &Push) -> Result<(), PushbulletError> {
        self.push(target, push.to_form()).await
    }

    async fn push_note(
        &self,
        target: Target,
        title: &str,
        body: &str,
    ) -> Result<(), PushbulletError> {
        let push = Push::Note {
            title: title.to_owned(),
            body: body.to_owned(),
        };
        self.send(target, &push).await
    }

    async fn push_note_to_all(&self, title: &str, body: &str) -> Result<(), PushbulletError> {
        self.push_note(Target::AllDevices, title, body).await
    }

    async fn push_address(
        &self,
        target: Target,
        name: &str,
        address: &str,
    ) -> Result<(), PushbulletError> {
        let push = Push::Address {
            name: name.to_owned(),
            address: address.to_owned(),
        };
        self.send(target, &push).await
    }

    async fn push_address_to_all(&self, name: &str, address: &str) -> Result<(), PushbulletError> {
        self.push_address(Target::AllDevices, name, address).await
    }

    async fn push_list(
        &self,
        target: Target,
        title: &str,
        items: &[String],
    ) -> Result<(), PushbulletError> {
        let push = Push::List {
            title: title.to_owned(),
            items: items.to_vec(),
        };
        self.send(target, &push).await
    }

    async fn push_list_to_all(&self, title: &str, items: &[String]) -> Result<(), PushbulletError> {
        self.push_list(Target::AllDevices, title, items).await
    }

    async fn push_link(
        &self,
        target: Target,
        title: &str,
        url: &str,
    ) -> Result<(), PushbulletError> {
        let push = Push::Link {
            title: title.to_owned(),
            url: url.to_owned(),
        };
        self.send(target, &push).await
    }

    async fn push_link_to_all(&self, title: &str, url: &str) -> Result<(), PushbulletError> {
        self.push_link(Target::AllDevices, title, url).await
    }
}

/// HTTP-based implementation of [`PushbulletApi`].
#[derive(Clone)]
pub struct HttpPushbulletClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl std::fmt::Debug for HttpPushbulletClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPushbulletClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl HttpPushbulletClient {
    /// Create a client for the public Pushbullet API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_key)
    }

    /// Create a client with a caller-supplied `reqwest::Client` (timeouts, proxies).
    pub fn with_client(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: default_base_url(),
            api_key: api_key.into(),
        }
    }

    /// Point the client at a different API root, such as a stub server.
    ///
    /// # Errors
    /// Returns [`PushbulletError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute http(s) URL, or carries a query string or fragment.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, PushbulletError> {
        let invalid = |reason: String| PushbulletError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason,
        };
        let url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_owned()));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("query strings and fragments are not allowed".to_owned()));
        }
        self.base_url = url;
        Ok(self)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build an authenticated request for `endpoint`.
    ///
    /// Without a form this is a bodiless GET; with one it is a form-encoded POST.
    ///
    /// # Panics
    /// Panics if the endpoint cannot be joined onto the base URL, which is
    /// validated at construction.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn build_request(&self, endpoint: &str, form: Option<&PushForm>) -> Request {
        let url = Url::parse(&format!(
            "{}{endpoint}",
            self.base_url.as_str().trim_end_matches('/')
        ))
        .expect("endpoint must join onto a validated base URL");

        let method = if form.is_some() { Method::POST } else { Method::GET };
        let mut request = Request::new(method, url);
        request
            .headers_mut()
            .insert(AUTHORIZATION, basic_auth_header(&self.api_key));

        if let Some(form) = form {
            request
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
            *request.body_mut() = Some(form.encode().into());
        }

        request
    }

    async fn execute(&self, request: Request) -> Result<Response, PushbulletError> {
        tracing::debug!(
            method = %request.method(),
            path = request.url().path(),
            "sending Pushbullet request"
        );

        let response = self.client.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            let status_text = status.canonical_reason().map_or_else(
                || status.as_str().to_owned(),
                |reason| format!("{} {reason}", status.as_u16()),
            );
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Pushbullet API returned {status_text}");
            return Err(PushbulletError::Api {
                status: status.as_u16(),
                status_text,
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl PushbulletApi for HttpPushbulletClient {
    async fn devices(&self) -> Result<Vec<Device>, PushbulletError> {
        let request = self.build_request(DEVICES_ENDPOINT, None);
        let response = self.execute(request).await?;

        let body = response.bytes().await?;
        let devices_response: DevicesResponse = serde_json::from_slice(&body)?;
        Ok(devices_response.into_devices())
    }

    async fn push(&self, target: Target, mut form: PushForm) -> Result<(), PushbulletError> {
        if let Some(id) = target.device_id() {
            form.set_device_id(id);
        }
        tracing::debug!(%target, kind = form.get("type").unwrap_or("raw"), "pushing");

        let request = self.build_request(PUSHES_ENDPOINT, Some(&form));
        let response = self.execute(request).await?;

        // Drain so the connection goes back to the pool.
        response.bytes().await?;
        Ok(())
    }
}

/// `Authorization` value for HTTP Basic auth with the API key as username
/// and an empty password.
#[must_use]
pub fn basic_auth_header(api_key: &str) -> HeaderValue {
    let encoded = STANDARD.encode(format!("{api_key}:"));
    // base64 output is always a valid header value
    let mut value = HeaderValue::try_from(format!("Basic {encoded}"))
        .unwrap_or_else(|_| HeaderValue::from_static("Basic"));
    value.set_sensitive(true);
    value
}

#[allow(clippy::expect_used)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL")
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{Device, PushForm, PushbulletApi, PushbulletError, Target};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Mock implementation of [`PushbulletApi`] for unit tests.
    ///
    /// Configure responses with `set_*_result` and inspect calls with
    /// `devices_calls()` and `push_calls()`. Typed helpers are recorded as
    /// the form they produce.
    pub struct MockPushbulletClient {
        devices_result: Mutex<Option<Result<Vec<Device>, PushbulletError>>>,
        push_result: Mutex<Option<Result<(), PushbulletError>>>,
        devices_calls: Mutex<usize>,
        push_calls: Mutex<Vec<(Target, PushForm)>>,
    }

    impl MockPushbulletClient {
        pub fn new() -> Self {
            Self {
                devices_result: Mutex::new(None),
                push_result: Mutex::new(None),
                devices_calls: Mutex::new(0),
                push_calls: Mutex::new(Vec::new()),
            }
        }

        /// Set the result for the next `devices` call.
        pub fn set_devices_result(&self, result: Result<Vec<Device>, PushbulletError>) {
            *self.devices_result.lock().unwrap() = Some(result);
        }

        /// Set the result for the next `push` call.
        pub fn set_push_result(&self, result: Result<(), PushbulletError>) {
            *self.push_result.lock().unwrap() = Some(result);
        }

        /// Number of `devices` calls made.
        pub fn devices_calls(&self) -> usize {
            *self.devices_calls.lock().unwrap()
        }

        /// Every target and form passed to `push`.
        pub fn push_calls(&self) -> Vec<(Target, PushForm)> {
            self.push_calls.lock().unwrap().clone()
        }
    }

    impl Default for MockPushbulletClient {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl PushbulletApi for MockPushbulletClient {
        async fn devices(&self) -> Result<Vec<Device>, PushbulletError> {
            *self.devices_calls.lock().unwrap() += 1;

            self.devices_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn push(&self, target: Target, form: PushForm) -> Result<(), PushbulletError> {
            self.push_calls.lock().unwrap().push((target, form));

            self.push_result.lock().unwrap().take().unwrap_or(Ok(()))
        }
    }
}
