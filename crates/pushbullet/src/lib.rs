//! Client for the Pushbullet device and push API.
//!
//! Lists the devices registered to an account and sends note, link, address
//! and list pushes to one device or to all of them.
//!
//! # Architecture
//!
//! - [`PushbulletApi`] - Trait defining API operations
//! - [`HttpPushbulletClient`] - Real HTTP implementation using reqwest
//! - [`mock::MockPushbulletClient`] - Mock for unit tests (behind `test-utils` feature)
//!
//! # Testing Patterns
//!
//! ## Unit Tests (Mock Implementation)
//!
//! ```ignore
//! use pushbullet::mock::MockPushbulletClient;
//!
//! let mock = MockPushbulletClient::new();
//! notify_release(&mock, "v1.2.0").await?;
//! assert_eq!(mock.push_calls().len(), 1);
//! ```
//!
//! ## Integration Tests (HTTP Stubbing)
//!
//! ```ignore
//! let server = MockHttpServer::start().await;
//!
//! server
//!     .expect_get("/devices")
//!     .with_header("Authorization", "Basic dGVzdC1rZXk6")
//!     .respond_with_json(json!({ "devices": [], "shared_devices": [] }))
//!     .mount()
//!     .await;
//!
//! let client = HttpPushbulletClient::new("test-key").with_base_url(&server.url())?;
//! assert!(client.devices().await?.is_empty());
//! ```

#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

mod client;
mod push;
mod types;

pub use client::{
    basic_auth_header, HttpPushbulletClient, PushbulletApi, PushbulletError, DEFAULT_BASE_URL,
    DEVICES_ENDPOINT, PUSHES_ENDPOINT,
};
pub use push::{Push, PushForm, DEVICE_ID_FIELD};
pub use types::{Device, DeviceExtras, DeviceId, DevicesResponse, Target};

#[cfg(any(test, feature = "test-utils"))]
pub use client::mock;
