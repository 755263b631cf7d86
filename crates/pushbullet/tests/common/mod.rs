//! Common test utilities for integration tests.
//!
//! - [`http_mock::MockHttpServer`] - Declarative `wiremock` stubs for the Pushbullet endpoints

pub mod http_mock;
