//! Integration tests for Tradepost.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p tradepost-cli -- migrate
//!
//! # Start the API
//! cargo run -p tradepost-api
//!
//! # Run integration tests
//! cargo test -p tradepost-integration-tests -- --ignored
//! ```
//!
//! The tests talk to a running server over HTTP; `API_BASE_URL` overrides
//! the default `http://localhost:8000`.

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_owned())
}
