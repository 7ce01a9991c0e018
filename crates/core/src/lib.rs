//! Tradepost Core - Shared types library.
//!
//! This crate provides common types used across all Tradepost components:
//! - `api` - The JSON REST API server
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, status enums, email addresses, and SKU generation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
