//! Core types for Tradepost.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod sku;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use sku::{generate_sku, sku_prefix};
pub use status::*;
