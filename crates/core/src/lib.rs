//! WooCommerce E2E Core - Shared types library.
//!
//! This crate provides the types shared by the end-to-end suite components:
//! - `suite` - REST client, browser layer, page objects and scenarios
//! - `cli` - Command-line entry point for running the suite
//! - `integration-tests` - In-memory store fakes and test suites
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no browser
//! sessions. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for store IDs, prices, location codes,
//!   statuses and the product fixtures the suite creates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
