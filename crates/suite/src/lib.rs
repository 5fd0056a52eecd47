//! End-to-end suite for WooCommerce simple products.
//!
//! An admin browser session creates a virtual and a non-virtual simple
//! product through the WordPress product editor; a shopper session then
//! checks each product page, adds the product to the cart and verifies that
//! the shipping calculator appears only for the non-virtual product.
//!
//! The REST API is used for fixtures alone: a shipping zone is created
//! before the scenarios and the zone plus every fixture product are removed
//! afterwards.
//!
//! # Modules
//!
//! - [`config`] - environment configuration
//! - [`rest`] - WooCommerce REST client ([`rest::StoreApi`])
//! - [`browser`] - WebDriver-backed [`browser::Page`] and auto-retrying
//!   expectations
//! - [`pages`] - page objects for wp-login, the product editor, product
//!   pages and the cart
//! - [`fixtures`] - shipping zone setup and teardown
//! - [`scenarios`] - the four scenarios
//! - [`runner`] - ordered execution and reporting
//! - [`session`] - admin and shopper browser sessions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod browser;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod pages;
pub mod rest;
pub mod runner;
pub mod scenarios;
pub mod session;

pub use config::{ConfigError, SuiteConfig};
pub use error::SuiteError;
pub use runner::{RunContext, ScenarioOutcome, ScenarioStatus, SuiteReport, SuiteRunner};
pub use scenarios::{PublishedProduct, ScenarioId};
pub use session::BrowserSessions;
