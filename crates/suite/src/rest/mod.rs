//! WooCommerce REST API client.
//!
//! Used only for fixture setup and teardown: creating the shipping zone the
//! non-virtual product needs, and removing fixture products and the zone
//! afterwards. Everything the scenarios assert on goes through the browser.
//!
//! # API Reference
//!
//! - Base URL: `{store}/wp-json/wc/v3/`
//! - Authentication: HTTP Basic with consumer key/secret over HTTPS,
//!   OAuth 1.0a query-string signatures over plain HTTP
//! - Pagination: `page`/`per_page` query parameters, `X-WP-TotalPages` header

mod client;
mod oauth;
mod types;

pub use client::WooClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;
use woo_e2e_core::{ProductId, ShippingMethodKind, ShippingZoneId};

/// Errors that can occur when interacting with the WooCommerce REST API.
#[derive(Debug, Error)]
pub enum WooError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} {code} - {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid consumer key or secret.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limited by the store.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request signing failed.
    #[error("Signing error: {0}")]
    Signing(String),
}

impl WooError {
    /// Returns true if the resource does not exist (already deleted, or
    /// never created).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// The store operations fixtures need.
///
/// [`WooClient`] implements this over HTTP; tests implement it in memory.
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// `POST shipping/zones`
    async fn create_shipping_zone(&self, name: &str) -> Result<ShippingZone, WooError>;

    /// `GET shipping/zones`
    async fn list_shipping_zones(&self) -> Result<Vec<ShippingZone>, WooError>;

    /// `PUT shipping/zones/{id}/locations` - replaces the zone's locations.
    async fn update_shipping_zone_locations(
        &self,
        zone: ShippingZoneId,
        locations: &[ZoneLocation],
    ) -> Result<Vec<ZoneLocation>, WooError>;

    /// `POST shipping/zones/{id}/methods`
    async fn add_shipping_zone_method(
        &self,
        zone: ShippingZoneId,
        method: ShippingMethodKind,
    ) -> Result<ShippingZoneMethod, WooError>;

    /// `DELETE shipping/zones/{id}`
    async fn delete_shipping_zone(&self, zone: ShippingZoneId, force: bool) -> Result<(), WooError>;

    /// `GET products`
    async fn list_products(&self, query: &ProductQuery) -> Result<Paged<Product>, WooError>;

    /// `DELETE products/{id}`
    async fn delete_product(&self, product: ProductId, force: bool) -> Result<(), WooError>;

    /// Every product in every status, following pagination.
    async fn list_all_products(&self) -> Result<Vec<Product>, WooError> {
        let mut products = Vec::new();
        let mut page = 1;
        loop {
            let listing = self.list_products(&ProductQuery::all_statuses(page)).await?;
            let fetched = listing.items.len();
            products.extend(listing.items);
            if page >= listing.total_pages || fetched == 0 {
                break;
            }
            page += 1;
        }
        Ok(products)
    }
}
