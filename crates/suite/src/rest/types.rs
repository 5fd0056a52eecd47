//! WooCommerce REST API wire types.

use serde::{Deserialize, Serialize};
use woo_e2e_core::{
    LocationCode, PostStatus, ProductId, ShippingMethodInstanceId, ShippingZoneId,
};

/// A shipping zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingZone {
    pub id: ShippingZoneId,
    pub name: String,
    #[serde(default)]
    pub order: i64,
}

/// Kind of a zone location code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Postcode,
    State,
    #[default]
    Country,
    Continent,
}

/// One destination a shipping zone is restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneLocation {
    pub code: LocationCode,
    #[serde(rename = "type", default)]
    pub kind: LocationType,
}

impl ZoneLocation {
    /// A country-level location.
    #[must_use]
    pub const fn country(code: LocationCode) -> Self {
        Self {
            code,
            kind: LocationType::Country,
        }
    }
}

/// A shipping method instance attached to a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingZoneMethod {
    pub instance_id: ShippingMethodInstanceId,
    pub method_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub enabled: bool,
}

/// The product fields the suite reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(rename = "virtual", default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub regular_price: String,
}

/// Query for `GET products`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size, at most 100.
    pub per_page: u32,
    /// `any` includes drafts and trashed products.
    pub status: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
}

impl ProductQuery {
    /// Largest page size the REST API accepts.
    pub const MAX_PER_PAGE: u32 = 100;

    /// Query for one page of products in every status.
    #[must_use]
    pub fn all_statuses(page: u32) -> Self {
        Self {
            page,
            per_page: Self::MAX_PER_PAGE,
            status: Some("any".to_string()),
            search: None,
        }
    }

    /// Query string pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.min(Self::MAX_PER_PAGE).to_string()),
        ];
        if let Some(status) = &self.status {
            pairs.push(("status".to_string(), status.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        pairs
    }
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            status: None,
            search: None,
        }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    /// From the `X-WP-TotalPages` header; 1 when the header is absent.
    pub total_pages: u32,
}

/// Error body returned by the WordPress REST API.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
