//! Product and shipping zone fixtures created by the suite.
//!
//! Fixture product names are the matching key for cleanup, so they must be
//! unique within the store for the duration of a run.

use serde::{Deserialize, Serialize};

use super::{LocationCode, Price, ShippingMethodKind};

/// Name of the virtual fixture product.
pub const VIRTUAL_PRODUCT_NAME: &str = "Virtual Product Name";

/// Name of the non-virtual fixture product.
pub const NON_VIRTUAL_PRODUCT_NAME: &str = "Non Virtual Product Name";

/// Regular price of both fixture products, in cents.
pub const PRODUCT_PRICE_CENTS: u32 = 999;

/// Name of the shipping zone created for the run.
pub const SHIPPING_ZONE_NAME: &str = "Somewhere";

/// The single destination the shipping zone covers.
pub const SHIPPING_ZONE_LOCATION: &str = "CN";

/// Whether a product needs physical shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// No physical shipping; the cart never offers a shipping calculator.
    Virtual,
    /// Physically shipped; the cart must offer a shipping calculator.
    NonVirtual,
}

impl ProductKind {
    /// Whether the cart should show the shipping calculator for this kind.
    #[must_use]
    pub const fn needs_shipping(self) -> bool {
        matches!(self, Self::NonVirtual)
    }
}

impl std::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Virtual => write!(f, "virtual"),
            Self::NonVirtual => write!(f, "non-virtual"),
        }
    }
}

/// A simple product the suite creates through the admin UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFixture {
    /// Product title, also the cleanup matching key.
    pub name: String,
    /// Regular price.
    pub price: Price,
    /// Virtual or physically shipped.
    pub kind: ProductKind,
}

impl ProductFixture {
    /// The virtual fixture product.
    #[must_use]
    pub fn virtual_product() -> Self {
        Self {
            name: VIRTUAL_PRODUCT_NAME.to_owned(),
            price: Price::from_cents(PRODUCT_PRICE_CENTS),
            kind: ProductKind::Virtual,
        }
    }

    /// The non-virtual fixture product.
    #[must_use]
    pub fn non_virtual_product() -> Self {
        Self {
            name: NON_VIRTUAL_PRODUCT_NAME.to_owned(),
            price: Price::from_cents(PRODUCT_PRICE_CENTS),
            kind: ProductKind::NonVirtual,
        }
    }

    /// Both fixture products, in the order the suite creates them.
    #[must_use]
    pub fn all() -> [Self; 2] {
        [Self::virtual_product(), Self::non_virtual_product()]
    }

    /// Returns true if `name` is exactly the name of a fixture product.
    #[must_use]
    pub fn is_fixture_name(name: &str) -> bool {
        name == VIRTUAL_PRODUCT_NAME || name == NON_VIRTUAL_PRODUCT_NAME
    }
}

/// The shipping zone created before the scenarios run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingZoneFixture {
    /// Zone name.
    pub name: String,
    /// Destinations the zone is restricted to.
    pub locations: Vec<LocationCode>,
    /// Method attached to the zone.
    pub method: ShippingMethodKind,
}

impl Default for ShippingZoneFixture {
    fn default() -> Self {
        Self {
            name: SHIPPING_ZONE_NAME.to_owned(),
            locations: LocationCode::parse(SHIPPING_ZONE_LOCATION)
                .into_iter()
                .collect(),
            method: ShippingMethodKind::FlatRate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_names_are_distinct() {
        let [virtual_product, non_virtual] = ProductFixture::all();
        assert_ne!(virtual_product.name, non_virtual.name);
        assert_eq!(virtual_product.kind, ProductKind::Virtual);
        assert_eq!(non_virtual.kind, ProductKind::NonVirtual);
    }

    #[test]
    fn test_fixture_price_literal() {
        assert_eq!(ProductFixture::virtual_product().price.as_str(), "9.99");
    }

    #[test]
    fn test_is_fixture_name_is_exact() {
        assert!(ProductFixture::is_fixture_name("Virtual Product Name"));
        assert!(ProductFixture::is_fixture_name("Non Virtual Product Name"));
        assert!(!ProductFixture::is_fixture_name("virtual product name"));
        assert!(!ProductFixture::is_fixture_name("Virtual Product Name 2"));
    }

    #[test]
    fn test_needs_shipping() {
        assert!(!ProductKind::Virtual.needs_shipping());
        assert!(ProductKind::NonVirtual.needs_shipping());
    }

    #[test]
    fn test_default_zone_fixture() {
        let zone = ShippingZoneFixture::default();
        assert_eq!(zone.name, "Somewhere");
        assert_eq!(zone.locations.len(), 1);
        assert_eq!(zone.locations[0].as_str(), "CN");
        assert_eq!(zone.method, ShippingMethodKind::FlatRate);
    }
}
