//! Newtype IDs for type-safe store entity references.
//!
//! WooCommerce assigns every entity a positive integer ID. Use the
//! `define_id!` macro to create wrappers that prevent accidentally passing a
//! shipping zone ID where a product ID is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `u64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_u64()`
/// - `From<u64>` and `Into<u64>` implementations
/// - `Display` and `FromStr` so IDs can be used in URL paths and CLI flags
///
/// # Example
///
/// ```rust
/// # use woo_e2e_core::define_id;
/// define_id!(CouponId);
/// define_id!(OrderId);
///
/// let coupon_id = CouponId::new(1);
/// let order_id = OrderId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: CouponId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create a new ID from a u64 value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the underlying u64 value.
            #[must_use]
            pub const fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<u64>().map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Store entity IDs
define_id!(ProductId);
define_id!(ShippingZoneId);
define_id!(ShippingMethodInstanceId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_number() {
        assert_eq!(ShippingZoneId::new(42).to_string(), "42");
    }

    #[test]
    fn test_from_str_trims() {
        let id: ProductId = " 17 ".parse().unwrap();
        assert_eq!(id.as_u64(), 17);
        assert!("abc".parse::<ProductId>().is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let id: ShippingZoneId = serde_json::from_str("5").unwrap();
        assert_eq!(id, ShippingZoneId::new(5));
        assert_eq!(serde_json::to_string(&id).unwrap(), "5");
    }
}
