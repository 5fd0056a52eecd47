//! Core types for the end-to-end suite.
//!
//! This module provides type-safe wrappers for the store entities the suite
//! touches.

pub mod id;
pub mod location;
pub mod price;
pub mod product;
pub mod status;

pub use id::*;
pub use location::{LocationCode, LocationError};
pub use price::{Price, PriceError};
pub use product::*;
pub use status::*;
