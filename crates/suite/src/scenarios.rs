//! The four product scenarios.
//!
//! Creation runs in the admin session and yields a [`PublishedProduct`];
//! the matching shopper scenario takes that value, so it cannot run without
//! a product to visit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use woo_e2e_core::{PostStatus, ProductFixture, ProductKind};

use crate::browser::{Page, WaitConfig};
use crate::error::SuiteError;
use crate::pages::{CartPage, ProductEditorPage, ProductPage};

/// How many times publish is clicked again when the editor reports a draft.
///
/// WordPress occasionally saves the first publish of a new post as a draft.
/// That is a store-side race, so it is retried once and logged, never more.
pub const DRAFT_REPUBLISH_ATTEMPTS: u32 = 1;

/// The scenarios, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioId {
    CreateVirtualProduct,
    AddVirtualProductToCart,
    CreateNonVirtualProduct,
    AddNonVirtualProductToCart,
}

impl ScenarioId {
    /// Every scenario, in the order the suite runs them.
    pub const ALL: [Self; 4] = [
        Self::CreateVirtualProduct,
        Self::AddVirtualProductToCart,
        Self::CreateNonVirtualProduct,
        Self::AddNonVirtualProductToCart,
    ];

    /// Human-readable title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::CreateVirtualProduct => "can create simple virtual product",
            Self::AddVirtualProductToCart => {
                "can have a shopper add the simple virtual product to the cart"
            }
            Self::CreateNonVirtualProduct => "can create simple non-virtual product",
            Self::AddNonVirtualProductToCart => {
                "can have a shopper add the simple non-virtual product to the cart"
            }
        }
    }

    /// Short name used on the command line.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::CreateVirtualProduct => "create-virtual-product",
            Self::AddVirtualProductToCart => "add-virtual-product-to-cart",
            Self::CreateNonVirtualProduct => "create-non-virtual-product",
            Self::AddNonVirtualProductToCart => "add-non-virtual-product-to-cart",
        }
    }

    /// Kind of product the scenario works on.
    #[must_use]
    pub const fn product_kind(self) -> ProductKind {
        match self {
            Self::CreateVirtualProduct | Self::AddVirtualProductToCart => ProductKind::Virtual,
            Self::CreateNonVirtualProduct | Self::AddNonVirtualProductToCart => {
                ProductKind::NonVirtual
            }
        }
    }

    /// The scenario whose output this one consumes.
    #[must_use]
    pub const fn depends_on(self) -> Option<Self> {
        match self {
            Self::AddVirtualProductToCart => Some(Self::CreateVirtualProduct),
            Self::AddNonVirtualProductToCart => Some(Self::CreateNonVirtualProduct),
            Self::CreateVirtualProduct | Self::CreateNonVirtualProduct => None,
        }
    }

    /// Returns true for admin-side creation scenarios.
    #[must_use]
    pub const fn is_create(self) -> bool {
        self.depends_on().is_none()
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.slug().eq_ignore_ascii_case(s) || id.title() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|id| id.slug()).collect();
                format!("unknown scenario {s:?}, expected one of: {}", known.join(", "))
            })
    }
}

/// A product the admin session published, ready for a shopper to visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedProduct {
    pub fixture: ProductFixture,
    /// Public URL captured from the editor.
    pub permalink: String,
    /// Publish clicks beyond the first.
    pub republish_attempts: u32,
}

/// Create a simple product through the admin editor and publish it.
///
/// Non-virtual products additionally wait for the publish button to become
/// enabled before the first click.
///
/// # Errors
///
/// Returns `SuiteError::Browser` for failed actions and expectations, and
/// `SuiteError::Scenario` if the product is still not published after the
/// retry or no permalink was shown.
#[instrument(skip(page, wait), fields(product = %fixture.name, kind = %fixture.kind))]
pub async fn create_simple_product<P>(
    page: &P,
    fixture: &ProductFixture,
    wait: WaitConfig,
) -> Result<PublishedProduct, SuiteError>
where
    P: Page + ?Sized,
{
    let scenario = match fixture.kind {
        ProductKind::Virtual => ScenarioId::CreateVirtualProduct,
        ProductKind::NonVirtual => ScenarioId::CreateNonVirtualProduct,
    };
    let editor = ProductEditorPage::new(page, wait);

    editor.open().await?;
    editor.fill(fixture).await?;
    if fixture.kind.needs_shipping() {
        editor.expect_publish_enabled().await?;
    }
    editor.publish().await?;

    let mut republish_attempts = 0;
    loop {
        let (status, label) = editor.status().await?;
        if status != Some(PostStatus::Draft) {
            break;
        }
        if republish_attempts >= DRAFT_REPUBLISH_ATTEMPTS {
            return Err(SuiteError::scenario(
                scenario.title(),
                format!(
                    "product still a draft after {republish_attempts} republish attempt(s): {}",
                    label.trim()
                ),
            ));
        }
        republish_attempts += 1;
        warn!(
            attempt = republish_attempts,
            "Store saved the product as a draft instead of publishing it; publishing again"
        );
        editor.publish().await?;
    }

    editor.expect_published_notice().await?;

    let permalink = editor.permalink().await?.ok_or_else(|| {
        SuiteError::scenario(scenario.title(), "editor shows no permalink after publishing")
    })?;

    info!(permalink = %permalink, republish_attempts, "Product published");
    Ok(PublishedProduct {
        fixture: fixture.clone(),
        permalink,
        republish_attempts,
    })
}

/// Visit a published product as a shopper, add it to the cart and check the
/// cart, then empty the cart again.
///
/// Starts from a reset session, so nothing an earlier scenario left in the
/// cart is seen here.
///
/// The shipping calculator must be shown exactly when the product needs
/// shipping.
///
/// # Errors
///
/// Returns `SuiteError::Browser` for failed actions and expectations.
#[instrument(skip(page, product, wait), fields(product = %product.fixture.name))]
pub async fn shopper_adds_to_cart<P>(
    page: &P,
    product: &PublishedProduct,
    wait: WaitConfig,
) -> Result<(), SuiteError>
where
    P: Page + ?Sized,
{
    page.reset_session().await?;

    let product_page = ProductPage::new(page, wait);
    product_page.open(&product.permalink).await?;
    product_page.expect_shows(&product.fixture).await?;
    product_page.add_to_cart_and_view().await?;

    let cart = CartPage::new(page, wait);
    cart.expect_contains(&product.fixture.name).await?;
    cart.expect_shipping_calculator(product.fixture.kind.needs_shipping())
        .await?;
    cart.remove_first_item().await?;

    info!("Cart checked");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_titles() {
        assert_eq!(
            ScenarioId::CreateVirtualProduct.to_string(),
            "can create simple virtual product"
        );
        assert_eq!(
            ScenarioId::AddNonVirtualProductToCart.title(),
            "can have a shopper add the simple non-virtual product to the cart"
        );
    }

    #[test]
    fn test_parse_by_slug_or_title() {
        assert_eq!(
            "add-virtual-product-to-cart".parse::<ScenarioId>().unwrap(),
            ScenarioId::AddVirtualProductToCart
        );
        assert_eq!(
            "can create simple non-virtual product"
                .parse::<ScenarioId>()
                .unwrap(),
            ScenarioId::CreateNonVirtualProduct
        );
        let err = "checkout".parse::<ScenarioId>().unwrap_err();
        assert!(err.contains("create-virtual-product"));
    }

    #[test]
    fn test_dependencies() {
        for id in ScenarioId::ALL {
            match id.depends_on() {
                Some(dep) => {
                    assert!(dep.is_create());
                    assert!(dep < id);
                    assert_eq!(dep.product_kind(), id.product_kind());
                }
                None => assert!(id.is_create()),
            }
        }
    }
}
