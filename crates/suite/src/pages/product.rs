use tracing::instrument;
use woo_e2e_core::ProductFixture;

use super::selectors;
use crate::browser::{BrowserError, Page, Selector, WaitConfig, expect};

/// A single-product storefront page.
pub struct ProductPage<'a, P: Page + ?Sized> {
    page: &'a P,
    wait: WaitConfig,
}

impl<'a, P: Page + ?Sized> ProductPage<'a, P> {
    pub const fn new(page: &'a P, wait: WaitConfig) -> Self {
        Self { page, wait }
    }

    /// Visit the product's permalink.
    ///
    /// # Errors
    ///
    /// Returns a `BrowserError` if navigation fails.
    #[instrument(skip(self))]
    pub async fn open(&self, permalink: &str) -> Result<(), BrowserError> {
        self.page.goto(permalink).await
    }

    /// Expect the title to equal the fixture name and the price to show the
    /// fixture price.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::Expectation` on a mismatch.
    pub async fn expect_shows(&self, fixture: &ProductFixture) -> Result<(), BrowserError> {
        expect::to_have_text(
            self.page,
            &Selector::css(selectors::PRODUCT_TITLE),
            &fixture.name,
            self.wait,
        )
        .await?;
        expect::to_contain_text(
            self.page,
            &Selector::css(selectors::PRODUCT_PRICE),
            fixture.price.as_str(),
            self.wait,
        )
        .await
    }

    /// Click "Add to cart" and then the "View cart" link that appears.
    ///
    /// # Errors
    ///
    /// Returns a `BrowserError` if either control never appears.
    #[instrument(skip_all)]
    pub async fn add_to_cart_and_view(&self) -> Result<(), BrowserError> {
        self.page
            .click(&Selector::text(selectors::ADD_TO_CART_TEXT))
            .await?;
        self.page
            .click(&Selector::text(selectors::VIEW_CART_TEXT))
            .await?;
        self.page.wait_for_network_idle().await
    }
}
