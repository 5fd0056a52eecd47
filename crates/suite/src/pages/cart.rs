use tracing::instrument;

use super::selectors;
use crate::browser::{BrowserError, Page, Selector, WaitConfig, expect};

/// The classic cart page.
pub struct CartPage<'a, P: Page + ?Sized> {
    page: &'a P,
    wait: WaitConfig,
}

impl<'a, P: Page + ?Sized> CartPage<'a, P> {
    pub const fn new(page: &'a P, wait: WaitConfig) -> Self {
        Self { page, wait }
    }

    /// Expect a line item for `name`.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::Expectation` if no line item mentions it.
    pub async fn expect_contains(&self, name: &str) -> Result<(), BrowserError> {
        expect::to_contain_text(
            self.page,
            &Selector::css(selectors::CART_PRODUCT_CELL),
            name,
            self.wait,
        )
        .await
    }

    /// Expect the shipping calculator link to be shown or absent.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::Expectation` if visibility never matches.
    pub async fn expect_shipping_calculator(&self, shown: bool) -> Result<(), BrowserError> {
        let selector = Selector::css(selectors::SHIPPING_CALCULATOR);
        if shown {
            expect::to_be_visible(self.page, &selector, self.wait).await
        } else {
            expect::not_to_be_visible(self.page, &selector, self.wait).await
        }
    }

    /// Remove the first line item.
    ///
    /// # Errors
    ///
    /// Returns a `BrowserError` if there is no remove link.
    #[instrument(skip_all)]
    pub async fn remove_first_item(&self) -> Result<(), BrowserError> {
        self.page.click(&Selector::css(selectors::CART_REMOVE)).await?;
        self.page.wait_for_network_idle().await
    }
}
