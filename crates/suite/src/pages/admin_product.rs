use tracing::{debug, instrument};
use woo_e2e_core::{PostStatus, ProductFixture};

use super::selectors;
use crate::browser::{BrowserError, Page, Selector, WaitConfig, expect};

/// The classic WordPress editor for a new product.
pub struct ProductEditorPage<'a, P: Page + ?Sized> {
    page: &'a P,
    wait: WaitConfig,
}

impl<'a, P: Page + ?Sized> ProductEditorPage<'a, P> {
    pub const fn new(page: &'a P, wait: WaitConfig) -> Self {
        Self { page, wait }
    }

    /// Open an empty new-product form.
    ///
    /// # Errors
    ///
    /// Returns a `BrowserError` if navigation fails.
    #[instrument(skip_all)]
    pub async fn open(&self) -> Result<(), BrowserError> {
        self.page.goto(selectors::NEW_PRODUCT_PATH).await
    }

    /// Fill title and regular price, and tick "Virtual" for virtual
    /// products. The checkbox starts unticked on a new product.
    ///
    /// # Errors
    ///
    /// Returns a `BrowserError` if a field is missing.
    #[instrument(skip_all, fields(product = %fixture.name, kind = %fixture.kind))]
    pub async fn fill(&self, fixture: &ProductFixture) -> Result<(), BrowserError> {
        self.page
            .fill(&Selector::css(selectors::PRODUCT_TITLE_INPUT), &fixture.name)
            .await?;
        self.page
            .fill(
                &Selector::css(selectors::REGULAR_PRICE_INPUT),
                fixture.price.as_str(),
            )
            .await?;
        if !fixture.kind.needs_shipping() {
            self.page
                .click(&Selector::css(selectors::VIRTUAL_CHECKBOX))
                .await?;
        }
        Ok(())
    }

    /// Expect the publish button to be enabled.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::Expectation` if it stays disabled.
    pub async fn expect_publish_enabled(&self) -> Result<(), BrowserError> {
        expect::to_be_visible(
            self.page,
            &Selector::css(selectors::PUBLISH_BUTTON_ENABLED),
            self.wait,
        )
        .await
    }

    /// Click "Publish" and wait for the save round trip to finish.
    ///
    /// # Errors
    ///
    /// Returns a `BrowserError` if the button is missing or the network
    /// never settles.
    #[instrument(skip_all)]
    pub async fn publish(&self) -> Result<(), BrowserError> {
        self.page
            .click(&Selector::css(selectors::PUBLISH_BUTTON))
            .await?;
        self.page.wait_for_network_idle().await
    }

    /// Status shown in the publish box, with its raw label.
    ///
    /// # Errors
    ///
    /// Returns a `BrowserError` if the status box is missing.
    pub async fn status(&self) -> Result<(Option<PostStatus>, String), BrowserError> {
        let label = self
            .page
            .inner_text(&Selector::css(selectors::POST_STATUS))
            .await?;
        debug!(label = %label.trim(), "Editor status");
        Ok((PostStatus::from_editor_label(&label), label))
    }

    /// Expect the success notice to report the publish.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::Expectation` if the notice never says
    /// "Product published.".
    pub async fn expect_published_notice(&self) -> Result<(), BrowserError> {
        expect::to_contain_text(
            self.page,
            &Selector::css(selectors::SUCCESS_NOTICE),
            selectors::PUBLISHED_NOTICE,
            self.wait,
        )
        .await
    }

    /// Public URL of the saved product, if the editor shows one.
    ///
    /// # Errors
    ///
    /// Returns a `BrowserError` if the permalink box is missing.
    pub async fn permalink(&self) -> Result<Option<String>, BrowserError> {
        let href = self
            .page
            .attribute(&Selector::css(selectors::PERMALINK), "href")
            .await?;
        Ok(href.map(|h| h.trim().to_string()).filter(|h| !h.is_empty()))
    }
}
