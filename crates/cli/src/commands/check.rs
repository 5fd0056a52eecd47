//! `woo-e2e check`: connectivity preflight.

use tracing::info;
use woo_e2e_suite::browser::WebDriverPage;
use woo_e2e_suite::rest::{ProductQuery, StoreApi, WooClient};
use woo_e2e_suite::{SuiteConfig, SuiteError};

/// Verify the REST credentials with a one-product listing and start (then
/// end) a browser session.
///
/// # Errors
///
/// Returns the first `SuiteError`.
pub async fn check() -> Result<(), SuiteError> {
    let config = SuiteConfig::from_env()?;

    let api = WooClient::new(&config.rest)?;
    let listing = api
        .list_products(&ProductQuery {
            per_page: 1,
            ..ProductQuery::default()
        })
        .await?;
    info!(
        api = %api.api_base(),
        total_pages = listing.total_pages,
        "REST API credentials accepted"
    );

    let page = WebDriverPage::connect(&config.browser, config.base_url.clone(), config.wait).await?;
    page.quit().await?;
    info!(webdriver = %config.browser.webdriver_url, "WebDriver reachable");

    Ok(())
}
