use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;
use thirtyfour::ChromiumLikeCapabilities;
use thirtyfour::error::{WebDriverError, WebDriverErrorInner};
use thirtyfour::prelude::*;
use tracing::{debug, info, instrument};
use url::Url;

use super::{
    BrowserError, Page, Selector, StorageState, StorageStateCookie, WaitConfig, poll_until,
};
use crate::config::{BrowserConfig, BrowserKind};

/// True once the document finished loading and jQuery (which the WordPress
/// admin and WooCommerce cart use for AJAX) has no requests in flight.
const NETWORK_IDLE_SCRIPT: &str = r"
    return document.readyState === 'complete'
        && (typeof window.jQuery === 'undefined' || window.jQuery.active === 0);
";

const CLEAR_STORAGE_SCRIPT: &str = r"
    window.localStorage.clear();
    window.sessionStorage.clear();
";

/// Consecutive idle samples required before the network counts as settled.
const IDLE_SAMPLES: u8 = 2;

/// A [`Page`] backed by a WebDriver browser session.
#[derive(Clone)]
pub struct WebDriverPage {
    driver: WebDriver,
    base_url: Url,
    wait: WaitConfig,
}

impl std::fmt::Debug for WebDriverPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebDriverPage")
            .field("base_url", &self.base_url.as_str())
            .field("wait", &self.wait)
            .finish_non_exhaustive()
    }
}

impl WebDriverPage {
    /// Start a new browser session.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::WebDriver` if the WebDriver server is
    /// unreachable or rejects the capabilities.
    #[instrument(skip_all, fields(webdriver = %config.webdriver_url, browser = ?config.browser))]
    pub async fn connect(
        config: &BrowserConfig,
        base_url: Url,
        wait: WaitConfig,
    ) -> Result<Self, BrowserError> {
        let driver = match config.browser {
            BrowserKind::Chrome => {
                let mut caps = DesiredCapabilities::chrome();
                if config.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(config.webdriver_url.as_str(), caps).await?
            }
            BrowserKind::Firefox => {
                let mut caps = DesiredCapabilities::firefox();
                if config.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(config.webdriver_url.as_str(), caps).await?
            }
        };

        info!("Browser session started");
        Ok(Self {
            driver,
            base_url,
            wait,
        })
    }

    /// Restore a saved authenticated state by injecting its cookies for the
    /// store host. Navigates to the store first, since WebDriver only accepts
    /// cookies for the current document's domain.
    ///
    /// # Errors
    ///
    /// Returns an error if navigation or cookie injection fails.
    #[instrument(skip_all)]
    pub async fn restore_storage_state(&self, state: &StorageState) -> Result<usize, BrowserError> {
        let host = self.base_url.host_str().unwrap_or_default().to_string();
        self.driver.goto(self.base_url.as_str()).await?;

        let now = chrono::Utc::now().timestamp();
        let cookies = state.cookies_for_host(&host, now);
        for saved in &cookies {
            self.driver.add_cookie(webdriver_cookie(saved)).await?;
        }

        info!(host = %host, cookies = cookies.len(), "Restored storage state");
        Ok(cookies.len())
    }

    /// End the browser session.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::WebDriver` if the session could not be closed.
    pub async fn quit(self) -> Result<(), BrowserError> {
        self.driver.quit().await?;
        Ok(())
    }

    fn resolve(&self, url: &str) -> Result<Url, BrowserError> {
        Ok(self.base_url.join(url)?)
    }

    fn by(selector: &Selector) -> By {
        match selector {
            Selector::Css(css) => By::Css(css.as_str()),
            Selector::Text(_) => By::XPath(selector.to_xpath().unwrap_or_default().as_str()),
        }
    }

    /// First matching element, waiting for it to appear.
    async fn element(&self, selector: &Selector) -> Result<WebElement, BrowserError> {
        self.driver
            .query(Self::by(selector))
            .wait(self.wait.timeout, self.wait.interval)
            .first()
            .await
            .map_err(|e| lookup_error(selector, e))
    }
}

/// WebDriver form of a saved cookie. Session cookies get no expiry.
#[allow(clippy::cast_possible_truncation)]
fn webdriver_cookie(saved: &StorageStateCookie) -> Cookie {
    let mut cookie = Cookie::new(saved.name.clone(), saved.value.clone());
    cookie.set_domain(saved.domain.clone());
    cookie.set_path(saved.path.clone());
    cookie.set_secure(saved.secure);
    if saved.expires >= 0.0 {
        cookie.set_expiry(saved.expires as i64);
    }
    if let Some(same_site) = saved.same_site.as_deref().and_then(parse_same_site) {
        cookie.set_same_site(same_site);
    }
    cookie
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

/// Map a failed element lookup, keeping "no such element" distinct from
/// session and transport failures.
fn lookup_error(selector: &Selector, err: WebDriverError) -> BrowserError {
    if matches!(err.as_inner(), WebDriverErrorInner::NoSuchElement(..)) {
        BrowserError::ElementNotFound(selector.to_string())
    } else {
        BrowserError::from(err)
    }
}

#[async_trait]
impl Page for WebDriverPage {
    #[instrument(skip(self))]
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        let url = self.resolve(url)?;
        self.driver.goto(url.as_str()).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn reset_session(&self) -> Result<(), BrowserError> {
        // Cookies can only be deleted for the current document's domain.
        self.driver.goto(self.base_url.as_str()).await?;
        self.driver.delete_all_cookies().await?;
        self.driver.execute(CLEAR_STORAGE_SCRIPT, Vec::new()).await?;
        debug!("Session reset");
        Ok(())
    }

    #[instrument(skip(self, value), fields(selector = %selector))]
    async fn fill(&self, selector: &Selector, value: &str) -> Result<(), BrowserError> {
        let element = self.element(selector).await?;
        element.clear().await?;
        element.send_keys(value).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(selector = %selector))]
    async fn click(&self, selector: &Selector) -> Result<(), BrowserError> {
        self.element(selector).await?.click().await?;
        Ok(())
    }

    async fn inner_text(&self, selector: &Selector) -> Result<String, BrowserError> {
        Ok(self.element(selector).await?.text().await?)
    }

    async fn attribute(
        &self,
        selector: &Selector,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        Ok(self.element(selector).await?.attr(name).await?)
    }

    async fn is_visible(&self, selector: &Selector) -> Result<bool, BrowserError> {
        for element in self.driver.find_all(Self::by(selector)).await? {
            if element.is_displayed().await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn wait_for_network_idle(&self) -> Result<(), BrowserError> {
        let idle_samples = AtomicU8::new(0);
        let samples = &idle_samples;
        let driver = &self.driver;
        poll_until(self.wait, "network idle", move || async move {
            let ret = driver.execute(NETWORK_IDLE_SCRIPT, Vec::new()).await?;
            if ret.json().as_bool().unwrap_or(false) {
                Ok(samples.fetch_add(1, Ordering::SeqCst) + 1 >= IDLE_SAMPLES)
            } else {
                samples.store(0, Ordering::SeqCst);
                Ok(false)
            }
        })
        .await?;
        debug!("Network idle");
        Ok(())
    }
}
