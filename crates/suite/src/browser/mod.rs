//! Browser automation layer.
//!
//! Scenarios talk to a [`Page`], a small set of Playwright-style primitives
//! (navigate, fill, click, read text, check visibility, wait for the network
//! to settle). [`WebDriverPage`] implements it over a WebDriver session; the
//! integration tests implement it over an in-memory store.
//!
//! # Waiting
//!
//! Every wait in the suite uses one [`WaitConfig`]. Element lookups made by
//! actions (`fill`, `click`, `inner_text`, `attribute`) wait for the element
//! to appear; [`expect`] assertions retry until they hold or the timeout
//! passes. `is_visible` never waits.

pub mod expect;
pub mod storage_state;
mod wait;
mod webdriver;

pub use storage_state::{StorageState, StorageStateCookie};
pub use wait::{WaitConfig, poll_until};
pub use webdriver::WebDriverPage;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while driving a browser.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// WebDriver command failed.
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] Box<thirtyfour::error::WebDriverError>),

    /// No element matched the selector within the wait timeout.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// An expectation did not hold within the wait timeout.
    #[error("Expected {selector} {expectation}, last observed: {actual}")]
    Expectation {
        /// Selector the expectation was made on.
        selector: String,
        /// What was expected, e.g. `to have text "Virtual Product Name"`.
        expectation: String,
        /// Last observed value, or `<missing>`.
        actual: String,
    },

    /// A condition other than an element expectation timed out.
    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    /// A URL could not be resolved against the store base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The storage-state file could not be read or parsed.
    #[error("Storage state error: {0}")]
    StorageState(String),
}

impl From<thirtyfour::error::WebDriverError> for BrowserError {
    fn from(err: thirtyfour::error::WebDriverError) -> Self {
        Self::WebDriver(Box::new(err))
    }
}

impl BrowserError {
    /// Returns true if the error means the element was simply not there.
    #[must_use]
    pub const fn is_missing_element(&self) -> bool {
        matches!(self, Self::ElementNotFound(_))
    }
}

/// How an element is located.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector, e.g. `#publish:not(.disabled)`.
    Css(String),
    /// A link, button or submit input whose visible text contains the string.
    Text(String),
}

impl Selector {
    /// CSS selector.
    #[must_use]
    pub fn css(selector: &str) -> Self {
        Self::Css(selector.to_string())
    }

    /// Visible-text selector, e.g. `text=Add to cart`.
    #[must_use]
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }

    /// XPath equivalent of a text selector; `None` for CSS selectors.
    #[must_use]
    pub fn to_xpath(&self) -> Option<String> {
        match self {
            Self::Css(_) => None,
            Self::Text(text) => {
                let literal = xpath_literal(text);
                Some(format!(
                    "//*[self::a or self::button][contains(normalize-space(.), {literal})] \
                     | //input[@type='submit' and contains(@value, {literal})]"
                ))
            }
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(css) => f.write_str(css),
            Self::Text(text) => write!(f, "text={text}"),
        }
    }
}

/// Quote a string as an XPath 1.0 literal.
///
/// XPath has no escape syntax, so strings holding both quote kinds are built
/// with `concat()`.
#[must_use]
pub fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{s}'");
    }
    if !s.contains('"') {
        return format!("\"{s}\"");
    }
    let parts: Vec<String> = s
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// A browser tab the scenarios drive.
///
/// Relative URLs passed to [`Page::goto`] resolve against the store base URL.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigate and wait for the document to load.
    async fn goto(&self, url: &str) -> Result<(), BrowserError>;

    /// Drop the store's cookies and web storage, leaving an anonymous
    /// visitor with an empty cart.
    async fn reset_session(&self) -> Result<(), BrowserError>;

    /// Clear an input and type `value` into it.
    async fn fill(&self, selector: &Selector, value: &str) -> Result<(), BrowserError>;

    /// Click the first matching element.
    async fn click(&self, selector: &Selector) -> Result<(), BrowserError>;

    /// Rendered text of the first matching element.
    async fn inner_text(&self, selector: &Selector) -> Result<String, BrowserError>;

    /// Attribute value of the first matching element.
    async fn attribute(&self, selector: &Selector, name: &str)
    -> Result<Option<String>, BrowserError>;

    /// Whether any matching element is currently displayed. Absent elements
    /// are not visible.
    async fn is_visible(&self, selector: &Selector) -> Result<bool, BrowserError>;

    /// Wait until the document has loaded and no requests are in flight.
    async fn wait_for_network_idle(&self) -> Result<(), BrowserError>;
}
