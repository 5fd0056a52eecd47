//! Auto-retrying assertions on page elements.
//!
//! Each expectation re-reads the page until it holds or the [`WaitConfig`]
//! timeout passes, then fails with [`BrowserError::Expectation`] carrying the
//! last value it saw.

use tokio::time::Instant;

use super::{BrowserError, Page, Selector, WaitConfig};

const MISSING: &str = "<missing>";

/// Collapse runs of whitespace the way rendered text comparison expects.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Expect the element's text, whitespace-normalised, to equal `expected`.
///
/// # Errors
///
/// Returns `BrowserError::Expectation` if the text never matched.
pub async fn to_have_text<P>(
    page: &P,
    selector: &Selector,
    expected: &str,
    wait: WaitConfig,
) -> Result<(), BrowserError>
where
    P: Page + ?Sized,
{
    let expected = normalize_whitespace(expected);
    retry_text(page, selector, wait, &format!("to have text {expected:?}"), |text| {
        normalize_whitespace(text) == expected
    })
    .await
}

/// Expect the element's text to contain `expected`.
///
/// # Errors
///
/// Returns `BrowserError::Expectation` if the text never contained it.
pub async fn to_contain_text<P>(
    page: &P,
    selector: &Selector,
    expected: &str,
    wait: WaitConfig,
) -> Result<(), BrowserError>
where
    P: Page + ?Sized,
{
    let expected = normalize_whitespace(expected);
    retry_text(page, selector, wait, &format!("to contain text {expected:?}"), |text| {
        normalize_whitespace(text).contains(&expected)
    })
    .await
}

/// Expect a matching element to be displayed.
///
/// # Errors
///
/// Returns `BrowserError::Expectation` if nothing matching became visible.
pub async fn to_be_visible<P>(page: &P, selector: &Selector, wait: WaitConfig) -> Result<(), BrowserError>
where
    P: Page + ?Sized,
{
    retry_visibility(page, selector, wait, true).await
}

/// Expect no matching element to be displayed. Passes when the element is
/// absent.
///
/// # Errors
///
/// Returns `BrowserError::Expectation` if a matching element stayed visible.
pub async fn not_to_be_visible<P>(
    page: &P,
    selector: &Selector,
    wait: WaitConfig,
) -> Result<(), BrowserError>
where
    P: Page + ?Sized,
{
    retry_visibility(page, selector, wait, false).await
}

async fn retry_text<P, F>(
    page: &P,
    selector: &Selector,
    wait: WaitConfig,
    expectation: &str,
    matches: F,
) -> Result<(), BrowserError>
where
    P: Page + ?Sized,
    F: Fn(&str) -> bool,
{
    let deadline = Instant::now() + wait.timeout;
    loop {
        let actual = match page.inner_text(selector).await {
            Ok(text) if matches(&text) => return Ok(()),
            Ok(text) => format!("{:?}", normalize_whitespace(&text)),
            Err(e) if e.is_missing_element() => MISSING.to_string(),
            Err(e) => return Err(e),
        };

        if Instant::now() >= deadline {
            return Err(BrowserError::Expectation {
                selector: selector.to_string(),
                expectation: expectation.to_string(),
                actual,
            });
        }
        tokio::time::sleep(wait.interval).await;
    }
}

async fn retry_visibility<P>(
    page: &P,
    selector: &Selector,
    wait: WaitConfig,
    want_visible: bool,
) -> Result<(), BrowserError>
where
    P: Page + ?Sized,
{
    let deadline = Instant::now() + wait.timeout;
    loop {
        let visible = page.is_visible(selector).await?;
        if visible == want_visible {
            return Ok(());
        }

        if Instant::now() >= deadline {
            let (expectation, actual) = if want_visible {
                ("to be visible", "hidden or missing")
            } else {
                ("not to be visible", "visible")
            };
            return Err(BrowserError::Expectation {
                selector: selector.to_string(),
                expectation: expectation.to_string(),
                actual: actual.to_string(),
            });
        }
        tokio::time::sleep(wait.interval).await;
    }
}
