use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use super::BrowserError;

/// Uniform wait policy: how long to keep retrying and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Give up after this long.
    pub timeout: Duration,
    /// Delay between attempts.
    pub interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            interval: Duration::from_millis(250),
        }
    }
}

impl WaitConfig {
    /// A short policy, for fakes and unit tests.
    #[must_use]
    pub const fn quick() -> Self {
        Self {
            timeout: Duration::from_millis(200),
            interval: Duration::from_millis(10),
        }
    }
}

/// Poll `check` until it returns `Ok(true)`.
///
/// The check runs at least once even with a zero timeout. Errors from the
/// check end the wait immediately.
///
/// # Errors
///
/// Returns `BrowserError::Timeout` naming `what` if the condition never held,
/// or the first error the check returned.
pub async fn poll_until<F, Fut>(wait: WaitConfig, what: &str, mut check: F) -> Result<(), BrowserError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, BrowserError>>,
{
    let deadline = Instant::now() + wait.timeout;
    loop {
        if check().await? {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(BrowserError::Timeout(what.to_string()));
        }
        tokio::time::sleep(wait.interval).await;
    }
}
