use secrecy::ExposeSecret;
use tracing::{info, instrument};

use super::selectors;
use crate::browser::{BrowserError, Page, Selector, WaitConfig, expect};
use crate::config::AdminLogin;

/// `wp-login.php`.
pub struct WpLoginPage<'a, P: Page + ?Sized> {
    page: &'a P,
    wait: WaitConfig,
}

impl<'a, P: Page + ?Sized> WpLoginPage<'a, P> {
    pub const fn new(page: &'a P, wait: WaitConfig) -> Self {
        Self { page, wait }
    }

    /// Log in and wait for the admin bar of the dashboard.
    ///
    /// # Errors
    ///
    /// Returns a `BrowserError` if the form is missing or the admin bar never
    /// appears (wrong credentials keep the browser on the login form).
    #[instrument(skip_all, fields(username = %login.username))]
    pub async fn log_in(&self, login: &AdminLogin) -> Result<(), BrowserError> {
        self.page.goto(selectors::LOGIN_PATH).await?;
        self.page
            .fill(&Selector::css(selectors::LOGIN_USER), &login.username)
            .await?;
        self.page
            .fill(
                &Selector::css(selectors::LOGIN_PASSWORD),
                login.password.expose_secret(),
            )
            .await?;
        self.page.click(&Selector::css(selectors::LOGIN_SUBMIT)).await?;
        self.page.wait_for_network_idle().await?;
        expect::to_be_visible(self.page, &Selector::css(selectors::ADMIN_BAR), self.wait).await?;
        info!("Admin logged in");
        Ok(())
    }
}
