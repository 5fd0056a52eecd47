//! The admin and shopper browser sessions of a run.

use tracing::{info, instrument, warn};

use crate::browser::{BrowserError, StorageState, WebDriverPage};
use crate::config::SuiteConfig;
use crate::error::SuiteError;
use crate::pages::WpLoginPage;

/// Two independent browser sessions: an authenticated admin and an
/// anonymous shopper with its own cart.
#[derive(Debug)]
pub struct BrowserSessions {
    pub admin: WebDriverPage,
    pub shopper: WebDriverPage,
}

impl BrowserSessions {
    /// Start both sessions and authenticate the admin one.
    ///
    /// The admin session restores the saved storage state when configured,
    /// falling back to the login form if the state cannot be read and
    /// credentials are available.
    ///
    /// # Errors
    ///
    /// Returns a `SuiteError` if a session cannot be started or the admin
    /// cannot be authenticated. Sessions already started are closed first.
    #[instrument(skip_all)]
    pub async fn open(config: &SuiteConfig) -> Result<Self, SuiteError> {
        let admin = WebDriverPage::connect(&config.browser, config.base_url.clone(), config.wait)
            .await?;

        if let Err(e) = authenticate_admin(&admin, config).await {
            close_quietly(admin).await;
            return Err(e);
        }

        let shopper =
            match WebDriverPage::connect(&config.browser, config.base_url.clone(), config.wait)
                .await
            {
                Ok(shopper) => shopper,
                Err(e) => {
                    close_quietly(admin).await;
                    return Err(e.into());
                }
            };

        info!("Admin and shopper sessions ready");
        Ok(Self { admin, shopper })
    }

    /// End both sessions.
    ///
    /// # Errors
    ///
    /// Returns the first `BrowserError`; both sessions are always asked to
    /// quit.
    pub async fn close(self) -> Result<(), BrowserError> {
        let admin = self.admin.quit().await;
        let shopper = self.shopper.quit().await;
        admin.and(shopper)
    }
}

async fn authenticate_admin(admin: &WebDriverPage, config: &SuiteConfig) -> Result<(), SuiteError> {
    let auth = &config.admin_auth;

    if let Some(path) = &auth.storage_state {
        match StorageState::load(path).await {
            Ok(state) => {
                let restored = admin.restore_storage_state(&state).await?;
                if restored > 0 || auth.login.is_none() {
                    return Ok(());
                }
                warn!(path = %path.display(), "Storage state has no cookies for the store; logging in instead");
            }
            Err(e) if auth.login.is_some() => {
                warn!(error = %e, "Could not load storage state; logging in instead");
            }
            Err(e) => return Err(e.into()),
        }
    }

    match &auth.login {
        Some(login) => {
            WpLoginPage::new(admin, config.wait).log_in(login).await?;
            Ok(())
        }
        None => Err(SuiteError::MissingPrecondition(
            "no admin storage state or login configured".to_string(),
        )),
    }
}

async fn close_quietly(page: WebDriverPage) {
    if let Err(e) = page.quit().await {
        warn!(error = %e, "Failed to close browser session");
    }
}
