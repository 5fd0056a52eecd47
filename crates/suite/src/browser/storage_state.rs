//! Saved browser authentication state.
//!
//! Reads the storage-state JSON that Playwright's `context.storageState()`
//! writes after an admin login, so an already-authenticated admin session
//! can be restored into a WebDriver browser by injecting its cookies.

use std::path::Path;

use serde::Deserialize;

use super::BrowserError;

/// Parsed storage-state file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageState {
    /// Cookies of the saved context.
    #[serde(default)]
    pub cookies: Vec<StorageStateCookie>,
}

/// One cookie of a saved context.
///
/// `httpOnly` is not read: the WebDriver client cannot set it on injected
/// cookies.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStateCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    /// Unix timestamp in seconds; `-1` for session cookies.
    #[serde(default = "session_expiry")]
    pub expires: f64,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub same_site: Option<String>,
}

fn default_path() -> String {
    "/".to_string()
}

const fn session_expiry() -> f64 {
    -1.0
}

impl StorageState {
    /// Parse storage-state JSON.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::StorageState` if the JSON is malformed.
    pub fn parse(json: &str) -> Result<Self, BrowserError> {
        serde_json::from_str(json).map_err(|e| BrowserError::StorageState(e.to_string()))
    }

    /// Read and parse a storage-state file.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::StorageState` if the file cannot be read or
    /// parsed.
    pub async fn load(path: &Path) -> Result<Self, BrowserError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BrowserError::StorageState(format!("{}: {e}", path.display())))?;
        Self::parse(&json)
    }

    /// Cookies a browser on `host` would send, skipping expired ones.
    ///
    /// `now` is a Unix timestamp in seconds.
    #[must_use]
    pub fn cookies_for_host(&self, host: &str, now: i64) -> Vec<&StorageStateCookie> {
        self.cookies
            .iter()
            .filter(|cookie| cookie.matches_host(host))
            .filter(|cookie| !cookie.is_expired(now))
            .collect()
    }
}

impl StorageStateCookie {
    /// Domain-match per RFC 6265: exact host, or a subdomain when the cookie
    /// domain has a leading dot.
    #[must_use]
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        let domain = self.domain.to_ascii_lowercase();
        domain.strip_prefix('.').map_or_else(
            || host == domain,
            |bare| host == bare || host.ends_with(&format!(".{bare}")),
        )
    }

    /// Session cookies (negative expiry) never expire here.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires >= 0.0 && self.expires < now as f64
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const STATE: &str = r#"{
        "cookies": [
            {
                "name": "wordpress_logged_in_abc",
                "value": "admin%7C123",
                "domain": "localhost",
                "path": "/",
                "expires": -1,
                "httpOnly": true,
                "secure": false,
                "sameSite": "Lax"
            },
            {
                "name": "wp-settings-1",
                "value": "libraryContent%3Dbrowse",
                "domain": ".shop.test",
                "path": "/",
                "expires": 1700000000,
                "httpOnly": false,
                "secure": false,
                "sameSite": "Lax"
            },
            {
                "name": "tracking",
                "value": "x",
                "domain": "other.test"
            }
        ],
        "origins": [
            { "origin": "http://localhost", "localStorage": [] }
        ]
    }"#;

    #[test]
    fn test_parse_playwright_state() {
        let state = StorageState::parse(STATE).unwrap();
        assert_eq!(state.cookies.len(), 3);
        assert_eq!(state.cookies[0].same_site.as_deref(), Some("Lax"));
        assert_eq!(state.cookies[2].path, "/");
        assert!(state.cookies[2].expires < 0.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            StorageState::parse("not json"),
            Err(BrowserError::StorageState(_))
        ));
    }

    #[test]
    fn test_cookies_for_exact_host() {
        let state = StorageState::parse(STATE).unwrap();
        let cookies = state.cookies_for_host("localhost", 0);
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name, "wordpress_logged_in_abc");
    }

    #[test]
    fn test_cookies_for_subdomain_and_expiry() {
        let state = StorageState::parse(STATE).unwrap();
        assert_eq!(state.cookies_for_host("www.shop.test", 1_600_000_000).len(), 1);
        assert_eq!(state.cookies_for_host("shop.test", 1_600_000_000).len(), 1);
        assert!(state.cookies_for_host("shop.test", 1_800_000_000).is_empty());
        assert!(state.cookies_for_host("notshop.test", 0).is_empty());
    }
}
