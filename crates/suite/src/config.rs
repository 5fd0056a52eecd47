//! Suite configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BASE_URL` - Store base URL (e.g., `http://localhost:8086/`)
//! - `CONSUMER_KEY` - WooCommerce REST API consumer key (`ck_...`)
//! - `CONSUMER_SECRET` - WooCommerce REST API consumer secret (`cs_...`)
//!
//! ## Admin authentication (at least one)
//! - `ADMINSTATE` - Path to a saved browser storage-state JSON file
//! - `ADMIN_USER` / `ADMIN_PASSWORD` - WordPress admin login (set together)
//!
//! ## Optional
//! - `WEBDRIVER_URL` - WebDriver endpoint (default: `http://localhost:4444`)
//! - `BROWSER` - `chrome` or `firefox` (default: `chrome`)
//! - `HEADLESS` - Run the browser headless (default: `true`)
//! - `E2E_WAIT_TIMEOUT_MS` - Wait/expectation timeout (default: 10000)
//! - `E2E_POLL_INTERVAL_MS` - Wait polling interval (default: 250)
//! - `WC_API_VERSION` - REST API namespace (default: `wc/v3`)
//! - `WC_API_TIMEOUT_SECS` - REST request timeout (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::browser::WaitConfig;

const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
const DEFAULT_API_VERSION: &str = "wc/v3";
const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Complete suite configuration.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Store base URL, always ending in `/`
    pub base_url: Url,
    /// REST API configuration for setup and teardown
    pub rest: RestConfig,
    /// How the admin browser session authenticates
    pub admin_auth: AdminAuth,
    /// WebDriver session configuration
    pub browser: BrowserConfig,
    /// Uniform wait policy for navigation, element and expectation waits
    pub wait: WaitConfig,
}

/// WooCommerce REST API configuration.
///
/// Implements `Debug` manually to redact the consumer secret.
#[derive(Clone)]
pub struct RestConfig {
    /// Store base URL, always ending in `/`
    pub base_url: Url,
    /// Consumer key (`ck_...`)
    pub consumer_key: String,
    /// Consumer secret (`cs_...`)
    pub consumer_secret: SecretString,
    /// API namespace, e.g. `wc/v3`
    pub api_version: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfig")
            .field("base_url", &self.base_url.as_str())
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RestConfig {
    /// Create a REST configuration with default API version and timeout.
    #[must_use]
    pub fn new(base_url: Url, consumer_key: String, consumer_secret: SecretString) -> Self {
        Self {
            base_url,
            consumer_key,
            consumer_secret,
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }

    /// Returns true if requests go over TLS, which decides between HTTP Basic
    /// and OAuth 1.0a query-string authentication.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

/// WordPress admin credentials for logging in through `wp-login.php`.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AdminLogin {
    /// WordPress username
    pub username: String,
    /// WordPress password
    pub password: SecretString,
}

impl std::fmt::Debug for AdminLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminLogin")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Admin browser authentication.
///
/// A saved storage state is preferred; the login form is the fallback.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    /// Path to a Playwright-format storage-state JSON file
    pub storage_state: Option<PathBuf>,
    /// Credentials for the login form
    pub login: Option<AdminLogin>,
}

/// Browser engine driven through WebDriver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowserKind {
    #[default]
    Chrome,
    Firefox,
}

impl std::str::FromStr for BrowserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            _ => Err(format!("unsupported browser: {s}")),
        }
    }
}

/// WebDriver session configuration.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// WebDriver server endpoint (chromedriver, geckodriver, Selenium)
    pub webdriver_url: Url,
    /// Browser engine
    pub browser: BrowserKind,
    /// Run without a visible window
    pub headless: bool,
}

impl SuiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let base_url = normalize_base_url(&env.required("BASE_URL")?)
            .map_err(|e| ConfigError::InvalidEnvVar("BASE_URL".to_string(), e))?;

        let consumer_key = env.required("CONSUMER_KEY")?;
        let consumer_secret = env.required("CONSUMER_SECRET")?;
        warn_on_unexpected_prefix("CONSUMER_KEY", &consumer_key, "ck_");
        warn_on_unexpected_prefix("CONSUMER_SECRET", &consumer_secret, "cs_");

        let rest = RestConfig {
            base_url: base_url.clone(),
            consumer_key,
            consumer_secret: SecretString::from(consumer_secret),
            api_version: env
                .or_default("WC_API_VERSION", DEFAULT_API_VERSION)
                .trim_matches('/')
                .to_string(),
            timeout: Duration::from_secs(env.parsed_or("WC_API_TIMEOUT_SECS", DEFAULT_API_TIMEOUT_SECS)?),
        };

        let admin_auth = AdminAuth::from_env(&env)?;

        let webdriver_url = Url::parse(&env.or_default("WEBDRIVER_URL", DEFAULT_WEBDRIVER_URL))
            .map_err(|e| ConfigError::InvalidEnvVar("WEBDRIVER_URL".to_string(), e.to_string()))?;
        let browser = env
            .or_default("BROWSER", "chrome")
            .parse::<BrowserKind>()
            .map_err(|e| ConfigError::InvalidEnvVar("BROWSER".to_string(), e))?;
        let headless = parse_bool(&env.or_default("HEADLESS", "true"))
            .ok_or_else(|| ConfigError::InvalidEnvVar("HEADLESS".to_string(), "expected true or false".to_string()))?;

        let wait = WaitConfig {
            timeout: Duration::from_millis(env.parsed_or("E2E_WAIT_TIMEOUT_MS", DEFAULT_WAIT_TIMEOUT_MS)?),
            interval: Duration::from_millis(env.parsed_or("E2E_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?),
        };
        if wait.interval.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                "E2E_POLL_INTERVAL_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            rest,
            admin_auth,
            browser: BrowserConfig {
                webdriver_url,
                browser,
                headless,
            },
            wait,
        })
    }
}

impl AdminAuth {
    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_state = env.optional("ADMINSTATE").map(PathBuf::from);
        let login = match (env.optional("ADMIN_USER"), env.optional("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminLogin {
                username,
                password: SecretString::from(password),
            }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::InvalidEnvVar(
                    "ADMIN_*".to_string(),
                    "Both ADMIN_USER and ADMIN_PASSWORD must be set together".to_string(),
                ));
            }
        };

        if storage_state.is_none() && login.is_none() {
            return Err(ConfigError::MissingEnvVar(
                "ADMINSTATE (or ADMIN_USER and ADMIN_PASSWORD)".to_string(),
            ));
        }

        Ok(Self {
            storage_state,
            login,
        })
    }
}

/// Parse a store base URL and make sure it ends with `/` so relative paths
/// such as `wp-admin/post-new.php` join under it instead of replacing the
/// last path segment.
///
/// # Errors
///
/// Returns a description of the problem if the URL is invalid or not HTTP(S).
pub fn normalize_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme: {}", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn warn_on_unexpected_prefix(name: &str, value: &str, prefix: &str) {
    if !value.starts_with(prefix) {
        tracing::warn!(
            variable = name,
            expected_prefix = prefix,
            "WooCommerce API credential does not have the usual prefix"
        );
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, name: &str) -> Result<String, ConfigError> {
        self.optional(name)
            .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
    }

    fn or_default(&self, name: &str, default: &str) -> String {
        self.optional(name).unwrap_or_else(|| default.to_string())
    }

    fn parsed_or(&self, name: &str, default: u64) -> Result<u64, ConfigError> {
        self.optional(name).map_or(Ok(default), |v| {
            v.trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidEnvVar(name.to_string(), e.to_string()))
        })
    }
}
