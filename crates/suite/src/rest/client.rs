//! HTTP implementation of [`StoreApi`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;
use woo_e2e_core::{ProductId, ShippingMethodKind, ShippingZoneId};

use super::oauth::signed_query;
use super::types::ApiErrorBody;
use super::{
    Paged, Product, ProductQuery, ShippingZone, ShippingZoneMethod, StoreApi, WooError,
    ZoneLocation,
};
use crate::config::RestConfig;

/// Header carrying the page count of a paginated listing.
const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";

/// How requests authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    /// HTTP Basic with key/secret (HTTPS stores).
    Basic,
    /// OAuth 1.0a signature in the query string (plain-HTTP stores).
    OAuth1,
}

/// WooCommerce REST API client.
#[derive(Clone)]
pub struct WooClient {
    inner: Arc<WooClientInner>,
}

struct WooClientInner {
    client: reqwest::Client,
    /// `{store}/wp-json/{version}/`
    api_base: Url,
    consumer_key: String,
    consumer_secret: SecretString,
    auth: AuthMode,
}

impl std::fmt::Debug for WooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WooClient")
            .field("api_base", &self.inner.api_base.as_str())
            .field("consumer_key", &self.inner.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("auth", &self.inner.auth)
            .finish()
    }
}

impl WooClient {
    /// Create a new REST API client.
    ///
    /// # Errors
    ///
    /// Returns error if the API URL is invalid or the HTTP client fails to
    /// build.
    pub fn new(config: &RestConfig) -> Result<Self, WooError> {
        let api_base = config
            .base_url
            .join(&format!("wp-json/{}/", config.api_version.trim_matches('/')))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let auth = if config.is_https() {
            AuthMode::Basic
        } else {
            AuthMode::OAuth1
        };

        Ok(Self {
            inner: Arc::new(WooClientInner {
                client,
                api_base,
                consumer_key: config.consumer_key.clone(),
                consumer_secret: config.consumer_secret.clone(),
                auth,
            }),
        })
    }

    /// Base URL all API paths resolve against.
    #[must_use]
    pub fn api_base(&self) -> &Url {
        &self.inner.api_base
    }

    /// Send an authenticated request.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<serde_json::Value>,
    ) -> Result<Response, WooError> {
        let url = self.inner.api_base.join(path)?;

        let builder = match self.inner.auth {
            AuthMode::Basic => self
                .inner
                .client
                .request(method, url)
                .query(query)
                .basic_auth(
                    &self.inner.consumer_key,
                    Some(self.inner.consumer_secret.expose_secret()),
                ),
            AuthMode::OAuth1 => {
                let nonce = uuid::Uuid::new_v4().simple().to_string();
                let timestamp = chrono::Utc::now().timestamp();
                let signed = signed_query(
                    method.as_str(),
                    &url,
                    query,
                    &self.inner.consumer_key,
                    self.inner.consumer_secret.expose_secret(),
                    &nonce,
                    timestamp,
                )?;
                self.inner.client.request(method, url).query(&signed)
            }
        };

        let builder = match body {
            Some(body) => builder.json(&body),
            None => builder,
        };

        Ok(builder.send().await?)
    }

    /// Execute a GET request and parse the JSON body.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<(T, u32), WooError> {
        let response = self.send(Method::GET, path, query, None).await?;
        let total_pages = response
            .headers()
            .get(TOTAL_PAGES_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(1);
        let body = self.handle_response(response).await?;
        Ok((body, total_pages))
    }

    /// Execute a request with a JSON body and parse the JSON response.
    async fn send_json<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, WooError> {
        let body = serde_json::to_value(body).map_err(|e| WooError::Parse(e.to_string()))?;
        let response = self.send(method, path, &[], Some(body)).await?;
        self.handle_response(response).await
    }

    /// Execute a DELETE request, discarding the returned resource.
    async fn delete(&self, path: &str, force: bool) -> Result<(), WooError> {
        let query = [("force".to_string(), force.to_string())];
        let response = self.send(Method::DELETE, path, &query, None).await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(self.parse_error(response).await)
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T, WooError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| WooError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(self.parse_error(response).await)
    }

    /// Parse a WordPress REST error response.
    async fn parse_error(&self, response: Response) -> WooError {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return WooError::RateLimited(retry_after);
        }

        let url = response.url().path().to_string();
        let text = response.text().await.unwrap_or_default();
        let body: Option<ApiErrorBody> = serde_json::from_str(&text).ok();
        let (code, message) = body.map_or_else(
            || (String::new(), text.clone()),
            |b| (b.code, b.message),
        );

        debug!(status = status.as_u16(), code = %code, "WooCommerce API error");

        match status {
            StatusCode::NOT_FOUND => WooError::NotFound(if message.is_empty() {
                url
            } else {
                format!("{url}: {message}")
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => WooError::Unauthorized(message),
            _ => WooError::Api {
                status: status.as_u16(),
                code,
                message,
            },
        }
    }
}

#[async_trait]
impl StoreApi for WooClient {
    #[instrument(skip(self))]
    async fn create_shipping_zone(&self, name: &str) -> Result<ShippingZone, WooError> {
        self.send_json(
            Method::POST,
            "shipping/zones",
            &serde_json::json!({ "name": name }),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_shipping_zones(&self) -> Result<Vec<ShippingZone>, WooError> {
        let (zones, _) = self.get("shipping/zones", &[]).await?;
        Ok(zones)
    }

    #[instrument(skip(self, locations), fields(count = locations.len()))]
    async fn update_shipping_zone_locations(
        &self,
        zone: ShippingZoneId,
        locations: &[ZoneLocation],
    ) -> Result<Vec<ZoneLocation>, WooError> {
        self.send_json(
            Method::PUT,
            &format!("shipping/zones/{zone}/locations"),
            &locations,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn add_shipping_zone_method(
        &self,
        zone: ShippingZoneId,
        method: ShippingMethodKind,
    ) -> Result<ShippingZoneMethod, WooError> {
        self.send_json(
            Method::POST,
            &format!("shipping/zones/{zone}/methods"),
            &serde_json::json!({ "method_id": method.method_id() }),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_shipping_zone(&self, zone: ShippingZoneId, force: bool) -> Result<(), WooError> {
        self.delete(&format!("shipping/zones/{zone}"), force).await
    }

    #[instrument(skip(self))]
    async fn list_products(&self, query: &ProductQuery) -> Result<Paged<Product>, WooError> {
        let (items, total_pages) = self.get("products", &query.to_pairs()).await?;
        Ok(Paged { items, total_pages })
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, product: ProductId, force: bool) -> Result<(), WooError> {
        self.delete(&format!("products/{product}"), force).await
    }
}
