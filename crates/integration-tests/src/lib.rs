//! Integration tests for the WooCommerce end-to-end suite.
//!
//! # Running Tests
//!
//! ```bash
//! # Fakes and the mock REST server, no store needed
//! cargo test -p woo-e2e-integration-tests
//!
//! # Against a real store and WebDriver (see .env.example)
//! cargo test -p woo-e2e-integration-tests -- --ignored
//! ```
//!
//! # Fakes
//!
//! - [`FakeStore`] - in-memory [`StoreApi`] that records every call
//! - [`FakeBrowser`] - in-memory [`Page`] rendering the product editor,
//!   product pages and the cart from a shared [`FakeStore`]
//!
//! Both expose knobs for the store misbehaviours the suite must survive or
//! report.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use woo_e2e_core::{
    PostStatus, ProductId, ShippingMethodInstanceId, ShippingMethodKind, ShippingZoneId,
};
use woo_e2e_suite::browser::{BrowserError, Page, Selector};
use woo_e2e_suite::pages::selectors;
use woo_e2e_suite::rest::{
    Paged, Product, ProductQuery, ShippingZone, ShippingZoneMethod, StoreApi, WooError,
    ZoneLocation,
};

/// Base URL the fakes render permalinks under.
pub const FAKE_BASE_URL: &str = "http://store.test/";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// FakeStore
// ============================================================================

/// A shipping zone as the fake store holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeZone {
    pub zone: ShippingZone,
    pub locations: Vec<ZoneLocation>,
    pub methods: Vec<ShippingZoneMethod>,
}

#[derive(Debug, Default)]
struct StoreState {
    next_id: u64,
    zones: BTreeMap<ShippingZoneId, FakeZone>,
    products: BTreeMap<ProductId, Product>,
    calls: Vec<String>,
    fail_zone_creation: bool,
    fail_zone_method: bool,
    fail_product_listing: bool,
    failing_deletes: HashSet<ProductId>,
}

impl StoreState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory WooCommerce store.
#[derive(Debug, Default)]
pub struct FakeStore {
    state: Mutex<StoreState>,
}

impl FakeStore {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `POST shipping/zones` fail with a 500.
    pub fn fail_zone_creation(&self) {
        lock(&self.state).fail_zone_creation = true;
    }

    /// Make `POST shipping/zones/{id}/methods` fail with a 500. The zone
    /// itself is still created.
    pub fn fail_zone_method(&self) {
        lock(&self.state).fail_zone_method = true;
    }

    /// Make `GET products` fail with a 500.
    pub fn fail_product_listing(&self) {
        lock(&self.state).fail_product_listing = true;
    }

    /// Make `DELETE products/{id}` fail with a 500 for this product.
    pub fn fail_delete_of(&self, id: ProductId) {
        lock(&self.state).failing_deletes.insert(id);
    }

    /// Add a product directly, as another user of the store would.
    pub fn insert_product(&self, name: &str, status: PostStatus, is_virtual: bool) -> ProductId {
        let mut state = lock(&self.state);
        let id = ProductId::new(state.next_id());
        state.products.insert(
            id,
            Product {
                id,
                name: name.to_string(),
                permalink: permalink_for(name),
                status,
                is_virtual,
                regular_price: "9.99".to_string(),
            },
        );
        id
    }

    /// Add an unrelated shipping zone.
    pub fn insert_zone(&self, name: &str) -> ShippingZoneId {
        let mut state = lock(&self.state);
        let id = ShippingZoneId::new(state.next_id());
        state.zones.insert(
            id,
            FakeZone {
                zone: ShippingZone {
                    id,
                    name: name.to_string(),
                    order: 0,
                },
                locations: Vec::new(),
                methods: Vec::new(),
            },
        );
        id
    }

    /// Create or update a product saved from the admin editor.
    pub fn save_product(
        &self,
        id: Option<ProductId>,
        name: &str,
        price: &str,
        is_virtual: bool,
        status: PostStatus,
    ) -> Product {
        let mut state = lock(&self.state);
        let id = id.unwrap_or_else(|| ProductId::new(state.next_id()));
        let product = Product {
            id,
            name: name.to_string(),
            permalink: permalink_for(name),
            status,
            is_virtual,
            regular_price: price.to_string(),
        };
        state.products.insert(id, product.clone());
        product
    }

    /// Every product, by id.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        lock(&self.state).products.values().cloned().collect()
    }

    /// A published product by permalink.
    #[must_use]
    pub fn published_at(&self, url: &str) -> Option<Product> {
        lock(&self.state)
            .products
            .values()
            .find(|p| p.permalink == url && p.status == PostStatus::Publish)
            .cloned()
    }

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<Product> {
        lock(&self.state).products.get(&id).cloned()
    }

    /// Every shipping zone, by id.
    #[must_use]
    pub fn zones(&self) -> Vec<FakeZone> {
        lock(&self.state).zones.values().cloned().collect()
    }

    /// REST calls received, e.g. `DELETE products/3?force=true`.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        lock(&self.state).calls.clone()
    }

    fn record(state: &mut StoreState, call: String) {
        state.calls.push(call);
    }
}

fn server_error(message: &str) -> WooError {
    WooError::Api {
        status: 500,
        code: "internal_server_error".to_string(),
        message: message.to_string(),
    }
}

/// Permalink WordPress would assign a product with this name.
#[must_use]
pub fn permalink_for(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("{FAKE_BASE_URL}product/{slug}/")
}

#[async_trait]
impl StoreApi for FakeStore {
    async fn create_shipping_zone(&self, name: &str) -> Result<ShippingZone, WooError> {
        let mut state = lock(&self.state);
        Self::record(&mut state, "POST shipping/zones".to_string());
        if state.fail_zone_creation {
            return Err(server_error("zone creation disabled"));
        }
        let id = ShippingZoneId::new(state.next_id());
        let zone = ShippingZone {
            id,
            name: name.to_string(),
            order: 0,
        };
        state.zones.insert(
            id,
            FakeZone {
                zone: zone.clone(),
                locations: Vec::new(),
                methods: Vec::new(),
            },
        );
        Ok(zone)
    }

    async fn list_shipping_zones(&self) -> Result<Vec<ShippingZone>, WooError> {
        let mut state = lock(&self.state);
        Self::record(&mut state, "GET shipping/zones".to_string());
        Ok(state.zones.values().map(|z| z.zone.clone()).collect())
    }

    async fn update_shipping_zone_locations(
        &self,
        zone: ShippingZoneId,
        locations: &[ZoneLocation],
    ) -> Result<Vec<ZoneLocation>, WooError> {
        let mut state = lock(&self.state);
        Self::record(&mut state, format!("PUT shipping/zones/{zone}/locations"));
        let entry = state
            .zones
            .get_mut(&zone)
            .ok_or_else(|| WooError::NotFound(format!("shipping/zones/{zone}")))?;
        entry.locations = locations.to_vec();
        Ok(entry.locations.clone())
    }

    async fn add_shipping_zone_method(
        &self,
        zone: ShippingZoneId,
        method: ShippingMethodKind,
    ) -> Result<ShippingZoneMethod, WooError> {
        let mut state = lock(&self.state);
        Self::record(&mut state, format!("POST shipping/zones/{zone}/methods"));
        if state.fail_zone_method {
            return Err(server_error("method creation disabled"));
        }
        let instance_id = ShippingMethodInstanceId::new(state.next_id());
        let entry = state
            .zones
            .get_mut(&zone)
            .ok_or_else(|| WooError::NotFound(format!("shipping/zones/{zone}")))?;
        let added = ShippingZoneMethod {
            instance_id,
            method_id: method.method_id().to_string(),
            title: "Flat rate".to_string(),
            enabled: true,
        };
        entry.methods.push(added.clone());
        Ok(added)
    }

    async fn delete_shipping_zone(&self, zone: ShippingZoneId, force: bool) -> Result<(), WooError> {
        let mut state = lock(&self.state);
        Self::record(&mut state, format!("DELETE shipping/zones/{zone}?force={force}"));
        state
            .zones
            .remove(&zone)
            .map(|_| ())
            .ok_or_else(|| WooError::NotFound(format!("shipping/zones/{zone}")))
    }

    async fn list_products(&self, query: &ProductQuery) -> Result<Paged<Product>, WooError> {
        let mut state = lock(&self.state);
        Self::record(
            &mut state,
            format!(
                "GET products?page={}&per_page={}&status={}",
                query.page,
                query.per_page,
                query.status.as_deref().unwrap_or("")
            ),
        );
        if state.fail_product_listing {
            return Err(server_error("listing disabled"));
        }

        let matching: Vec<Product> = state
            .products
            .values()
            .filter(|p| match query.status.as_deref() {
                None | Some("any") => true,
                Some(status) => p.status.to_string() == status,
            })
            .cloned()
            .collect();

        let per_page = query.per_page.clamp(1, ProductQuery::MAX_PER_PAGE) as usize;
        let total_pages = u32::try_from(matching.len().div_ceil(per_page).max(1)).unwrap_or(1);
        let skip = (query.page.max(1) as usize - 1) * per_page;
        let items = matching.into_iter().skip(skip).take(per_page).collect();
        Ok(Paged { items, total_pages })
    }

    async fn delete_product(&self, product: ProductId, force: bool) -> Result<(), WooError> {
        let mut state = lock(&self.state);
        Self::record(&mut state, format!("DELETE products/{product}?force={force}"));
        if state.failing_deletes.contains(&product) {
            return Err(server_error("delete disabled"));
        }
        state
            .products
            .remove(&product)
            .map(|_| ())
            .ok_or_else(|| WooError::NotFound(format!("products/{product}")))
    }
}

// ============================================================================
// FakeBrowser
// ============================================================================

#[derive(Debug, Clone, Default)]
struct EditorState {
    title: String,
    price: String,
    is_virtual: bool,
    product: Option<ProductId>,
    status: Option<PostStatus>,
    notice: Option<String>,
}

#[derive(Debug, Clone)]
enum Screen {
    Blank,
    Login { username: String, password: String },
    Dashboard,
    Editor(EditorState),
    Product { id: ProductId, added: bool },
    Cart,
    NotFound,
}

#[derive(Debug)]
struct BrowserState {
    screen: Screen,
    cart: Vec<ProductId>,
    actions: Vec<String>,
    draft_saves_left: u32,
    publish_disabled: bool,
    always_show_calculator: bool,
    credentials: Option<(String, String)>,
}

/// An in-memory browser tab over a [`FakeStore`].
///
/// Renders just enough of wp-login, the product editor, single product pages
/// and the cart for the selectors the suite uses. Unknown selectors are
/// missing elements.
#[derive(Debug)]
pub struct FakeBrowser {
    store: Arc<FakeStore>,
    state: Mutex<BrowserState>,
}

impl FakeBrowser {
    #[must_use]
    pub fn new(store: Arc<FakeStore>) -> Self {
        Self {
            store,
            state: Mutex::new(BrowserState {
                screen: Screen::Blank,
                cart: Vec::new(),
                actions: Vec::new(),
                draft_saves_left: 0,
                publish_disabled: false,
                always_show_calculator: false,
                credentials: None,
            }),
        }
    }

    /// Save the next `n` publish clicks as drafts.
    #[must_use]
    pub fn with_draft_saves(self, n: u32) -> Self {
        lock(&self.state).draft_saves_left = n;
        self
    }

    /// Keep the publish button disabled.
    #[must_use]
    pub fn with_publish_disabled(self) -> Self {
        lock(&self.state).publish_disabled = true;
        self
    }

    /// Show the shipping calculator even for carts that need no shipping.
    #[must_use]
    pub fn with_calculator_always_shown(self) -> Self {
        lock(&self.state).always_show_calculator = true;
        self
    }

    /// Accept these wp-login credentials.
    #[must_use]
    pub fn with_credentials(self, username: &str, password: &str) -> Self {
        lock(&self.state).credentials = Some((username.to_string(), password.to_string()));
        self
    }

    /// Actions performed, e.g. `click #publish`.
    #[must_use]
    pub fn actions(&self) -> Vec<String> {
        lock(&self.state).actions.clone()
    }

    /// Number of times an action was performed.
    #[must_use]
    pub fn count(&self, action: &str) -> usize {
        lock(&self.state)
            .actions
            .iter()
            .filter(|a| *a == action)
            .count()
    }

    /// Product ids currently in this session's cart.
    #[must_use]
    pub fn cart(&self) -> Vec<ProductId> {
        lock(&self.state).cart.clone()
    }

    fn missing(selector: &Selector) -> BrowserError {
        BrowserError::ElementNotFound(selector.to_string())
    }

    fn css(selector: &Selector) -> Option<&str> {
        match selector {
            Selector::Css(css) => Some(css.as_str()),
            Selector::Text(_) => None,
        }
    }

    fn text(selector: &Selector) -> Option<&str> {
        match selector {
            Selector::Text(text) => Some(text.as_str()),
            Selector::Css(_) => None,
        }
    }

    /// Text of the element on the current screen, if it is there.
    fn read(&self, state: &BrowserState, selector: &Selector) -> Option<String> {
        let css = Self::css(selector);
        match &state.screen {
            Screen::Dashboard => (css == Some(selectors::ADMIN_BAR)).then(|| "Howdy".to_string()),
            Screen::Login { .. } => match css? {
                selectors::LOGIN_USER | selectors::LOGIN_PASSWORD => Some(String::new()),
                selectors::LOGIN_SUBMIT => Some("Log In".to_string()),
                _ => None,
            },
            Screen::Editor(editor) => match css? {
                selectors::PRODUCT_TITLE_INPUT => Some(editor.title.clone()),
                selectors::REGULAR_PRICE_INPUT => Some(editor.price.clone()),
                selectors::VIRTUAL_CHECKBOX | selectors::PUBLISH_BUTTON => Some(String::new()),
                selectors::PUBLISH_BUTTON_ENABLED => {
                    (!state.publish_disabled).then(String::new)
                }
                selectors::POST_STATUS => Some(
                    editor
                        .status
                        .unwrap_or(PostStatus::Draft)
                        .editor_label()
                        .to_string(),
                ),
                selectors::SUCCESS_NOTICE => editor.notice.clone(),
                selectors::PERMALINK => editor
                    .product
                    .and_then(|id| self.store.product(id))
                    .map(|p| p.permalink),
                _ => None,
            },
            Screen::Product { id, added } => {
                let product = self.store.product(*id)?;
                match (css, Self::text(selector)) {
                    (Some(selectors::PRODUCT_TITLE), _) => Some(product.name),
                    (Some(selectors::PRODUCT_PRICE), _) => {
                        Some(format!("${}", product.regular_price))
                    }
                    (_, Some(text)) if selectors::ADD_TO_CART_TEXT.contains(text) => {
                        Some(selectors::ADD_TO_CART_TEXT.to_string())
                    }
                    (_, Some(text)) if *added && selectors::VIEW_CART_TEXT.contains(text) => {
                        Some(selectors::VIEW_CART_TEXT.to_string())
                    }
                    _ => None,
                }
            }
            Screen::Cart => {
                let items: Vec<Product> = state
                    .cart
                    .iter()
                    .filter_map(|id| self.store.product(*id))
                    .collect();
                let first = items.first()?;
                match css? {
                    selectors::CART_PRODUCT_CELL => Some(first.name.clone()),
                    selectors::CART_REMOVE => Some("×".to_string()),
                    selectors::SHIPPING_CALCULATOR => (state.always_show_calculator
                        || items.iter().any(|p| !p.is_virtual))
                    .then(|| "Calculate shipping".to_string()),
                    _ => None,
                }
            }
            Screen::Blank | Screen::NotFound => None,
        }
    }

    fn publish(&self, state: &mut BrowserState) {
        let draft = state.draft_saves_left > 0;
        if draft {
            state.draft_saves_left -= 1;
        }
        let Screen::Editor(editor) = &mut state.screen else {
            return;
        };
        let status = if draft {
            PostStatus::Draft
        } else {
            PostStatus::Publish
        };
        let saved = self.store.save_product(
            editor.product,
            &editor.title,
            &editor.price,
            editor.is_virtual,
            status,
        );
        editor.product = Some(saved.id);
        editor.status = Some(status);
        editor.notice = (!draft).then(|| "Product published. View Product".to_string());
    }
}

#[async_trait]
impl Page for FakeBrowser {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        let mut state = lock(&self.state);
        state.actions.push(format!("goto {url}"));
        let absolute = if url.starts_with("http") {
            url.to_string()
        } else {
            format!("{FAKE_BASE_URL}{url}")
        };
        state.screen = if absolute.ends_with(selectors::NEW_PRODUCT_PATH) {
            Screen::Editor(EditorState::default())
        } else if absolute.ends_with(selectors::LOGIN_PATH) {
            Screen::Login {
                username: String::new(),
                password: String::new(),
            }
        } else if absolute.ends_with("cart/") {
            Screen::Cart
        } else if let Some(product) = self.store.published_at(&absolute) {
            Screen::Product {
                id: product.id,
                added: false,
            }
        } else {
            Screen::NotFound
        };
        Ok(())
    }

    async fn reset_session(&self) -> Result<(), BrowserError> {
        let mut state = lock(&self.state);
        state.actions.push("reset session".to_string());
        state.cart.clear();
        state.screen = Screen::Blank;
        Ok(())
    }

    async fn fill(&self, selector: &Selector, value: &str) -> Result<(), BrowserError> {
        let mut state = lock(&self.state);
        if self.read(&state, selector).is_none() {
            return Err(Self::missing(selector));
        }
        state.actions.push(format!("fill {selector}"));
        let css = Self::css(selector).unwrap_or_default();
        match &mut state.screen {
            Screen::Editor(editor) if css == selectors::PRODUCT_TITLE_INPUT => {
                editor.title = value.to_string();
            }
            Screen::Editor(editor) if css == selectors::REGULAR_PRICE_INPUT => {
                editor.price = value.to_string();
            }
            Screen::Login { username, .. } if css == selectors::LOGIN_USER => {
                *username = value.to_string();
            }
            Screen::Login { password, .. } if css == selectors::LOGIN_PASSWORD => {
                *password = value.to_string();
            }
            _ => return Err(Self::missing(selector)),
        }
        Ok(())
    }

    async fn click(&self, selector: &Selector) -> Result<(), BrowserError> {
        let mut state = lock(&self.state);
        if self.read(&state, selector).is_none() {
            return Err(Self::missing(selector));
        }
        state.actions.push(format!("click {selector}"));

        let css = Self::css(selector).unwrap_or_default();
        let text = Self::text(selector).unwrap_or_default();
        match state.screen.clone() {
            Screen::Login { username, password } if css == selectors::LOGIN_SUBMIT => {
                let accepted = state
                    .credentials
                    .as_ref()
                    .is_some_and(|(u, p)| *u == username && *p == password);
                if accepted {
                    state.screen = Screen::Dashboard;
                }
            }
            Screen::Editor(_) if css == selectors::VIRTUAL_CHECKBOX => {
                if let Screen::Editor(editor) = &mut state.screen {
                    editor.is_virtual = !editor.is_virtual;
                }
            }
            Screen::Editor(_) if css == selectors::PUBLISH_BUTTON => {
                if !state.publish_disabled {
                    self.publish(&mut state);
                }
            }
            Screen::Product { id, .. } if text == selectors::ADD_TO_CART_TEXT => {
                state.cart.push(id);
                state.screen = Screen::Product { id, added: true };
            }
            Screen::Product { .. } if text == selectors::VIEW_CART_TEXT => {
                state.screen = Screen::Cart;
            }
            Screen::Cart if css == selectors::CART_REMOVE => {
                if !state.cart.is_empty() {
                    state.cart.remove(0);
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn inner_text(&self, selector: &Selector) -> Result<String, BrowserError> {
        let state = lock(&self.state);
        self.read(&state, selector)
            .ok_or_else(|| Self::missing(selector))
    }

    async fn attribute(
        &self,
        selector: &Selector,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        let state = lock(&self.state);
        let value = self
            .read(&state, selector)
            .ok_or_else(|| Self::missing(selector))?;
        Ok((name == "href").then_some(value))
    }

    async fn is_visible(&self, selector: &Selector) -> Result<bool, BrowserError> {
        let state = lock(&self.state);
        Ok(self.read(&state, selector).is_some())
    }

    async fn wait_for_network_idle(&self) -> Result<(), BrowserError> {
        lock(&self.state).actions.push("wait network idle".to_string());
        Ok(())
    }
}
