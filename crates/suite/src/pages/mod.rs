//! Page objects for the screens the scenarios visit.
//!
//! Each page object borrows a [`Page`](crate::browser::Page) and exposes the
//! actions and reads one screen supports, keeping selectors in [`selectors`].

mod admin_product;
mod cart;
mod login;
mod product;

pub use admin_product::ProductEditorPage;
pub use cart::CartPage;
pub use login::WpLoginPage;
pub use product::ProductPage;

/// Selectors and paths of the WordPress and WooCommerce screens.
pub mod selectors {
    /// New-product editor, relative to the store base URL.
    pub const NEW_PRODUCT_PATH: &str = "wp-admin/post-new.php?post_type=product";
    /// Login form, relative to the store base URL.
    pub const LOGIN_PATH: &str = "wp-login.php";

    pub const LOGIN_USER: &str = "#user_login";
    pub const LOGIN_PASSWORD: &str = "#user_pass";
    pub const LOGIN_SUBMIT: &str = "#wp-submit";
    pub const ADMIN_BAR: &str = "#wpadminbar";

    pub const PRODUCT_TITLE_INPUT: &str = "#title";
    pub const REGULAR_PRICE_INPUT: &str = "#_regular_price";
    pub const VIRTUAL_CHECKBOX: &str = "#_virtual";
    pub const PUBLISH_BUTTON: &str = "#publish";
    pub const PUBLISH_BUTTON_ENABLED: &str = "#publish:not(.disabled)";
    pub const POST_STATUS: &str = "#post-status-display";
    pub const SUCCESS_NOTICE: &str = "div.notice-success > p";
    pub const PERMALINK: &str = "#sample-permalink a";

    pub const PRODUCT_TITLE: &str = ".product_title";
    pub const PRODUCT_PRICE: &str = ".summary .woocommerce-Price-amount";
    pub const ADD_TO_CART_TEXT: &str = "Add to cart";
    pub const VIEW_CART_TEXT: &str = "View cart";

    pub const CART_PRODUCT_CELL: &str = "td[data-title=Product]";
    pub const SHIPPING_CALCULATOR: &str = "a.shipping-calculator-button";
    pub const CART_REMOVE: &str = "a.remove";

    /// Notice shown after a successful publish.
    pub const PUBLISHED_NOTICE: &str = "Product published.";
}
