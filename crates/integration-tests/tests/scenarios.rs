//! The four scenarios and the runner, driven through the in-memory browser.

#![allow(clippy::unwrap_used)]

use woo_e2e_core::{PostStatus, ProductFixture, VIRTUAL_PRODUCT_NAME};
use woo_e2e_integration_tests::{FakeBrowser, FakeStore, permalink_for};
use woo_e2e_suite::browser::{BrowserError, WaitConfig};
use woo_e2e_suite::config::AdminLogin;
use woo_e2e_suite::pages::WpLoginPage;
use woo_e2e_suite::scenarios::{
    DRAFT_REPUBLISH_ATTEMPTS, create_simple_product, shopper_adds_to_cart,
};
use woo_e2e_suite::{ScenarioId, ScenarioStatus, SuiteError, SuiteRunner};

fn wait() -> WaitConfig {
    WaitConfig::quick()
}

// ============================================================================
// Product creation
// ============================================================================

#[tokio::test]
async fn test_create_virtual_product() {
    let store = FakeStore::new();
    let admin = FakeBrowser::new(store.clone());
    let fixture = ProductFixture::virtual_product();

    let published = create_simple_product(&admin, &fixture, wait()).await.unwrap();

    assert_eq!(published.permalink, permalink_for(VIRTUAL_PRODUCT_NAME));
    assert_eq!(published.republish_attempts, 0);
    assert_eq!(admin.count("click #_virtual"), 1);
    assert_eq!(admin.count("click #publish"), 1);

    let products = store.products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Virtual Product Name");
    assert_eq!(products[0].regular_price, "9.99");
    assert_eq!(products[0].status, PostStatus::Publish);
    assert!(products[0].is_virtual);
}

#[tokio::test]
async fn test_create_non_virtual_product_leaves_virtual_unset() {
    let store = FakeStore::new();
    let admin = FakeBrowser::new(store.clone());

    create_simple_product(&admin, &ProductFixture::non_virtual_product(), wait())
        .await
        .unwrap();

    assert_eq!(admin.count("click #_virtual"), 0);
    assert!(!store.products()[0].is_virtual);
}

#[tokio::test]
async fn test_draft_save_is_republished_once() {
    let store = FakeStore::new();
    let admin = FakeBrowser::new(store.clone()).with_draft_saves(1);

    let published = create_simple_product(&admin, &ProductFixture::virtual_product(), wait())
        .await
        .unwrap();

    assert_eq!(published.republish_attempts, 1);
    assert_eq!(admin.count("click #publish"), 2);
    assert_eq!(store.products().len(), 1);
    assert_eq!(store.products()[0].status, PostStatus::Publish);
}

#[tokio::test]
async fn test_second_draft_save_fails_the_scenario() {
    let store = FakeStore::new();
    let admin = FakeBrowser::new(store.clone()).with_draft_saves(2);

    let err = create_simple_product(&admin, &ProductFixture::virtual_product(), wait())
        .await
        .unwrap_err();

    assert!(matches!(err, SuiteError::Scenario { ref scenario, .. }
        if scenario == "can create simple virtual product"));
    let clicks = admin.count("click #publish");
    assert_eq!(clicks, 1 + DRAFT_REPUBLISH_ATTEMPTS as usize);
    assert_eq!(store.products()[0].status, PostStatus::Draft);
}

#[tokio::test]
async fn test_disabled_publish_button_fails_non_virtual_creation() {
    let store = FakeStore::new();
    let admin = FakeBrowser::new(store.clone()).with_publish_disabled();

    let err = create_simple_product(&admin, &ProductFixture::non_virtual_product(), wait())
        .await
        .unwrap_err();

    match err {
        SuiteError::Browser(BrowserError::Expectation { selector, .. }) => {
            assert_eq!(selector, "#publish:not(.disabled)");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(admin.count("click #publish"), 0);
}

// ============================================================================
// Shopper
// ============================================================================

#[tokio::test]
async fn test_shopper_virtual_product_has_no_shipping_calculator() {
    let store = FakeStore::new();
    let admin = FakeBrowser::new(store.clone());
    let shopper = FakeBrowser::new(store.clone());

    let published = create_simple_product(&admin, &ProductFixture::virtual_product(), wait())
        .await
        .unwrap();
    shopper_adds_to_cart(&shopper, &published, wait())
        .await
        .unwrap();

    let actions = shopper.actions();
    assert_eq!(actions[0], "reset session");
    assert_eq!(actions[1], format!("goto {}", published.permalink));
    assert!(actions.contains(&"click text=Add to cart".to_string()));
    assert!(actions.contains(&"click text=View cart".to_string()));
    assert!(actions.contains(&"click a.remove".to_string()));
    assert!(shopper.cart().is_empty());
    assert!(admin.cart().is_empty());
}

#[tokio::test]
async fn test_shopper_non_virtual_product_has_shipping_calculator() {
    let store = FakeStore::new();
    let admin = FakeBrowser::new(store.clone());
    let shopper = FakeBrowser::new(store.clone());

    let published =
        create_simple_product(&admin, &ProductFixture::non_virtual_product(), wait())
            .await
            .unwrap();
    shopper_adds_to_cart(&shopper, &published, wait())
        .await
        .unwrap();

    assert!(shopper.cart().is_empty());
}

#[tokio::test]
async fn test_calculator_on_virtual_cart_fails() {
    let store = FakeStore::new();
    let admin = FakeBrowser::new(store.clone());
    let shopper = FakeBrowser::new(store.clone()).with_calculator_always_shown();

    let published = create_simple_product(&admin, &ProductFixture::virtual_product(), wait())
        .await
        .unwrap();
    let err = shopper_adds_to_cart(&shopper, &published, wait())
        .await
        .unwrap_err();

    match err {
        SuiteError::Browser(BrowserError::Expectation {
            selector,
            expectation,
            ..
        }) => {
            assert_eq!(selector, "a.shipping-calculator-button");
            assert!(expectation.contains("not"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_shopper_cannot_see_unpublished_product() {
    let store = FakeStore::new();
    let admin = FakeBrowser::new(store.clone());
    let shopper = FakeBrowser::new(store.clone());

    let mut published =
        create_simple_product(&admin, &ProductFixture::virtual_product(), wait())
            .await
            .unwrap();
    published.permalink = permalink_for("Some Other Product");

    let err = shopper_adds_to_cart(&shopper, &published, wait())
        .await
        .unwrap_err();
    assert!(matches!(err, SuiteError::Browser(BrowserError::Expectation { .. })));
}

// ============================================================================
// Admin login
// ============================================================================

#[tokio::test]
async fn test_wp_login() {
    let store = FakeStore::new();
    let admin = FakeBrowser::new(store).with_credentials("admin", "password");
    let login = AdminLogin {
        username: "admin".to_string(),
        password: "password".to_string().into(),
    };

    WpLoginPage::new(&admin, wait()).log_in(&login).await.unwrap();
    assert!(admin.actions().contains(&"click #wp-submit".to_string()));
}

#[tokio::test]
async fn test_wp_login_wrong_password() {
    let store = FakeStore::new();
    let admin = FakeBrowser::new(store).with_credentials("admin", "password");
    let login = AdminLogin {
        username: "admin".to_string(),
        password: "wrong".to_string().into(),
    };

    let err = WpLoginPage::new(&admin, wait()).log_in(&login).await.unwrap_err();
    assert!(matches!(err, BrowserError::Expectation { ref selector, .. } if selector == "#wpadminbar"));
}

// ============================================================================
// Runner
// ============================================================================

#[tokio::test]
async fn test_full_run_passes_and_cleans_up() {
    let store = FakeStore::new();
    let admin = FakeBrowser::new(store.clone());
    let shopper = FakeBrowser::new(store.clone());

    let report = SuiteRunner::new(&*store, &admin, &shopper, wait()).run().await;

    assert!(report.is_success(), "{}", report.to_json().unwrap());
    let ids: Vec<ScenarioId> = report.scenarios.iter().map(|s| s.id).collect();
    assert_eq!(ids, ScenarioId::ALL.to_vec());
    assert_eq!(report.teardown.deleted_products.len(), 2);
    assert!(report.teardown.zone_deleted);
    assert!(store.products().is_empty());
    assert!(store.zones().is_empty());
}

#[tokio::test]
async fn test_failed_create_skips_its_shopper_scenario_only() {
    let store = FakeStore::new();
    let admin = FakeBrowser::new(store.clone()).with_draft_saves(2);
    let shopper = FakeBrowser::new(store.clone());

    let report = SuiteRunner::new(&*store, &admin, &shopper, wait()).run().await;

    assert!(!report.is_success());
    let statuses: Vec<&ScenarioStatus> = report.scenarios.iter().map(|s| &s.status).collect();
    assert!(matches!(statuses[0], ScenarioStatus::Failed(_)));
    assert!(matches!(statuses[1], ScenarioStatus::Skipped(_)));
    assert_eq!(*statuses[2], ScenarioStatus::Passed);
    assert_eq!(*statuses[3], ScenarioStatus::Passed);

    // The draft left behind by the failed scenario is cleaned up too.
    assert!(report.teardown.is_clean());
    assert_eq!(report.teardown.deleted_products.len(), 2);
    assert!(store.products().is_empty());
}

#[tokio::test]
async fn test_setup_failure_skips_everything_but_teardown_runs() {
    let store = FakeStore::new();
    store.fail_zone_creation();
    let leftover = store.insert_product(VIRTUAL_PRODUCT_NAME, PostStatus::Publish, true);
    let admin = FakeBrowser::new(store.clone());
    let shopper = FakeBrowser::new(store.clone());

    let report = SuiteRunner::new(&*store, &admin, &shopper, wait()).run().await;

    assert!(report.setup_error.is_some());
    assert!(
        report
            .scenarios
            .iter()
            .all(|s| matches!(s.status, ScenarioStatus::Skipped(_)))
    );
    assert!(admin.actions().is_empty());
    assert_eq!(report.teardown.deleted_products, vec![leftover]);
    assert!(!report.teardown.zone_deleted);
}

#[tokio::test]
async fn test_failed_shopper_scenario_leaves_nothing_in_next_cart() {
    let store = FakeStore::new();
    let admin = FakeBrowser::new(store.clone());
    let shopper = FakeBrowser::new(store.clone()).with_calculator_always_shown();

    let report = SuiteRunner::new(&*store, &admin, &shopper, wait()).run().await;

    let statuses: Vec<&ScenarioStatus> = report.scenarios.iter().map(|s| &s.status).collect();
    assert_eq!(*statuses[0], ScenarioStatus::Passed);
    assert!(matches!(statuses[1], ScenarioStatus::Failed(reason)
        if reason.contains("a.shipping-calculator-button")));
    assert_eq!(*statuses[2], ScenarioStatus::Passed);
    assert_eq!(*statuses[3], ScenarioStatus::Passed);

    assert_eq!(shopper.count("reset session"), 2);
    assert!(shopper.cart().is_empty());
}

#[tokio::test]
async fn test_partial_setup_zone_is_deleted_by_teardown() {
    let store = FakeStore::new();
    store.fail_zone_method();
    let admin = FakeBrowser::new(store.clone());
    let shopper = FakeBrowser::new(store.clone());

    let report = SuiteRunner::new(&*store, &admin, &shopper, wait()).run().await;

    assert!(report.setup_error.unwrap().contains("500"));
    assert!(
        report
            .scenarios
            .iter()
            .all(|s| matches!(s.status, ScenarioStatus::Skipped(_)))
    );
    assert!(report.teardown.zone_deleted);
    assert!(report.teardown.is_clean());
    assert!(store.zones().is_empty());
}

#[tokio::test]
async fn test_only_pulls_in_dependencies() {
    let store = FakeStore::new();
    let admin = FakeBrowser::new(store.clone());
    let shopper = FakeBrowser::new(store.clone());

    let runner = SuiteRunner::new(&*store, &admin, &shopper, wait())
        .only(&[ScenarioId::AddNonVirtualProductToCart]);
    assert_eq!(
        runner.selected(),
        vec![
            ScenarioId::CreateNonVirtualProduct,
            ScenarioId::AddNonVirtualProductToCart
        ]
    );

    let report = runner.run().await;
    assert!(report.is_success());
    assert_eq!(report.scenarios.len(), 2);
    assert_eq!(admin.count("click #_virtual"), 0);
}

#[tokio::test]
async fn test_report_json_shape() {
    let store = FakeStore::new();
    let admin = FakeBrowser::new(store.clone()).with_draft_saves(2);
    let shopper = FakeBrowser::new(store.clone());

    let report = SuiteRunner::new(&*store, &admin, &shopper, wait())
        .only(&[ScenarioId::CreateVirtualProduct])
        .run()
        .await;
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    let scenario = &json["scenarios"][0];
    assert_eq!(scenario["id"], "create-virtual-product");
    assert_eq!(scenario["title"], "can create simple virtual product");
    assert_eq!(scenario["status"], "failed");
    assert!(scenario["detail"].as_str().unwrap().contains("draft"));
    assert!(json["run_id"].is_string());
    assert!(json["teardown"]["zone_deleted"].as_bool().unwrap());
}
