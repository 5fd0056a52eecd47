//! `woo-e2e cleanup`: teardown on its own.

use thiserror::Error;
use tracing::info;
use woo_e2e_core::{SHIPPING_ZONE_NAME, ShippingZoneId};
use woo_e2e_suite::fixtures::{self, TeardownReport};
use woo_e2e_suite::rest::{WooClient, WooError};
use woo_e2e_suite::{ConfigError, SuiteConfig};

/// Errors that end a `cleanup` command.
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Rest(#[from] WooError),

    /// Some resources could not be deleted.
    #[error("{0} cleanup step(s) failed")]
    Incomplete(usize),
}

/// Delete fixture products, then either the given zone or every zone named
/// like the fixture zone.
///
/// # Errors
///
/// Returns `CleanupError::Incomplete` if any deletion failed.
pub async fn cleanup(zone_id: Option<ShippingZoneId>) -> Result<(), CleanupError> {
    let config = SuiteConfig::from_env()?;
    let api = WooClient::new(&config.rest)?;

    let mut report = fixtures::teardown(&api, zone_id).await;
    if zone_id.is_none() {
        let zones = fixtures::remove_stale_zones(&api, SHIPPING_ZONE_NAME).await?;
        merge(&mut report, zones);
    }

    info!(
        deleted_products = report.deleted_products.len(),
        zone_deleted = report.zone_deleted,
        "Cleanup finished"
    );

    if report.is_clean() {
        Ok(())
    } else {
        Err(CleanupError::Incomplete(report.failures.len()))
    }
}

fn merge(report: &mut TeardownReport, other: TeardownReport) {
    report.deleted_products.extend(other.deleted_products);
    report.zone_deleted |= other.zone_deleted;
    report.failures.extend(other.failures);
}
