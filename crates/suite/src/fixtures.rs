//! Store fixtures created and removed over the REST API.
//!
//! Setup is strict: every call is awaited and the first failure aborts the
//! run. Teardown is lenient: it attempts every deletion, tolerates resources
//! that are already gone, and reports what failed instead of stopping.

use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};
use woo_e2e_core::{ProductFixture, ProductId, ShippingZoneFixture, ShippingZoneId};

use crate::rest::{StoreApi, WooError, ZoneLocation};

/// Setup failed.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct SetupError {
    /// Zone created before the failure; teardown must still delete it.
    pub zone: Option<ShippingZoneId>,
    pub source: WooError,
}

/// Create the shipping zone, restrict it to its locations and attach its
/// method.
///
/// # Errors
///
/// Returns a `SetupError` with the first `WooError`. If the zone was created
/// before a later call failed, its id is carried in the error.
#[instrument(skip_all, fields(zone = %fixture.name))]
pub async fn setup_shipping_zone<S>(
    api: &S,
    fixture: &ShippingZoneFixture,
) -> Result<ShippingZoneId, SetupError>
where
    S: StoreApi + ?Sized,
{
    let zone = api
        .create_shipping_zone(&fixture.name)
        .await
        .map_err(|source| SetupError { zone: None, source })?;
    let partial = |source| SetupError {
        zone: Some(zone.id),
        source,
    };

    let locations: Vec<ZoneLocation> = fixture
        .locations
        .iter()
        .cloned()
        .map(ZoneLocation::country)
        .collect();
    api.update_shipping_zone_locations(zone.id, &locations)
        .await
        .map_err(partial)?;

    let method = api
        .add_shipping_zone_method(zone.id, fixture.method)
        .await
        .map_err(partial)?;

    info!(
        zone_id = %zone.id,
        locations = locations.len(),
        method = %method.method_id,
        "Shipping zone created"
    );
    Ok(zone.id)
}

/// One cleanup step that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupFailure {
    /// What was being removed, e.g. `product 31`.
    pub target: String,
    /// Error message.
    pub error: String,
}

/// Outcome of a teardown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeardownReport {
    /// Fixture products deleted (or found already gone).
    pub deleted_products: Vec<ProductId>,
    /// Whether the shipping zone was deleted (or found already gone).
    pub zone_deleted: bool,
    /// Steps that failed.
    pub failures: Vec<CleanupFailure>,
}

impl TeardownReport {
    /// Returns true if every attempted step succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, target: String, error: &WooError) {
        warn!(step = %target, error = %error, "Cleanup step failed");
        self.failures.push(CleanupFailure {
            target,
            error: error.to_string(),
        });
    }
}

/// Delete every fixture product (matched by exact name, in any status) and
/// then the shipping zone, all with `force=true`.
///
/// Product deletions run concurrently and are all awaited. A `404` counts as
/// already deleted, so running teardown twice is harmless. Zone deletion is
/// skipped when `zone` is `None`.
#[instrument(skip(api))]
pub async fn teardown<S>(api: &S, zone: Option<ShippingZoneId>) -> TeardownReport
where
    S: StoreApi + ?Sized,
{
    let mut report = TeardownReport::default();

    match api.list_all_products().await {
        Ok(products) => {
            let targets: Vec<ProductId> = products
                .iter()
                .filter(|p| ProductFixture::is_fixture_name(&p.name))
                .map(|p| p.id)
                .collect();

            let results = join_all(targets.iter().map(|&id| async move {
                (id, tolerate_missing(api.delete_product(id, true).await))
            }))
            .await;

            for (id, result) in results {
                match result {
                    Ok(()) => report.deleted_products.push(id),
                    Err(e) => report.record_failure(format!("product {id}"), &e),
                }
            }
        }
        Err(e) => report.record_failure("product listing".to_string(), &e),
    }

    if let Some(zone) = zone {
        match tolerate_missing(api.delete_shipping_zone(zone, true).await) {
            Ok(()) => report.zone_deleted = true,
            Err(e) => report.record_failure(format!("shipping zone {zone}"), &e),
        }
    }

    info!(
        deleted_products = report.deleted_products.len(),
        zone_deleted = report.zone_deleted,
        failures = report.failures.len(),
        "Teardown finished"
    );
    report
}

/// Delete every shipping zone named like the fixture zone, for runs that
/// died before teardown could record the zone id.
///
/// # Errors
///
/// Returns a `WooError` if the zones cannot be listed. Individual delete
/// failures are reported in the returned `TeardownReport`.
#[instrument(skip(api))]
pub async fn remove_stale_zones<S>(api: &S, name: &str) -> Result<TeardownReport, WooError>
where
    S: StoreApi + ?Sized,
{
    let mut report = TeardownReport::default();
    let zones = api.list_shipping_zones().await?;

    for zone in zones.into_iter().filter(|z| z.name == name) {
        match tolerate_missing(api.delete_shipping_zone(zone.id, true).await) {
            Ok(()) => {
                info!(zone_id = %zone.id, "Removed stale shipping zone");
                report.zone_deleted = true;
            }
            Err(e) => report.record_failure(format!("shipping zone {}", zone.id), &e),
        }
    }

    Ok(report)
}

fn tolerate_missing(result: Result<(), WooError>) -> Result<(), WooError> {
    match result {
        Err(e) if e.is_not_found() => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerate_missing() {
        assert!(tolerate_missing(Err(WooError::NotFound("products/1".to_string()))).is_ok());
        assert!(
            tolerate_missing(Err(WooError::Api {
                status: 500,
                code: "internal".to_string(),
                message: "boom".to_string(),
            }))
            .is_err()
        );
    }

    #[test]
    fn test_report_is_clean() {
        let mut report = TeardownReport::default();
        assert!(report.is_clean());
        report.record_failure("product 3".to_string(), &WooError::RateLimited(5));
        assert!(!report.is_clean());
        assert_eq!(report.failures[0].target, "product 3");
    }
}
