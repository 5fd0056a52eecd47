//! Ordered suite execution and reporting.
//!
//! A run is: shipping zone setup, the selected scenarios in order, then
//! teardown. Teardown always runs, including after a failed setup. State
//! carried between steps lives in an explicit [`RunContext`].

use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;
use woo_e2e_core::{ProductFixture, ProductKind, ShippingZoneFixture, ShippingZoneId};

use crate::browser::{Page, WaitConfig};
use crate::fixtures::{self, TeardownReport};
use crate::rest::StoreApi;
use crate::scenarios::{self, PublishedProduct, ScenarioId};

/// State shared between the steps of one run.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Identifies the run in logs and reports.
    pub run_id: Uuid,
    /// Zone created by setup; `None` until setup succeeds.
    pub zone_id: Option<ShippingZoneId>,
    /// Products published so far, by kind.
    pub published: HashMap<ProductKind, PublishedProduct>,
}

impl RunContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            zone_id: None,
            published: HashMap::new(),
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ScenarioStatus {
    Passed,
    Failed(String),
    Skipped(String),
}

/// One row of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioOutcome {
    pub id: ScenarioId,
    pub title: String,
    #[serde(flatten)]
    pub status: ScenarioStatus,
    pub duration_ms: u64,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Set when fixture setup failed and no scenario ran.
    pub setup_error: Option<String>,
    pub scenarios: Vec<ScenarioOutcome>,
    pub teardown: TeardownReport,
}

impl SuiteReport {
    /// Returns true if setup succeeded, no scenario failed or was skipped,
    /// and teardown was clean.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.setup_error.is_none()
            && self
                .scenarios
                .iter()
                .all(|s| s.status == ScenarioStatus::Passed)
            && self.teardown.is_clean()
    }

    /// Count of scenarios with the given outcome kind.
    #[must_use]
    pub fn count(&self, matches: impl Fn(&ScenarioStatus) -> bool) -> usize {
        self.scenarios.iter().filter(|s| matches(&s.status)).count()
    }

    /// Serialize as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs the suite against a store, an admin page and a shopper page.
pub struct SuiteRunner<'a, S, A, B>
where
    S: StoreApi + ?Sized,
    A: Page + ?Sized,
    B: Page + ?Sized,
{
    api: &'a S,
    admin: &'a A,
    shopper: &'a B,
    wait: WaitConfig,
    selected: BTreeSet<ScenarioId>,
}

impl<'a, S, A, B> SuiteRunner<'a, S, A, B>
where
    S: StoreApi + ?Sized,
    A: Page + ?Sized,
    B: Page + ?Sized,
{
    /// A runner for all four scenarios.
    pub fn new(api: &'a S, admin: &'a A, shopper: &'a B, wait: WaitConfig) -> Self {
        Self {
            api,
            admin,
            shopper,
            wait,
            selected: ScenarioId::ALL.into_iter().collect(),
        }
    }

    /// Run only `ids` plus the scenarios they depend on. An empty list
    /// keeps every scenario.
    #[must_use]
    pub fn only(mut self, ids: &[ScenarioId]) -> Self {
        if ids.is_empty() {
            return self;
        }
        self.selected = ids
            .iter()
            .flat_map(|&id| std::iter::once(id).chain(id.depends_on()))
            .collect();
        self
    }

    /// Scenarios this runner will execute, in order.
    #[must_use]
    pub fn selected(&self) -> Vec<ScenarioId> {
        self.selected.iter().copied().collect()
    }

    /// Execute setup, the selected scenarios and teardown.
    pub async fn run(&self) -> SuiteReport {
        let mut ctx = RunContext::new();
        let span = info_span!("suite", run_id = %ctx.run_id);
        self.run_with(&mut ctx).instrument(span).await
    }

    /// As [`run`](Self::run), with a caller-supplied context.
    pub async fn run_with(&self, ctx: &mut RunContext) -> SuiteReport {
        let started_at = Utc::now();
        info!(scenarios = self.selected.len(), "Suite started");

        let zone = ShippingZoneFixture::default();
        let setup_error = match fixtures::setup_shipping_zone(self.api, &zone).await {
            Ok(zone_id) => {
                ctx.zone_id = Some(zone_id);
                None
            }
            Err(e) => {
                ctx.zone_id = e.zone;
                error!(error = %e, "Fixture setup failed; no scenario will run");
                Some(e.to_string())
            }
        };

        let mut outcomes = Vec::with_capacity(self.selected.len());
        for id in self.selected.iter().copied() {
            let outcome = if setup_error.is_some() {
                skipped(id, "fixture setup failed".to_string())
            } else {
                self.run_scenario(id, ctx).await
            };
            outcomes.push(outcome);
        }

        let teardown = fixtures::teardown(self.api, ctx.zone_id).await;

        let report = SuiteReport {
            run_id: ctx.run_id,
            started_at,
            finished_at: Utc::now(),
            setup_error,
            scenarios: outcomes,
            teardown,
        };
        info!(
            passed = report.count(|s| *s == ScenarioStatus::Passed),
            failed = report.count(|s| matches!(s, ScenarioStatus::Failed(_))),
            skipped = report.count(|s| matches!(s, ScenarioStatus::Skipped(_))),
            teardown_clean = report.teardown.is_clean(),
            "Suite finished"
        );
        report
    }

    async fn run_scenario(&self, id: ScenarioId, ctx: &mut RunContext) -> ScenarioOutcome {
        let kind = id.product_kind();
        let started = Instant::now();
        let span = info_span!("scenario", scenario = id.slug());

        let result = if id.is_create() {
            let fixture = match kind {
                ProductKind::Virtual => ProductFixture::virtual_product(),
                ProductKind::NonVirtual => ProductFixture::non_virtual_product(),
            };
            scenarios::create_simple_product(self.admin, &fixture, self.wait)
                .instrument(span)
                .await
                .map(|product| {
                    ctx.published.insert(kind, product);
                })
        } else {
            let Some(product) = ctx.published.get(&kind) else {
                let reason = format!(
                    "depends on {:?}, which did not publish a product",
                    id.depends_on().map_or("", ScenarioId::title)
                );
                warn!(scenario = id.slug(), "Skipping scenario: {reason}");
                return skipped(id, reason);
            };
            scenarios::shopper_adds_to_cart(self.shopper, product, self.wait)
                .instrument(span)
                .await
        };

        let status = match result {
            Ok(()) => {
                info!(scenario = id.slug(), "Scenario passed");
                ScenarioStatus::Passed
            }
            Err(e) => {
                error!(scenario = id.slug(), error = %e, "Scenario failed");
                ScenarioStatus::Failed(e.to_string())
            }
        };

        ScenarioOutcome {
            id,
            title: id.title().to_string(),
            status,
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }
}

fn skipped(id: ScenarioId, reason: String) -> ScenarioOutcome {
    ScenarioOutcome {
        id,
        title: id.title().to_string(),
        status: ScenarioStatus::Skipped(reason),
        duration_ms: 0,
    }
}
