//! `woo-e2e run`: the full suite.

use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};
use woo_e2e_suite::rest::WooClient;
use woo_e2e_suite::{
    BrowserSessions, ScenarioId, ScenarioStatus, SuiteConfig, SuiteError, SuiteReport, SuiteRunner,
};

/// Errors that end a `run` command.
#[derive(Debug, Error)]
pub enum RunError {
    /// Configuration, REST client or browser startup failed.
    #[error(transparent)]
    Suite(#[from] SuiteError),

    /// The report could not be written.
    #[error("Failed to write report to {path}: {source}")]
    Report {
        path: String,
        source: std::io::Error,
    },

    /// The report could not be serialized.
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// At least one step did not pass.
    #[error("Suite failed: {failed} failed, {skipped} skipped, teardown {teardown}")]
    Failed {
        failed: usize,
        skipped: usize,
        teardown: &'static str,
    },
}

/// Run the suite and optionally write a JSON report.
///
/// # Errors
///
/// Returns `RunError::Failed` when any scenario failed or was skipped, or
/// when teardown left something behind.
pub async fn run(report_path: Option<&Path>, only: &[ScenarioId]) -> Result<(), RunError> {
    let config = SuiteConfig::from_env().map_err(SuiteError::from)?;
    let api = WooClient::new(&config.rest).map_err(SuiteError::from)?;
    let sessions = BrowserSessions::open(&config).await?;

    let runner = SuiteRunner::new(&api, &sessions.admin, &sessions.shopper, config.wait).only(only);
    info!(
        scenarios = ?runner.selected().iter().map(|id| id.slug()).collect::<Vec<_>>(),
        "Running suite"
    );
    let report = runner.run().await;

    if let Err(e) = sessions.close().await {
        warn!(error = %e, "Failed to close browser sessions");
    }

    print_summary(&report);

    if let Some(path) = report_path {
        tokio::fs::write(path, report.to_json()?)
            .await
            .map_err(|source| RunError::Report {
                path: path.display().to_string(),
                source,
            })?;
        info!(path = %path.display(), "Report written");
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(RunError::Failed {
            failed: report.count(|s| matches!(s, ScenarioStatus::Failed(_))),
            skipped: report.count(|s| matches!(s, ScenarioStatus::Skipped(_))),
            teardown: if report.teardown.is_clean() {
                "clean"
            } else {
                "incomplete"
            },
        })
    }
}

#[allow(clippy::print_stdout)]
fn print_summary(report: &SuiteReport) {
    println!("Run {}", report.run_id);
    if let Some(error) = &report.setup_error {
        println!("  setup failed: {error}");
    }
    for outcome in &report.scenarios {
        let (mark, detail) = match &outcome.status {
            ScenarioStatus::Passed => ("ok", String::new()),
            ScenarioStatus::Failed(reason) => ("FAILED", format!(": {reason}")),
            ScenarioStatus::Skipped(reason) => ("skipped", format!(": {reason}")),
        };
        println!(
            "  [{mark}] {} ({} ms){detail}",
            outcome.title, outcome.duration_ms
        );
    }
    println!(
        "  teardown: {} product(s) deleted, zone deleted: {}, {} failure(s)",
        report.teardown.deleted_products.len(),
        report.teardown.zone_deleted,
        report.teardown.failures.len()
    );
}
