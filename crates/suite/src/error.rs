//! Unified error type for suite runs.

use thiserror::Error;

use crate::browser::BrowserError;
use crate::config::ConfigError;
use crate::rest::WooError;

/// Errors that can end a fixture step or a scenario.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A REST call failed.
    #[error(transparent)]
    Rest(#[from] WooError),

    /// A browser command or expectation failed.
    #[error(transparent)]
    Browser(#[from] BrowserError),

    /// The store behaved differently from what a scenario asserts.
    #[error("{scenario}: {reason}")]
    Scenario {
        /// Scenario title.
        scenario: String,
        /// What went wrong.
        reason: String,
    },

    /// A scenario ran without the state an earlier step should have produced.
    #[error("Missing precondition: {0}")]
    MissingPrecondition(String),
}

impl SuiteError {
    /// A scenario assertion failure.
    pub fn scenario(scenario: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Scenario {
            scenario: scenario.into(),
            reason: reason.into(),
        }
    }
}
