//! CLI command implementations.

pub mod check;
pub mod cleanup;
pub mod run;
