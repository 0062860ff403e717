//! File processing and linting logic.
//!
//! This module handles file discovery, per-file linting and the run-wide scan.

mod discovery;
mod processing;

pub use discovery::*;
pub use processing::*;
