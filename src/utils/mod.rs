//! Utility functions and helpers
//!
//! Logging setup and application paths used by the shell.

pub mod app_paths;
pub mod logging;
