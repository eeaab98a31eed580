//! Configuration module
//!
//! Loads and saves the TOML settings controlling the identity field,
//! default search/sort strategies, history depth and shell display.

pub mod config;
