//! Data layer: records, the canonical store and the derived view
//!
//! This module separates the record collection (mutated through commands)
//! from its filtered and sorted presentation.

// Core data modules
pub mod record;
pub mod record_store;
pub mod record_view;

// Loading and exporting
pub mod record_exporter;
pub mod record_loader;

// Statistics and messaging helpers
pub mod recipients;
pub mod record_stats;
