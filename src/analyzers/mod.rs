//! Grouping, enrichment and aggregation of wine records.
//!
//! Records are grouped by `Alcohol` class, optionally enriched with the
//! derived Gamma field, and summarized per class into mean, median and mode.

pub mod aggregate;
pub mod analyzer;
pub mod derive;
pub mod group;
pub mod types;
pub mod utility;
