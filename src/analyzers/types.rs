//! Data types produced by the aggregation pipeline.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::dataset::{ClassKey, Field};
use crate::policy::Policy;
use crate::stats::Summary;

/// Per-class summaries of one field, classes in the grouped dataset's order.
pub type StatsTable = IndexMap<ClassKey, Summary>;

/// Statistics of one field for every class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldTable {
    pub field: Field,
    pub rows: StatsTable,
}

/// Complete result of a pipeline run, one table per requested field.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub policy: Policy,
    pub record_count: usize,
    pub tables: Vec<FieldTable>,
}

impl Report {
    pub fn table(&self, field: Field) -> Option<&FieldTable> {
        self.tables.iter().find(|t| t.field == field)
    }
}
