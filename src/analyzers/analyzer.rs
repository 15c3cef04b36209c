use chrono::Utc;
use std::path::Path;
use tracing::info;

use crate::analyzers::aggregate::aggregate;
use crate::analyzers::derive::enrich_gamma;
use crate::analyzers::group::group_by_class;
use crate::analyzers::types::{FieldTable, Report};
use crate::dataset::{self, Field, Record};
use crate::error::Result;
use crate::policy::Policy;

/// Fields summarized by [`analyze`]: the measured Flavanoids and the derived Gamma.
pub const DEFAULT_FIELDS: [Field; 2] = [Field::Flavanoids, Field::Gamma];

/// Produces the Flavanoids and Gamma tables for `records`.
pub fn analyze(records: &[Record], policy: Policy) -> Result<Report> {
    analyze_fields(records, &DEFAULT_FIELDS, policy)
}

/// Groups `records` by class and summarizes each of `fields`.
///
/// Gamma is computed into a separate enriched copy of the grouped dataset,
/// and only when a derived field is requested.
#[tracing::instrument(skip(records), fields(records = records.len()))]
pub fn analyze_fields(records: &[Record], fields: &[Field], policy: Policy) -> Result<Report> {
    let start = std::time::Instant::now();

    let grouped = group_by_class(records)?;
    info!(classes = grouped.len(), "Records grouped by class");

    let enriched = if fields.iter().any(|f| f.is_derived()) {
        Some(enrich_gamma(&grouped, policy)?)
    } else {
        None
    };

    let mut tables = Vec::with_capacity(fields.len());
    for &field in fields {
        let source = match &enriched {
            Some(enriched) if field.is_derived() => enriched,
            _ => &grouped,
        };
        let rows = aggregate(source, field, policy)?;
        tables.push(FieldTable { field, rows });
    }

    info!(
        tables = tables.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Statistics computed"
    );

    Ok(Report {
        generated_at: Utc::now(),
        policy,
        record_count: records.len(),
        tables,
    })
}

/// Loads the dataset at `path` and summarizes `fields`.
pub fn analyze_file(path: &Path, fields: &[Field], policy: Policy) -> Result<Report> {
    let records = dataset::load(path)?;
    analyze_fields(&records, fields, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ClassKey;
    use crate::error::StatsError;

    fn record(class: i64, flavanoids: f64, ash: f64, hue: f64, magnesium: f64) -> Record {
        Record {
            alcohol: Some(ClassKey(class)),
            flavanoids: Some(flavanoids),
            ash: Some(ash),
            hue: Some(hue),
            magnesium: Some(magnesium),
            ..Default::default()
        }
    }

    #[test]
    fn test_analyze_builds_both_tables() {
        let records = vec![
            record(1, 3.0, 2.0, 3.0, 6.0),
            record(1, 2.0, 1.0, 1.0, 4.0),
            record(2, 1.0, 3.0, 2.0, 3.0),
        ];

        let report = analyze(&records, Policy::Strict).unwrap();

        assert_eq!(report.record_count, 3);
        assert_eq!(report.tables.len(), 2);

        let flav = report.table(Field::Flavanoids).unwrap();
        assert_eq!(flav.rows[&ClassKey(1)].mean, 2.5);

        let gamma = report.table(Field::Gamma).unwrap();
        assert_eq!(gamma.rows[&ClassKey(1)].median, 0.625);
        assert_eq!(gamma.rows[&ClassKey(2)].mode, 2.0);
    }

    #[test]
    fn test_analyze_leaves_records_unenriched() {
        let records = vec![record(1, 3.0, 2.0, 3.0, 6.0)];
        analyze(&records, Policy::Strict).unwrap();
        assert_eq!(records[0].gamma, None);
    }

    #[test]
    fn test_measured_fields_skip_gamma() {
        // zero magnesium only matters when Gamma is requested
        let records = vec![record(1, 3.0, 2.0, 3.0, 0.0)];

        assert!(analyze_fields(&records, &[Field::Flavanoids], Policy::Strict).is_ok());
        assert!(matches!(
            analyze(&records, Policy::Strict).unwrap_err(),
            StatsError::InGroup { .. }
        ));
    }

    #[test]
    fn test_permissive_propagates_infinity() {
        let records = vec![record(1, 3.0, 2.0, 3.0, 0.0)];
        let report = analyze(&records, Policy::Permissive).unwrap();

        let gamma = report.table(Field::Gamma).unwrap();
        assert_eq!(gamma.rows[&ClassKey(1)].mean, f64::INFINITY);
    }
}
