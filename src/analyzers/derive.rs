//! The derived `Gamma` field: `Ash * Hue / Magnesium`.

use crate::analyzers::group::GroupedDataset;
use crate::dataset::{ClassKey, Field, Record};
use crate::error::{Result, StatsError};
use crate::policy::Policy;

/// Computes Gamma for one record.
///
/// # Errors
///
/// Under [`Policy::Strict`], a missing input yields `MissingField` and a zero
/// Magnesium yields `DivisionByZero`. Under [`Policy::Permissive`] missing
/// inputs read as `NaN` and the division follows IEEE 754.
pub fn compute_gamma(record: &Record, policy: Policy) -> Result<f64> {
    let read = |field: Field| match record.get(field) {
        Some(v) => Ok(v),
        None if policy.is_strict() => Err(StatsError::MissingField {
            field: field.name(),
        }),
        None => Ok(f64::NAN),
    };

    let ash = read(Field::Ash)?;
    let hue = read(Field::Hue)?;
    let magnesium = read(Field::Magnesium)?;

    if magnesium == 0.0 && policy.is_strict() {
        return Err(StatsError::DivisionByZero);
    }

    Ok(ash * hue / magnesium)
}

/// Returns a copy of `record` with its `gamma` set.
pub fn with_gamma(record: &Record, policy: Policy) -> Result<Record> {
    Ok(Record {
        gamma: Some(compute_gamma(record, policy)?),
        ..record.clone()
    })
}

/// Builds a new grouped dataset whose records carry Gamma. The input is not
/// modified, so enriching twice gives the same result.
pub fn enrich_gamma(grouped: &GroupedDataset, policy: Policy) -> Result<GroupedDataset> {
    grouped
        .iter()
        .map(|(key, records)| -> Result<(ClassKey, Vec<Record>)> {
            let enriched = records
                .iter()
                .enumerate()
                .map(|(index, r)| with_gamma(r, policy).map_err(|e| e.at_record(index)))
                .collect::<Result<Vec<_>>>()
                .map_err(|e| e.in_group(*key))?;
            Ok((*key, enriched))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::group::group_by_class;

    fn record(ash: f64, hue: f64, magnesium: f64) -> Record {
        Record {
            alcohol: Some(ClassKey(1)),
            ash: Some(ash),
            hue: Some(hue),
            magnesium: Some(magnesium),
            ..Default::default()
        }
    }

    #[test]
    fn test_compute_gamma() {
        assert_eq!(compute_gamma(&record(2.0, 3.0, 6.0), Policy::Strict).unwrap(), 1.0);
        assert_eq!(
            compute_gamma(&record(2.43, 5.64, 127.0), Policy::Strict).unwrap(),
            2.43 * 5.64 / 127.0
        );
    }

    #[test]
    fn test_zero_magnesium_strict() {
        let err = compute_gamma(&record(2.0, 3.0, 0.0), Policy::Strict).unwrap_err();
        assert!(matches!(err, StatsError::DivisionByZero));
    }

    #[test]
    fn test_zero_magnesium_permissive() {
        let g = compute_gamma(&record(2.0, 3.0, 0.0), Policy::Permissive).unwrap();
        assert_eq!(g, f64::INFINITY);

        let g = compute_gamma(&record(0.0, 3.0, 0.0), Policy::Permissive).unwrap();
        assert!(g.is_nan());
    }

    #[test]
    fn test_missing_input() {
        let mut r = record(2.0, 3.0, 6.0);
        r.hue = None;

        let err = compute_gamma(&r, Policy::Strict).unwrap_err();
        assert!(matches!(err, StatsError::MissingField { field: "Hue" }));
        assert!(compute_gamma(&r, Policy::Permissive).unwrap().is_nan());
    }

    #[test]
    fn test_with_gamma_leaves_source_untouched() {
        let r = record(2.0, 3.0, 6.0);
        let enriched = with_gamma(&r, Policy::Strict).unwrap();

        assert_eq!(r.gamma, None);
        assert_eq!(enriched.gamma, Some(1.0));
        assert_eq!(enriched.ash, r.ash);
    }

    #[test]
    fn test_enrich_gamma_is_idempotent() {
        let grouped = group_by_class(&[record(2.0, 3.0, 6.0), record(1.0, 1.0, 4.0)]).unwrap();

        let first = enrich_gamma(&grouped, Policy::Strict).unwrap();
        let second = enrich_gamma(&grouped, Policy::Strict).unwrap();

        assert_eq!(first, second);
        assert!(grouped[&ClassKey(1)].iter().all(|r| r.gamma.is_none()));
        assert_eq!(first[&ClassKey(1)][1].gamma, Some(0.25));
    }

    #[test]
    fn test_enrich_gamma_reports_position() {
        let grouped = group_by_class(&[record(2.0, 3.0, 6.0), record(1.0, 1.0, 0.0)]).unwrap();

        let err = enrich_gamma(&grouped, Policy::Strict).unwrap_err();
        assert_eq!(
            err.to_string(),
            "class 1: record 1: Magnesium is zero, Gamma is undefined"
        );
    }
}
