use tracing::debug;

use crate::analyzers::group::GroupedDataset;
use crate::analyzers::types::StatsTable;
use crate::dataset::Field;
use crate::error::Result;
use crate::policy::Policy;
use crate::stats::Summary;

/// Summarizes `field` for every class in `grouped`.
///
/// The table keeps the class order of `grouped`, and `grouped` is only read,
/// so repeated calls return identical tables. The first class that fails
/// aborts the whole aggregation with an error naming that class.
#[tracing::instrument(skip(grouped), fields(groups = grouped.len()))]
pub fn aggregate(grouped: &GroupedDataset, field: Field, policy: Policy) -> Result<StatsTable> {
    let mut table = StatsTable::with_capacity(grouped.len());

    for (key, records) in grouped {
        let summary = Summary::compute(records, field, policy).map_err(|e| e.in_group(*key))?;
        debug!(
            class = %key,
            records = records.len(),
            mean = summary.mean,
            median = summary.median,
            mode = summary.mode,
            "Class summarized"
        );
        table.insert(*key, summary);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::group::group_by_class;
    use crate::dataset::{ClassKey, Record};

    fn record(class: i64, flavanoids: f64) -> Record {
        Record {
            alcohol: Some(ClassKey(class)),
            flavanoids: Some(flavanoids),
            ..Default::default()
        }
    }

    fn sample() -> GroupedDataset {
        group_by_class(&[
            record(2, 0.57),
            record(1, 3.06),
            record(1, 2.76),
            record(2, 1.09),
            record(1, 3.24),
            record(2, 1.09),
        ])
        .unwrap()
    }

    #[test]
    fn test_aggregate_two_classes() {
        let table = aggregate(&sample(), Field::Flavanoids, Policy::Strict).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.keys().copied().collect::<Vec<_>>(),
            vec![ClassKey(2), ClassKey(1)]
        );
        assert_eq!(
            table[&ClassKey(1)],
            Summary {
                mean: 3.02,
                median: 3.06,
                mode: 3.06,
            }
        );
        assert_eq!(
            table[&ClassKey(2)],
            Summary {
                mean: 0.917,
                median: 1.09,
                mode: 1.09,
            }
        );
    }

    #[test]
    fn test_aggregate_is_repeatable() {
        let grouped = sample();
        let first = aggregate(&grouped, Field::Flavanoids, Policy::Strict).unwrap();
        let second = aggregate(&grouped, Field::Flavanoids, Policy::Strict).unwrap();

        assert_eq!(first, second);
        assert_eq!(grouped, sample());
    }

    #[test]
    fn test_aggregate_names_failing_class() {
        let mut grouped = sample();
        grouped.insert(ClassKey(3), Vec::new());

        let err = aggregate(&grouped, Field::Flavanoids, Policy::Strict).unwrap_err();
        assert_eq!(
            err.to_string(),
            "class 3: cannot compute statistics for `Flavanoids` over an empty group"
        );
    }

    #[test]
    fn test_aggregate_empty_dataset() {
        let table = aggregate(&GroupedDataset::new(), Field::Hue, Policy::Strict).unwrap();
        assert!(table.is_empty());
    }
}
