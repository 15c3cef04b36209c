use serde::Serialize;

use crate::analyzers::utility::{self, round3};
use crate::dataset::{Field, Record};
use crate::error::{Result, StatsError};
use crate::policy::Policy;

/// Mean, median and mode of one field over one group, each rounded to three
/// decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
}

impl Summary {
    pub fn compute(records: &[Record], field: Field, policy: Policy) -> Result<Self> {
        let values = field_values(records, field, policy)?;

        Ok(Summary {
            mean: round3(utility::mean(&values)),
            median: round3(utility::median(&values)),
            mode: round3(utility::mode(&values)),
        })
    }
}

pub fn mean(records: &[Record], field: Field, policy: Policy) -> Result<f64> {
    let values = field_values(records, field, policy)?;
    Ok(round3(utility::mean(&values)))
}

pub fn median(records: &[Record], field: Field, policy: Policy) -> Result<f64> {
    let values = field_values(records, field, policy)?;
    Ok(round3(utility::median(&values)))
}

pub fn mode(records: &[Record], field: Field, policy: Policy) -> Result<f64> {
    let values = field_values(records, field, policy)?;
    Ok(round3(utility::mode(&values)))
}

/// Reads `field` from every record.
///
/// Strict: empty input and missing values are errors. Permissive: missing
/// values read as `NaN` and an empty input gives an empty series.
fn field_values(records: &[Record], field: Field, policy: Policy) -> Result<Vec<f64>> {
    if records.is_empty() && policy.is_strict() {
        return Err(StatsError::EmptyGroup {
            field: field.name(),
        });
    }

    records
        .iter()
        .enumerate()
        .map(|(index, record)| match record.get(field) {
            Some(v) => Ok(v),
            None if policy.is_strict() => Err(StatsError::MissingField {
                field: field.name(),
            }
            .at_record(index)),
            None => Ok(f64::NAN),
        })
        .collect()
}
