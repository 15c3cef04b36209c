//! Error taxonomy for loading and summarizing wine records.

use std::path::PathBuf;
use thiserror::Error;

use crate::dataset::ClassKey;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("cannot compute statistics for `{field}` over an empty group")]
    EmptyGroup { field: &'static str },

    #[error("no value for `{field}`")]
    MissingField { field: &'static str },

    #[error("Magnesium is zero, Gamma is undefined")]
    DivisionByZero,

    #[error("record {index}: {source}")]
    AtRecord {
        index: usize,
        #[source]
        source: Box<StatsError>,
    },

    #[error("class {key}: {source}")]
    InGroup {
        key: ClassKey,
        #[source]
        source: Box<StatsError>,
    },

    #[error("failed to load dataset `{}`: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("unsupported dataset format `{}` (expected .json or .csv)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Underlying cause of a failed dataset load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl StatsError {
    /// Attaches the position of the offending record within its sequence.
    pub fn at_record(self, index: usize) -> Self {
        StatsError::AtRecord {
            index,
            source: Box::new(self),
        }
    }

    /// Attaches the class key of the group being processed.
    pub fn in_group(self, key: ClassKey) -> Self {
        StatsError::InGroup {
            key,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
