use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How missing values, empty groups and zero divisors are treated.
///
/// `Strict` reports them as [`crate::error::StatsError`]s. `Permissive` lets
/// them flow through as `NaN` or infinity, matching a plain floating point
/// evaluation of the formulas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    #[default]
    Strict,
    Permissive,
}

impl Policy {
    pub fn is_strict(self) -> bool {
        self == Policy::Strict
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Strict => f.write_str("strict"),
            Policy::Permissive => f.write_str("permissive"),
        }
    }
}

impl FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Policy::Strict),
            "permissive" => Ok(Policy::Permissive),
            other => Err(format!("unknown policy `{other}`")),
        }
    }
}
