//! Wine records and dataset loading.
//!
//! A dataset is an array of flat records keyed by the column headings of the
//! wine measurements table, read either from a JSON array of objects or from
//! a CSV file with the same header names. Numeric cells may be written as
//! numbers or as numeric strings (`".28"`); blank cells count as missing.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::{LoadError, Result, StatsError};

/// The `Alcohol` class a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClassKey(pub i64);

impl fmt::Display for ClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the wine dataset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Record {
    #[serde(rename = "Alcohol", default, deserialize_with = "de::class_key")]
    pub alcohol: Option<ClassKey>,
    #[serde(rename = "Malic Acid", default, deserialize_with = "de::number")]
    pub malic_acid: Option<f64>,
    #[serde(rename = "Ash", default, deserialize_with = "de::number")]
    pub ash: Option<f64>,
    #[serde(rename = "Alcalinity of ash", default, deserialize_with = "de::number")]
    pub alcalinity_of_ash: Option<f64>,
    #[serde(rename = "Magnesium", default, deserialize_with = "de::number")]
    pub magnesium: Option<f64>,
    #[serde(rename = "Total phenols", default, deserialize_with = "de::number")]
    pub total_phenols: Option<f64>,
    #[serde(rename = "Flavanoids", default, deserialize_with = "de::number")]
    pub flavanoids: Option<f64>,
    #[serde(rename = "Nonflavanoid phenols", default, deserialize_with = "de::number")]
    pub nonflavanoid_phenols: Option<f64>,
    #[serde(rename = "Proanthocyanins", default, deserialize_with = "de::number")]
    pub proanthocyanins: Option<f64>,
    #[serde(rename = "Color intensity", default, deserialize_with = "de::number")]
    pub color_intensity: Option<f64>,
    #[serde(rename = "Hue", default, deserialize_with = "de::number")]
    pub hue: Option<f64>,
    #[serde(
        rename = "OD280/OD315 of diluted wines",
        default,
        deserialize_with = "de::number"
    )]
    pub od280_od315: Option<f64>,
    #[serde(rename = "Unknown", default, deserialize_with = "de::number")]
    pub unknown: Option<f64>,

    /// Derived, never read from input. Set by [`crate::analyzers::derive::with_gamma`].
    #[serde(skip)]
    pub gamma: Option<f64>,
}

impl Record {
    /// Returns the value of `field`, or `None` if the record lacks it.
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::MalicAcid => self.malic_acid,
            Field::Ash => self.ash,
            Field::AlcalinityOfAsh => self.alcalinity_of_ash,
            Field::Magnesium => self.magnesium,
            Field::TotalPhenols => self.total_phenols,
            Field::Flavanoids => self.flavanoids,
            Field::NonflavanoidPhenols => self.nonflavanoid_phenols,
            Field::Proanthocyanins => self.proanthocyanins,
            Field::ColorIntensity => self.color_intensity,
            Field::Hue => self.hue,
            Field::Od280Od315 => self.od280_od315,
            Field::Unknown => self.unknown,
            Field::Gamma => self.gamma,
        }
    }
}

/// The closed set of numeric fields statistics can be computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    MalicAcid,
    Ash,
    AlcalinityOfAsh,
    Magnesium,
    TotalPhenols,
    Flavanoids,
    NonflavanoidPhenols,
    Proanthocyanins,
    ColorIntensity,
    Hue,
    Od280Od315,
    Unknown,
    Gamma,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::MalicAcid,
        Field::Ash,
        Field::AlcalinityOfAsh,
        Field::Magnesium,
        Field::TotalPhenols,
        Field::Flavanoids,
        Field::NonflavanoidPhenols,
        Field::Proanthocyanins,
        Field::ColorIntensity,
        Field::Hue,
        Field::Od280Od315,
        Field::Unknown,
        Field::Gamma,
    ];

    /// Column heading as it appears in the dataset.
    pub fn name(self) -> &'static str {
        match self {
            Field::MalicAcid => "Malic Acid",
            Field::Ash => "Ash",
            Field::AlcalinityOfAsh => "Alcalinity of ash",
            Field::Magnesium => "Magnesium",
            Field::TotalPhenols => "Total phenols",
            Field::Flavanoids => "Flavanoids",
            Field::NonflavanoidPhenols => "Nonflavanoid phenols",
            Field::Proanthocyanins => "Proanthocyanins",
            Field::ColorIntensity => "Color intensity",
            Field::Hue => "Hue",
            Field::Od280Od315 => "OD280/OD315 of diluted wines",
            Field::Unknown => "Unknown",
            Field::Gamma => "Gamma",
        }
    }

    /// Kebab-case identifier accepted on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Field::MalicAcid => "malic-acid",
            Field::Ash => "ash",
            Field::AlcalinityOfAsh => "alcalinity-of-ash",
            Field::Magnesium => "magnesium",
            Field::TotalPhenols => "total-phenols",
            Field::Flavanoids => "flavanoids",
            Field::NonflavanoidPhenols => "nonflavanoid-phenols",
            Field::Proanthocyanins => "proanthocyanins",
            Field::ColorIntensity => "color-intensity",
            Field::Hue => "hue",
            Field::Od280Od315 => "od280-od315",
            Field::Unknown => "unknown",
            Field::Gamma => "gamma",
        }
    }

    /// True for fields computed from other fields rather than loaded.
    pub fn is_derived(self) -> bool {
        matches!(self, Field::Gamma)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.slug().eq_ignore_ascii_case(s) || f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown field `{s}`"))
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Loads a dataset, picking the parser from the file extension.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<Vec<Record>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let wrap = |source: LoadError| StatsError::Load {
        path: path.to_path_buf(),
        source,
    };

    let parse: fn(BufReader<File>) -> std::result::Result<Vec<Record>, LoadError> =
        match ext.as_deref() {
            Some("json") => from_json_reader,
            Some("csv") => from_csv_reader,
            _ => return Err(StatsError::UnsupportedFormat(path.to_path_buf())),
        };

    let file = File::open(path).map_err(|e| wrap(e.into()))?;
    let records = parse(BufReader::new(file)).map_err(wrap)?;

    info!(records = records.len(), "Dataset loaded");
    Ok(records)
}

/// Parses a JSON array of flat record objects.
pub fn from_json_reader<R: Read>(reader: R) -> std::result::Result<Vec<Record>, LoadError> {
    let records: Vec<Record> = serde_json::from_reader(reader)?;
    debug!(records = records.len(), "Parsed JSON records");
    Ok(records)
}

/// Parses CSV with a header row naming the record columns.
pub fn from_csv_reader<R: Read>(reader: R) -> std::result::Result<Vec<Record>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();

    for result in rdr.deserialize() {
        let record: Record = result?;
        records.push(record);
    }

    debug!(records = records.len(), "Parsed CSV records");
    Ok(records)
}

mod de {
    use super::ClassKey;
    use serde::de::{self, Deserializer, Unexpected, Visitor};
    use std::fmt;

    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = Option<f64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number, a numeric string, or null")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let v = v.trim();
            if v.is_empty() {
                return Ok(None);
            }
            v.parse::<f64>()
                .map(Some)
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(NumberVisitor)
        }
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        d.deserialize_any(NumberVisitor)
    }

    pub fn class_key<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ClassKey>, D::Error> {
        match d.deserialize_any(NumberVisitor)? {
            None => Ok(None),
            // i64::MAX as f64 rounds up to 2^63, hence the exclusive bound
            Some(v) if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 => {
                Ok(Some(ClassKey(v as i64)))
            }
            Some(v) => Err(de::Error::invalid_value(
                Unexpected::Float(v),
                &"an integer class",
            )),
        }
    }
}
