use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize, Serializer};

/// Scalar stored in one cell of a sheet.
///
/// The enum uses an explicit `{type, value}` tagged layout; use [`CellValue::to_json`] (or
/// [`crate::RowMap`]'s serializer) for the plain-scalar shape served to clients.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// Empty / unset cell.
    #[default]
    Empty,
    /// Plain string.
    String(String),
    /// IEEE-754 double.
    Number(f64),
    /// Zone-less date-time. Date-only values carry a midnight time.
    Date(NaiveDateTime),
    /// Boolean, only produced when reading files written by other tools.
    Boolean(bool),
}

impl CellValue {
    /// Returns true if the value is [`CellValue::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Map `None` and blank strings to [`CellValue::Empty`].
    pub fn from_optional_text(value: Option<&str>) -> Self {
        match value {
            Some(s) if !s.is_empty() => CellValue::String(s.to_string()),
            _ => CellValue::Empty,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// A date with its time truncated to midnight.
    pub fn date_only(date: NaiveDate) -> Self {
        CellValue::Date(date.and_time(NaiveTime::MIN))
    }

    /// Plain JSON scalar: strings, numbers, booleans, dates as ISO-8601 text, empty as `null`.
    pub fn to_json(&self) -> JsonScalar<'_> {
        JsonScalar(self)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::String(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Date(dt) if dt.time() == NaiveTime::MIN => {
                write!(f, "{}", dt.format("%Y-%m-%d"))
            }
            CellValue::Date(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            CellValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::Date(value)
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(s) if !s.is_empty() => CellValue::String(s),
            _ => CellValue::Empty,
        }
    }
}

/// Borrowed cell that serializes as a bare scalar.
#[derive(Clone, Copy, Debug)]
pub struct JsonScalar<'a>(pub &'a CellValue);

impl Serialize for JsonScalar<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::String(s) => serializer.serialize_str(s),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Boolean(b) => serializer.serialize_bool(*b),
            CellValue::Date(dt) => serializer.collect_str(&dt.format("%Y-%m-%dT%H:%M:%S%.3f")),
        }
    }
}
