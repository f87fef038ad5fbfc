//! Host-supplied tabular series.
//!
//! A [`RawSeries`] is one named table handed over by the dashboard host. The
//! series name carries the topology path; the rows carry events.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::view::Timestamp;

/// Column holding the event start instant.
pub const EVENT_TIME_FIELD: &str = "event_time";
/// Optional column holding the event end instant.
pub const EVENT_TIME_END_FIELD: &str = "event_time_end";
/// Column holding the event value (label and color source).
pub const VALUE_FIELD: &str = "_";

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Missing value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value (epoch milliseconds for time columns).
    Number(f64),
    /// Text value.
    Text(String),
}

impl FieldValue {
    /// Read the cell as an instant.
    ///
    /// Numbers are epoch milliseconds. Text is accepted as an integer
    /// millisecond count or an RFC 3339 date-time. Instants outside the
    /// calendar range are unreadable.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        let millis = match self {
            Self::Number(value) if value.is_finite() => value.trunc() as Timestamp,
            Self::Text(text) => {
                let text = text.trim();
                match text.parse::<Timestamp>() {
                    Ok(millis) => millis,
                    Err(_) => DateTime::parse_from_rfc3339(text).ok()?.timestamp_millis(),
                }
            }
            _ => return None,
        };
        DateTime::<Utc>::from_timestamp_millis(millis).map(|_| millis)
    }

    /// String form used for labels and mapping lookups.
    pub fn display(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(value) => value.to_string(),
            Self::Number(value) => format_number(*value),
            Self::Text(text) => text.clone(),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// One threshold step. A step without a value is the base step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    /// Lower bound of the step; `None` stands for negative infinity.
    #[serde(default)]
    pub value: Option<f64>,
    /// Color name applied from this step upwards.
    pub color: String,
}

impl Threshold {
    /// Create a step with a lower bound.
    pub fn new(value: f64, color: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            color: color.into(),
        }
    }

    /// Create the base step.
    pub fn base(color: impl Into<String>) -> Self {
        Self {
            value: None,
            color: color.into(),
        }
    }
}

/// Ordered threshold steps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    /// Steps in ascending order.
    #[serde(default)]
    pub steps: Vec<Threshold>,
}

/// Display result of a value mapping.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MappingResult {
    /// Color name for matching values.
    #[serde(default)]
    pub color: Option<String>,
    /// Display text for matching values.
    #[serde(default)]
    pub text: Option<String>,
}

/// Value mapping entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ValueMapping {
    /// Exact raw value to display result.
    Value {
        /// Results keyed by raw value.
        options: BTreeMap<String, MappingResult>,
    },
    /// Mapping kinds that do not take part in color resolution.
    #[serde(other)]
    Unsupported,
}

impl ValueMapping {
    /// Create a value mapping from `(raw value, color)` pairs.
    pub fn colors<K, C>(pairs: impl IntoIterator<Item = (K, C)>) -> Self
    where
        K: Into<String>,
        C: Into<String>,
    {
        let options = pairs
            .into_iter()
            .map(|(key, color)| {
                (
                    key.into(),
                    MappingResult {
                        color: Some(color.into()),
                        text: None,
                    },
                )
            })
            .collect();
        Self::Value { options }
    }
}

/// Per-field display configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Threshold steps.
    #[serde(default)]
    pub thresholds: Option<ThresholdsConfig>,
    /// Value mappings.
    #[serde(default)]
    pub mappings: Vec<ValueMapping>,
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Display configuration.
    #[serde(default)]
    pub config: FieldConfig,
    /// Cell values, one per row.
    #[serde(default)]
    pub values: Vec<FieldValue>,
}

impl Field {
    /// Create a column from values.
    pub fn new<V: Into<FieldValue>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            name: name.into(),
            config: FieldConfig::default(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Set the display configuration.
    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    /// Access a cell.
    pub fn value(&self, row: usize) -> Option<&FieldValue> {
        self.values.get(row)
    }
}

/// One named table from the host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSeries {
    /// Series name; carries the separator-joined topology path.
    #[serde(default)]
    pub name: Option<String>,
    /// Columns.
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl RawSeries {
    /// Create an empty series with a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            fields: Vec::new(),
        }
    }

    /// Add a column.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Find a column by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Decode a list of series from JSON.
    pub fn list_from_json(json: &str) -> crate::error::Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}
