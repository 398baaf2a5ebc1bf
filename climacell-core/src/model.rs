use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A floating-point measurement on a weather sample. `value` is `None` when
/// the API has no datum for this sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatValue {
    pub value: Option<f64>,
    #[serde(default)]
    pub units: String,
}

impl FloatValue {
    pub fn reading(&self) -> Reading {
        match self.value {
            Some(v) => Reading::Present(v),
            None => Reading::Unavailable,
        }
    }
}

/// Timestamp measurement that is always present on a well-formed sample,
/// such as the observation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeValue {
    pub value: DateTime<FixedOffset>,
}

/// Flattened view of a nullable measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// The measurement was not part of the payload at all.
    Missing,
    /// The measurement was present but its value was `null`.
    Unavailable,
    Present(f64),
}

impl Reading {
    pub fn value(self) -> Option<f64> {
        match self {
            Reading::Present(v) => Some(v),
            Reading::Missing | Reading::Unavailable => None,
        }
    }
}

/// One entry of an hourly forecast.
///
/// Only temperature is modelled explicitly. Any other field requested through
/// `ForecastQuery::fields` is kept as raw JSON in `extra` and can be read with
/// [`WeatherSample::float_field`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Zero when the payload omits it.
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<FloatValue>,
    pub observation_time: TimeValue,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl WeatherSample {
    pub fn temperature(&self) -> Reading {
        self.temp.as_ref().map_or(Reading::Missing, FloatValue::reading)
    }

    /// Reads a non-temperature field as a [`FloatValue`]. Returns `None` when
    /// the field is absent, `null`, or not shaped like `{value, units}`.
    pub fn float_field(&self, name: &str) -> Option<FloatValue> {
        if name == "temp" {
            return self.temp.clone();
        }
        self.extra
            .get(name)
            .and_then(|raw| serde_json::from_value(raw.clone()).ok())
    }

    pub fn reading(&self, name: &str) -> Reading {
        self.float_field(name)
            .map_or(Reading::Missing, |field| field.reading())
    }

    pub fn observed_at(&self) -> DateTime<FixedOffset> {
        self.observation_time.value
    }
}
