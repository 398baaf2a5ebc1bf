use std::{fmt, str::FromStr};

use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Si,
    Us,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Si => "si",
            UnitSystem::Us => "us",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Si, UnitSystem::Us]
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "si" => Ok(UnitSystem::Si),
            "us" => Ok(UnitSystem::Us),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported unit systems: si, us."
            )),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitSystem::try_from(s)
    }
}

/// Parameters for an hourly forecast request.
///
/// Every field is optional and only rendered into the query string when set.
/// An explicitly set empty `location_id` is still sent; the API decides
/// whether the combination is valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastQuery {
    pub coordinate: Option<Coordinate>,
    pub location_id: Option<String>,
    /// Defaults to `si` on the API side when unset.
    pub unit_system: Option<UnitSystem>,
    /// Weather data fields to return, e.g. `temp`. Empty means the API default.
    pub fields: Vec<String>,
    pub start_time: Option<DateTime<FixedOffset>>,
    pub end_time: Option<DateTime<FixedOffset>>,
}

impl ForecastQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coordinate(mut self, lat: f64, lon: f64) -> Self {
        self.coordinate = Some(Coordinate::new(lat, lon));
        self
    }

    pub fn with_location_id(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    pub fn with_unit_system(mut self, unit_system: UnitSystem) -> Self {
        self.unit_system = Some(unit_system);
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_start_time<Tz: TimeZone>(mut self, start: DateTime<Tz>) -> Self {
        self.start_time = Some(start.fixed_offset());
        self
    }

    pub fn with_end_time<Tz: TimeZone>(mut self, end: DateTime<Tz>) -> Self {
        self.end_time = Some(end.fixed_offset());
        self
    }

    /// Renders the set fields as query parameters. Order is not significant.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(coordinate) = self.coordinate {
            // f64's Display is the shortest string that parses back to the same value
            params.push(("lat", coordinate.lat.to_string()));
            params.push(("lon", coordinate.lon.to_string()));
        }

        if let Some(location_id) = &self.location_id {
            params.push(("location_id", location_id.clone()));
        }
        if let Some(unit_system) = self.unit_system {
            params.push(("unit_system", unit_system.as_str().to_string()));
        }

        if !self.fields.is_empty() {
            params.push(("fields", self.fields.join(",")));
        }

        if let Some(start) = &self.start_time {
            params.push(("start_time", format_timestamp(start)));
        }
        if let Some(end) = &self.end_time {
            params.push(("end_time", format_timestamp(end)));
        }

        params
    }

    /// Returns `endpoint` with its query string replaced by the rendered
    /// parameters.
    pub fn to_url(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        url.set_query(None);

        let params = self.query_params();
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }

        url
    }
}

fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
