//! Serde mirror of the published schedule JSON.
//!
//! Everything is optional here; turning these records into the checked
//! model happens in the parent module.

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireDocument {
    #[serde(default)]
    pub meta: WireMeta,
    /// Kept as raw values so one malformed record only loses that trip
    #[serde(default)]
    pub trips: Option<Vec<Value>>,
    #[serde(default)]
    pub display_trips: Option<Vec<Value>>,
}

impl WireDocument {
    /// `displayTrips` wins whenever the document carries it
    pub fn into_trips(self) -> Vec<Value> {
        self.display_trips.or(self.trips).unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireMeta {
    pub service_start_sec: Option<f64>,
    pub service_end_sec: Option<f64>,
    #[serde(default)]
    pub axis_stations: WireAxes,
    #[serde(default)]
    pub route_legend: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireAxes {
    #[serde(default)]
    pub main: Vec<String>,
    #[serde(default)]
    pub branch: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTrip {
    pub id: Option<Scalar>,
    pub no: Option<Scalar>,
    pub name: Option<Scalar>,
    pub label: Option<Scalar>,
    pub color: Option<String>,
    pub route: Option<String>,
    pub from: Option<Scalar>,
    pub to: Option<Scalar>,
    pub via: Option<Scalar>,
    #[serde(default)]
    pub stops: Vec<WireStop>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireStop {
    pub station: Option<Scalar>,
    pub arr_sec: Option<f64>,
    pub dep_sec: Option<f64>,
    pub time_sec: Option<f64>,
    pub axis_index: Option<f64>,
}

/// Numbers, labels and station names show up both as strings and as bare
/// numbers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    pub fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// Whole seconds of day, truncating any fraction; negative or non-finite
/// values count as missing
pub(crate) fn seconds(value: Option<f64>) -> Option<u32> {
    value
        .filter(|v| v.is_finite() && *v >= 0.0 && *v <= f64::from(u32::MAX))
        .map(|v| v.floor() as u32)
}

/// Legend values are usually strings but are rendered verbatim otherwise
pub(crate) fn legend_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
