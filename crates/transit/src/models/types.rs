//! Core data types and enums for schedule data.

use std::str::FromStr;

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// Route variants a trip can belong to.
///
/// Wire names follow the schedule documents (`main`, `branch_up`, `branch_dn`).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
pub enum RouteFamily {
    #[strum(serialize = "main")]
    Main,
    #[strum(serialize = "branch_up")]
    BranchUp,
    #[strum(serialize = "branch_dn")]
    BranchDown,
}

impl RouteFamily {
    /// The axis this family's axis indices refer to
    pub fn axis(self) -> AxisKind {
        match self {
            Self::Main => AxisKind::Main,
            Self::BranchUp | Self::BranchDown => AxisKind::Branch,
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        Self::from_str(value.trim()).map_err(|_| TransitError::UnknownRouteFamily(value.into()))
    }
}

/// Station axes carried by a schedule document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum AxisKind {
    Main,
    Branch,
}

/// Which timetable a document describes
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DayType {
    Weekday,
    Holiday,
}

impl DayType {
    /// Short badge text shown next to the clock
    pub fn badge(self) -> &'static str {
        match self {
            Self::Weekday => "平日",
            Self::Holiday => "土日祝",
        }
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// Last second of a service day when a document leaves the end open
pub const DEFAULT_SERVICE_END: f64 = 24.0 * 3600.0 - 1.0;

/// Inclusive simulated-second bounds of a service day
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ServiceWindow {
    pub start: f64,
    pub end: f64,
}

impl ServiceWindow {
    /// Build a window, swapping the bounds if they arrive reversed.
    pub fn new(start: f64, end: f64) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    /// Saturate `t` into the window
    pub fn clamp(&self, t: f64) -> f64 {
        t.max(self.start).min(self.end)
    }

    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}

impl Default for ServiceWindow {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_SERVICE_END)
    }
}

/// A single stop of a trip at one station.
///
/// Times are seconds since midnight of the service day. Any of the three
/// timestamps may be missing; `time` is the single fallback used when only
/// one of arrival or departure is known.
#[derive(Clone, Debug, PartialEq)]
pub struct StopEvent {
    pub station: StationIdentifier,
    pub arrival: Option<u32>,
    pub departure: Option<u32>,
    pub time: Option<u32>,
    pub axis_index: Option<f64>,
}

impl StopEvent {
    pub fn new(
        station: StationIdentifier,
        arrival: Option<u32>,
        departure: Option<u32>,
        axis_index: Option<f64>,
    ) -> Self {
        Self {
            station,
            arrival,
            departure,
            time: None,
            axis_index,
        }
    }

    /// A stop known only by a single timestamp
    pub fn at(station: StationIdentifier, time: u32, axis_index: Option<f64>) -> Self {
        Self {
            station,
            arrival: None,
            departure: None,
            time: Some(time),
            axis_index,
        }
    }

    /// Arrival, falling back to the single timestamp, then to departure
    pub fn arrival_time(&self) -> Option<u32> {
        self.arrival.or(self.time).or(self.departure)
    }

    /// Departure, falling back to the single timestamp, then to arrival
    pub fn departure_time(&self) -> Option<u32> {
        self.departure.or(self.time).or(self.arrival)
    }

    /// Whether the vehicle dwells here for zero seconds
    pub fn is_instantaneous(&self) -> bool {
        match (self.arrival_time(), self.departure_time()) {
            (Some(a), Some(d)) => a == d,
            _ => true,
        }
    }

    /// Whether `t` falls inside the dwell window `[arrival, departure]`
    pub fn dwells_at(&self, t: f64) -> bool {
        match (self.arrival_time(), self.departure_time()) {
            (Some(a), Some(d)) => f64::from(a) <= t && t <= f64::from(d),
            _ => false,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Unknown route family: {0}")]
    UnknownRouteFamily(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),
}

impl From<serde_json::Error> for TransitError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TransitError>;
